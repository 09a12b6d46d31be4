use std::collections::BTreeSet;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::error::AppError;
use crate::model::{Benefit, Difficulty, HabitCategory, HabitInput, Level};
use crate::profile::BadHabit;
use crate::store::{Persisted, StoreKey};

pub const DEFAULT_GOAL_DAYS: u32 = 21;
const MEGA_REWARD_MULTIPLIER: u32 = 2;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RepeatPolicy {
    OncePerDay,
    CountEvery,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HabitProgress {
    #[default]
    NotStarted,
    InProgress {
        streak: u32,
    },
    CycleComplete {
        streak: u32,
        cycles: u32,
        #[serde(rename = "completedAt")]
        completed_at: DateTime<Utc>,
    },
}

impl HabitProgress {
    pub fn streak(&self) -> u32 {
        match self {
            Self::NotStarted => 0,
            Self::InProgress { streak } | Self::CycleComplete { streak, .. } => *streak,
        }
    }

    pub fn cycle_completed(&self) -> bool {
        matches!(self, Self::CycleComplete { .. })
    }

    pub fn cycles_completed(&self) -> u32 {
        match self {
            Self::CycleComplete { cycles, .. } => *cycles,
            _ => 0,
        }
    }

    // The flag is set when this completion closed the cycle.
    pub fn advance(self, goal: u32, now: DateTime<Utc>) -> (Self, bool) {
        match self {
            Self::NotStarted => Self::reach(1, goal, now),
            Self::InProgress { streak } => Self::reach(streak.saturating_add(1), goal, now),
            Self::CycleComplete {
                streak,
                cycles,
                completed_at,
            } => (
                Self::CycleComplete {
                    streak: streak.saturating_add(1),
                    cycles,
                    completed_at,
                },
                false,
            ),
        }
    }

    fn reach(streak: u32, goal: u32, now: DateTime<Utc>) -> (Self, bool) {
        if streak >= goal {
            (
                Self::CycleComplete {
                    streak,
                    cycles: 1,
                    completed_at: now,
                },
                true,
            )
        } else {
            (Self::InProgress { streak }, false)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: HabitCategory,
    pub goal: u32,
    #[serde(default)]
    pub progress: HabitProgress,
    #[serde(default)]
    pub last_completed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_mega_habit: bool,
    #[serde(default)]
    pub required_level: Option<Level>,
    #[serde(default)]
    pub benefits: BTreeSet<Benefit>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    pub fn from_input(id: String, input: HabitInput, now: DateTime<Utc>) -> Result<Self, AppError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::InvalidInput("habit name cannot be empty".to_string()));
        }
        let goal = input.goal.unwrap_or(DEFAULT_GOAL_DAYS);
        if goal == 0 {
            return Err(AppError::InvalidInput(
                "habit goal must be at least 1 day".to_string(),
            ));
        }
        Ok(Self {
            id,
            name,
            description: input
                .description
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
            category: input.category,
            goal,
            progress: HabitProgress::NotStarted,
            last_completed: None,
            is_mega_habit: input.is_mega_habit,
            required_level: input.required_level,
            benefits: input.benefits.into_iter().collect(),
            difficulty: input.difficulty,
            created_at: now,
        })
    }

    pub fn streak(&self) -> u32 {
        self.progress.streak()
    }

    pub fn cycle_completed(&self) -> bool {
        self.progress.cycle_completed()
    }

    pub fn cycles_completed(&self) -> u32 {
        self.progress.cycles_completed()
    }

    pub fn reward_multiplier(&self) -> u32 {
        if self.is_mega_habit {
            MEGA_REWARD_MULTIPLIER
        } else {
            1
        }
    }

    pub fn completed_on_day_of(&self, now: DateTime<Utc>) -> bool {
        self.last_completed.is_some_and(|last| {
            last.with_timezone(&Local).date_naive() == now.with_timezone(&Local).date_naive()
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CycleCompleted {
    pub habit_id: String,
    pub name: String,
    pub cycles: u32,
    pub reward_multiplier: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HabitCompletion {
    pub habit: Habit,
    pub first_completion: bool,
    pub cycle: Option<CycleCompleted>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CompletionOutcome {
    Recorded(HabitCompletion),
    AlreadyDoneToday(Habit),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitLedger {
    habits: Vec<Habit>,
}

impl Persisted for HabitLedger {
    const KEY: StoreKey = StoreKey::Habits;
}

impl HabitLedger {
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    pub fn add(
        &mut self,
        id: String,
        input: HabitInput,
        now: DateTime<Utc>,
    ) -> Result<Habit, AppError> {
        if self.get(&id).is_some() {
            return Err(AppError::InvalidInput(format!("habit id {id} already exists")));
        }
        let habit = Habit::from_input(id, input, now)?;
        self.habits.push(habit.clone());
        Ok(habit)
    }

    pub fn complete(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
        policy: RepeatPolicy,
    ) -> Result<CompletionOutcome, AppError> {
        let habit = self
            .habits
            .iter_mut()
            .find(|habit| habit.id == id)
            .ok_or_else(|| AppError::NotFound(format!("habit id {id}")))?;

        if policy == RepeatPolicy::OncePerDay && habit.completed_on_day_of(now) {
            return Ok(CompletionOutcome::AlreadyDoneToday(habit.clone()));
        }

        let first_completion = habit.last_completed.is_none();
        let (progress, closed_cycle) = std::mem::take(&mut habit.progress).advance(habit.goal, now);
        habit.progress = progress;
        habit.last_completed = Some(now);

        let cycle = closed_cycle.then(|| CycleCompleted {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            cycles: habit.cycles_completed(),
            reward_multiplier: habit.reward_multiplier(),
        });

        Ok(CompletionOutcome::Recorded(HabitCompletion {
            habit: habit.clone(),
            first_completion,
            cycle,
        }))
    }

    pub fn initialize(&mut self, bad_habits: &BTreeSet<BadHabit>, now: DateTime<Utc>) {
        let mut habits: Vec<Habit> = catalog::STARTER_HABITS
            .iter()
            .map(|template| template.build(now))
            .collect();
        for bad_habit in bad_habits {
            habits.extend(
                catalog::habits_for_bad_habit(*bad_habit)
                    .iter()
                    .map(|template| template.build(now)),
            );
        }
        self.habits = habits;
    }

    pub fn recommended(&self, level: Level) -> Vec<&Habit> {
        self.habits
            .iter()
            .filter(|habit| habit.required_level.map_or(true, |required| required <= level))
            .filter(|habit| !habit.cycle_completed())
            .collect()
    }

}

pub fn count_mega_cycles(habits: &[Habit]) -> usize {
    habits
        .iter()
        .filter(|habit| habit.is_mega_habit && habit.cycle_completed())
        .count()
}

#[cfg(test)]
pub mod testing {
    use chrono::{DateTime, Days, Local, NaiveDate, TimeZone, Utc};

    pub fn local_noon(day: u32) -> DateTime<Utc> {
        let date = NaiveDate::from_ymd_opt(2024, 10, 20).expect("valid date")
            + Days::new(u64::from(day));
        let noon = date.and_hms_opt(12, 0, 0).expect("valid time");
        Local
            .from_local_datetime(&noon)
            .earliest()
            .expect("local noon exists")
            .with_timezone(&Utc)
    }
}
