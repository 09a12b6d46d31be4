use chrono::Utc;
use tracing::{debug, info};

use crate::achievements::{Achievement, AchievementLedger, UnlockOutcome};
use crate::error::AppError;
use crate::goals::{Goal, GoalLedger};
use crate::habits::{CompletionOutcome, CycleCompleted, Habit, HabitLedger};
use crate::ids::IdGenerator;
use crate::model::{GoalChanges, GoalInput, HabitCategory, HabitInput};
use crate::notify::{Notification, Notifier};
use crate::profile::{OnboardedFlag, ProfileInput, ProfileSlot, UserProfile};
use crate::scoring::{compute_level, LevelReport};
use crate::settings::{AppSettings, SettingsChanges};
use crate::store::{self, Store};

pub struct App {
    store: Box<dyn Store>,
    notifier: Box<dyn Notifier>,
    ids: Box<dyn IdGenerator>,
}

#[derive(Debug)]
pub struct OnboardingReport {
    pub profile: UserProfile,
    pub level: LevelReport,
    pub habits: usize,
    pub achievements: usize,
    pub goals: usize,
}

#[derive(Debug)]
pub enum CompletionReport {
    Recorded {
        habit: Habit,
        cycle: Option<CycleCompleted>,
        unlocked: Vec<Achievement>,
    },
    AlreadyDoneToday(Habit),
}

#[derive(Debug)]
pub struct AchievementStatus {
    pub achievement: Achievement,
    pub progress: u32,
}

impl App {
    pub fn new(
        store: Box<dyn Store>,
        notifier: Box<dyn Notifier>,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        Self {
            store,
            notifier,
            ids,
        }
    }

    pub async fn is_onboarded(&self) -> Result<bool, AppError> {
        let flag: OnboardedFlag = store::load(self.store.as_ref()).await?;
        Ok(flag.0)
    }

    pub async fn onboard(&self, input: ProfileInput) -> Result<OnboardingReport, AppError> {
        // An unreadable flag decodes as false; a stored profile still blocks reseeding.
        if self.is_onboarded().await? || self.profile().await?.is_some() {
            return Err(AppError::InvalidInput(
                "already onboarded; use `profile set` to change answers".to_string(),
            ));
        }
        let now = Utc::now();
        let profile = UserProfile::new(self.ids.next_id(), input, now)?;
        let level = compute_level(&profile);

        let mut habits = HabitLedger::default();
        habits.initialize(&profile.answers.active_bad_habits(), now);
        let mut achievements = AchievementLedger::default();
        achievements.initialize();
        let mut goals = GoalLedger::default();
        goals.initialize(self.ids.as_ref(), now);

        let backend = self.store.as_ref();
        store::save(backend, &ProfileSlot(Some(profile.clone()))).await?;
        store::save(backend, &habits).await?;
        store::save(backend, &achievements).await?;
        store::save(backend, &goals).await?;
        store::save(backend, &OnboardedFlag(true)).await?;

        info!(
            profile = %profile.id,
            score = level.score,
            level = %level.level,
            habits = habits.habits().len(),
            "onboarding complete"
        );
        Ok(OnboardingReport {
            profile,
            level,
            habits: habits.habits().len(),
            achievements: achievements.achievements().len(),
            goals: goals.goals().len(),
        })
    }

    pub async fn profile(&self) -> Result<Option<UserProfile>, AppError> {
        let slot: ProfileSlot = store::load(self.store.as_ref()).await?;
        Ok(slot.0)
    }

    async fn require_profile(&self) -> Result<UserProfile, AppError> {
        self.profile()
            .await?
            .ok_or_else(|| AppError::NotFound("profile; run `habitual onboard` first".to_string()))
    }

    pub async fn replace_profile(&self, input: ProfileInput) -> Result<UserProfile, AppError> {
        let mut profile = self.require_profile().await?;
        profile.replace(input, Utc::now())?;
        store::save(self.store.as_ref(), &ProfileSlot(Some(profile.clone()))).await?;
        info!(profile = %profile.id, "profile replaced");
        Ok(profile)
    }

    pub async fn level(&self) -> Result<LevelReport, AppError> {
        let profile = self.require_profile().await?;
        Ok(compute_level(&profile))
    }

    pub async fn add_habit(&self, input: HabitInput) -> Result<Habit, AppError> {
        let mut habits: HabitLedger = store::load(self.store.as_ref()).await?;
        let habit = habits.add(self.ids.next_id(), input, Utc::now())?;
        store::save(self.store.as_ref(), &habits).await?;
        info!(habit = %habit.id, name = %habit.name, "habit added");
        Ok(habit)
    }

    pub async fn complete_habit(&self, id: &str) -> Result<CompletionReport, AppError> {
        let settings: AppSettings = store::load(self.store.as_ref()).await?;
        let mut habits: HabitLedger = store::load(self.store.as_ref()).await?;
        let now = Utc::now();

        let completion = match habits.complete(id, now, settings.repeat_policy())? {
            CompletionOutcome::AlreadyDoneToday(habit) => {
                debug!(habit = %habit.id, "completion ignored; already done today");
                self.notifier.notify(Notification::AlreadyDoneToday {
                    name: habit.name.clone(),
                });
                return Ok(CompletionReport::AlreadyDoneToday(habit));
            }
            CompletionOutcome::Recorded(completion) => completion,
        };
        store::save(self.store.as_ref(), &habits).await?;

        let mut achievements: AchievementLedger = store::load(self.store.as_ref()).await?;
        let unlocked = achievements.evaluate_after_completion(&completion, habits.habits(), now);
        if !unlocked.is_empty() {
            store::save(self.store.as_ref(), &achievements).await?;
        }

        let habit = completion.habit;
        info!(
            habit = %habit.id,
            streak = habit.streak(),
            unlocked = unlocked.len(),
            "habit completed"
        );
        self.notifier.notify(Notification::HabitCompleted {
            name: habit.name.clone(),
            streak: habit.streak(),
            goal: habit.goal,
        });
        if let Some(cycle) = &completion.cycle {
            self.notifier.notify(Notification::CycleCompleted {
                name: cycle.name.clone(),
                cycles: cycle.cycles,
                reward_multiplier: cycle.reward_multiplier,
            });
        }
        for achievement in &unlocked {
            self.notifier.notify(Notification::AchievementUnlocked {
                name: achievement.name.clone(),
                description: achievement.description.clone(),
            });
        }

        Ok(CompletionReport::Recorded {
            habit,
            cycle: completion.cycle,
            unlocked,
        })
    }

    pub async fn list_habits(
        &self,
        category: Option<HabitCategory>,
    ) -> Result<Vec<Habit>, AppError> {
        let habits: HabitLedger = store::load(self.store.as_ref()).await?;
        Ok(habits
            .habits()
            .iter()
            .filter(|habit| category.map_or(true, |wanted| habit.category == wanted))
            .cloned()
            .collect())
    }

    pub async fn habit(&self, id: &str) -> Result<Habit, AppError> {
        let habits: HabitLedger = store::load(self.store.as_ref()).await?;
        habits
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("habit id {id}")))
    }

    pub async fn recommended_habits(&self) -> Result<(LevelReport, Vec<Habit>), AppError> {
        let level = self.level().await?;
        let habits: HabitLedger = store::load(self.store.as_ref()).await?;
        let recommended = habits
            .recommended(level.level)
            .into_iter()
            .cloned()
            .collect();
        Ok((level, recommended))
    }

    pub async fn unlock_achievement(&self, id: &str) -> Result<UnlockOutcome, AppError> {
        let mut achievements: AchievementLedger = store::load(self.store.as_ref()).await?;
        let outcome = achievements.unlock(id, Utc::now());
        if let UnlockOutcome::Unlocked(achievement) = &outcome {
            store::save(self.store.as_ref(), &achievements).await?;
            info!(achievement = %achievement.id, "achievement unlocked");
            self.notifier.notify(Notification::AchievementUnlocked {
                name: achievement.name.clone(),
                description: achievement.description.clone(),
            });
        }
        Ok(outcome)
    }

    pub async fn list_achievements(&self) -> Result<Vec<AchievementStatus>, AppError> {
        let achievements: AchievementLedger = store::load(self.store.as_ref()).await?;
        let habits: HabitLedger = store::load(self.store.as_ref()).await?;
        Ok(achievements
            .achievements()
            .iter()
            .map(|achievement| AchievementStatus {
                progress: achievement.progress(habits.habits()),
                achievement: achievement.clone(),
            })
            .collect())
    }

    pub async fn add_goal(&self, input: GoalInput) -> Result<Goal, AppError> {
        let mut goals: GoalLedger = store::load(self.store.as_ref()).await?;
        let goal = goals.add(self.ids.next_id(), input, self.ids.as_ref(), Utc::now())?;
        store::save(self.store.as_ref(), &goals).await?;
        info!(goal = %goal.id, steps = goal.steps.len(), "goal added");
        Ok(goal)
    }

    pub async fn update_goal(&self, id: &str, changes: GoalChanges) -> Result<Goal, AppError> {
        let mut goals: GoalLedger = store::load(self.store.as_ref()).await?;
        let goal = goals.replace(id, changes)?;
        store::save(self.store.as_ref(), &goals).await?;
        Ok(goal)
    }

    pub async fn complete_goal(&self, id: &str) -> Result<Goal, AppError> {
        let mut goals: GoalLedger = store::load(self.store.as_ref()).await?;
        let goal = goals.complete(id, Utc::now())?;
        store::save(self.store.as_ref(), &goals).await?;
        info!(goal = %goal.id, "goal completed");
        Ok(goal)
    }

    pub async fn set_goal_step(
        &self,
        goal_id: &str,
        step_id: &str,
        completed: bool,
    ) -> Result<Goal, AppError> {
        let mut goals: GoalLedger = store::load(self.store.as_ref()).await?;
        let goal = goals.set_step(goal_id, step_id, completed)?;
        store::save(self.store.as_ref(), &goals).await?;
        Ok(goal)
    }

    pub async fn list_goals(&self, include_completed: bool) -> Result<Vec<Goal>, AppError> {
        let goals: GoalLedger = store::load(self.store.as_ref()).await?;
        Ok(goals
            .goals()
            .iter()
            .filter(|goal| include_completed || !goal.completed)
            .cloned()
            .collect())
    }

    pub async fn goal(&self, id: &str) -> Result<Goal, AppError> {
        let goals: GoalLedger = store::load(self.store.as_ref()).await?;
        goals
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("goal id {id}")))
    }

    pub async fn settings(&self) -> Result<AppSettings, AppError> {
        store::load(self.store.as_ref()).await
    }

    pub async fn update_settings(&self, changes: SettingsChanges) -> Result<AppSettings, AppError> {
        let mut settings: AppSettings = store::load(self.store.as_ref()).await?;
        settings.apply(changes);
        store::save(self.store.as_ref(), &settings).await?;
        Ok(settings)
    }
}
