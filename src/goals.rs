use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::error::AppError;
use crate::ids::IdGenerator;
use crate::model::{GoalChanges, GoalInput, HabitCategory};
use crate::store::{Persisted, StoreKey};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalStep {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: HabitCategory,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub steps: Vec<GoalStep>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(id: String, input: GoalInput, ids: &dyn IdGenerator, now: DateTime<Utc>) -> Self {
        let steps = input
            .steps
            .into_iter()
            .map(|step| step.trim().to_string())
            .filter(|step| !step.is_empty())
            .map(|description| GoalStep {
                id: ids.next_id(),
                description,
                completed: false,
            })
            .collect();
        Self {
            id,
            title: input.title.trim().to_string(),
            description: clean_text(input.description),
            category: input.category,
            deadline: input.deadline,
            completed: false,
            completed_at: None,
            steps,
            created_at: now,
        }
    }

    pub fn progress(&self) -> u8 {
        let total = self.steps.len();
        if total == 0 {
            return 100;
        }
        let done = self.steps.iter().filter(|step| step.completed).count();
        let percent = (200 * done + total) / (2 * total);
        u8::try_from(percent).unwrap_or(100)
    }

    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|step| step.completed).count()
    }
}

fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn require_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::InvalidInput("goal title cannot be empty".to_string()));
    }
    Ok(())
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalLedger {
    goals: Vec<Goal>,
}

impl Persisted for GoalLedger {
    const KEY: StoreKey = StoreKey::Goals;
}

impl GoalLedger {
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn get(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Goal, AppError> {
        self.goals
            .iter_mut()
            .find(|goal| goal.id == id)
            .ok_or_else(|| AppError::NotFound(format!("goal id {id}")))
    }

    pub fn add(
        &mut self,
        id: String,
        input: GoalInput,
        ids: &dyn IdGenerator,
        now: DateTime<Utc>,
    ) -> Result<Goal, AppError> {
        require_title(&input.title)?;
        if self.get(&id).is_some() {
            return Err(AppError::InvalidInput(format!("goal id {id} already exists")));
        }
        let goal = Goal::new(id, input, ids, now);
        self.goals.push(goal.clone());
        Ok(goal)
    }

    pub fn replace(&mut self, id: &str, changes: GoalChanges) -> Result<Goal, AppError> {
        if let Some(title) = changes.title.as_deref() {
            require_title(title)?;
        }
        let goal = self.get_mut(id)?;
        if let Some(title) = changes.title {
            goal.title = title.trim().to_string();
        }
        if let Some(description) = changes.description {
            goal.description = clean_text(Some(description));
        }
        if let Some(category) = changes.category {
            goal.category = category;
        }
        if let Some(deadline) = changes.deadline {
            goal.deadline = deadline;
        }
        Ok(goal.clone())
    }

    // Completing twice keeps the first timestamp.
    pub fn complete(&mut self, id: &str, now: DateTime<Utc>) -> Result<Goal, AppError> {
        let goal = self.get_mut(id)?;
        if !goal.completed {
            goal.completed = true;
            goal.completed_at = Some(now);
        }
        Ok(goal.clone())
    }

    pub fn set_step(
        &mut self,
        goal_id: &str,
        step_id: &str,
        completed: bool,
    ) -> Result<Goal, AppError> {
        let goal = self.get_mut(goal_id)?;
        let step = goal
            .steps
            .iter_mut()
            .find(|step| step.id == step_id)
            .ok_or_else(|| AppError::NotFound(format!("step id {step_id} in goal {goal_id}")))?;
        step.completed = completed;
        Ok(goal.clone())
    }

    pub fn initialize(&mut self, ids: &dyn IdGenerator, now: DateTime<Utc>) {
        self.goals = catalog::STARTER_GOALS
            .iter()
            .map(|template| template.build(ids, now))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::testing::SequentialIds;
    use chrono::Duration;

    fn input(steps: &[&str]) -> GoalInput {
        GoalInput {
            title: "Correr 10K".to_string(),
            description: None,
            category: HabitCategory::Fitness,
            deadline: None,
            steps: steps.iter().map(|step| step.to_string()).collect(),
        }
    }

    fn ledger_with(steps: &[&str]) -> (GoalLedger, SequentialIds, Goal) {
        let ids = SequentialIds::default();
        let mut ledger = GoalLedger::default();
        let goal = ledger
            .add("g1".to_string(), input(steps), &ids, Utc::now())
            .expect("add goal");
        (ledger, ids, goal)
    }

    #[test]
    fn progress_without_steps_is_full() {
        let (ledger, _, goal) = ledger_with(&[]);
        assert_eq!(ledger.get(&goal.id).expect("goal").progress(), 100);
    }

    #[test]
    fn one_of_four_steps_is_a_quarter() {
        let (mut ledger, _, goal) = ledger_with(&["a", "b", "c", "d"]);
        let step = goal.steps[0].id.clone();
        let updated = ledger.set_step(&goal.id, &step, true).expect("set step");
        assert_eq!(updated.progress(), 25);
        assert_eq!(updated.completed_steps(), 1);

        let undone = ledger.set_step(&goal.id, &step, false).expect("undo step");
        assert_eq!(undone.progress(), 0);
    }

    #[test]
    fn progress_rounds_to_nearest() {
        let (mut ledger, _, goal) = ledger_with(&["a", "b", "c"]);
        let first = goal.steps[0].id.clone();
        let second = goal.steps[1].id.clone();
        assert_eq!(ledger.set_step(&goal.id, &first, true).expect("one").progress(), 33);
        assert_eq!(ledger.set_step(&goal.id, &second, true).expect("two").progress(), 67);
    }

    #[test]
    fn blank_steps_are_dropped() {
        let (_, _, goal) = ledger_with(&["a", "  ", ""]);
        assert_eq!(goal.steps.len(), 1);
    }

    #[test]
    fn complete_is_idempotent() {
        let (mut ledger, _, goal) = ledger_with(&["a"]);
        let first = Utc::now();
        let done = ledger.complete(&goal.id, first).expect("complete");
        assert!(done.completed);
        let again = ledger
            .complete(&goal.id, first + Duration::hours(2))
            .expect("complete again");
        assert_eq!(again.completed_at, Some(first));
    }

    #[test]
    fn replace_never_uncompletes() {
        let (mut ledger, _, goal) = ledger_with(&[]);
        ledger.complete(&goal.id, Utc::now()).expect("complete");
        let updated = ledger
            .replace(
                &goal.id,
                GoalChanges {
                    title: Some("Correr 21K".to_string()),
                    deadline: Some(None),
                    ..GoalChanges::default()
                },
            )
            .expect("replace");
        assert_eq!(updated.title, "Correr 21K");
        assert!(updated.completed);
        assert!(updated.deadline.is_none());
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let (mut ledger, _, goal) = ledger_with(&["a"]);
        assert!(matches!(
            ledger.complete("missing", Utc::now()),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            ledger.set_step(&goal.id, "missing", true),
            Err(AppError::NotFound(_))
        ));
        assert!(ledger.replace("missing", GoalChanges::default()).is_err());
        assert!(!ledger.get(&goal.id).expect("goal").completed);
    }

    #[test]
    fn add_rejects_blank_title() {
        let ids = SequentialIds::default();
        let mut ledger = GoalLedger::default();
        let mut blank = input(&[]);
        blank.title = " ".to_string();
        assert!(ledger.add("g".to_string(), blank, &ids, Utc::now()).is_err());
    }

    #[test]
    fn initialize_seeds_three_goals_with_deadlines() {
        let ids = SequentialIds::default();
        let mut ledger = GoalLedger::default();
        let now = Utc::now();
        ledger.initialize(&ids, now);
        assert_eq!(ledger.goals().len(), 3);
        for goal in ledger.goals() {
            assert!(goal.deadline.expect("deadline") > now);
            assert!(!goal.steps.is_empty());
            assert_eq!(goal.progress(), 0);
        }
    }
}
