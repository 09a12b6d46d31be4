use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::habits::{count_mega_cycles, Habit, HabitCompletion};
use crate::model::{AchievementCategory, AchievementKind};
use crate::store::{Persisted, StoreKey};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: AchievementCategory,
    #[serde(default)]
    pub kind: AchievementKind,
    pub requirement: u32,
    #[serde(default)]
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl Achievement {
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }

    pub fn progress(&self, habits: &[Habit]) -> u32 {
        let value = match self.kind {
            AchievementKind::Streak => habits
                .iter()
                .filter(|habit| self.category.covers(habit.category))
                .map(Habit::streak)
                .max()
                .unwrap_or(0),
            AchievementKind::MegaHabitCycles => {
                u32::try_from(count_mega_cycles(habits)).unwrap_or(u32::MAX)
            }
        };
        value.min(self.requirement)
    }

    fn unlock(&mut self, now: DateTime<Utc>) -> bool {
        if self.unlocked_at.is_some() {
            return false;
        }
        self.unlocked_at = Some(now);
        true
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum UnlockOutcome {
    Unlocked(Achievement),
    AlreadyUnlocked(Achievement),
    Unknown,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementLedger {
    achievements: Vec<Achievement>,
}

impl Persisted for AchievementLedger {
    const KEY: StoreKey = StoreKey::Achievements;
}

impl AchievementLedger {
    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn unlock(&mut self, id: &str, now: DateTime<Utc>) -> UnlockOutcome {
        let Some(achievement) = self.achievements.iter_mut().find(|item| item.id == id) else {
            return UnlockOutcome::Unknown;
        };
        if achievement.unlock(now) {
            UnlockOutcome::Unlocked(achievement.clone())
        } else {
            UnlockOutcome::AlreadyUnlocked(achievement.clone())
        }
    }

    // `habits` is the collection after the completion was applied.
    pub fn evaluate_after_completion(
        &mut self,
        completion: &HabitCompletion,
        habits: &[Habit],
        now: DateTime<Utc>,
    ) -> Vec<Achievement> {
        let habit = &completion.habit;
        let mega_cycles = count_mega_cycles(habits);
        let mut unlocked = Vec::new();

        for achievement in &mut self.achievements {
            if achievement.is_unlocked() {
                continue;
            }
            let earned = match achievement.kind {
                AchievementKind::Streak => {
                    (completion.first_completion && achievement.id == catalog::FIRST_STEP_ID)
                        || (achievement.category.covers(habit.category)
                            && habit.streak() >= achievement.requirement)
                }
                AchievementKind::MegaHabitCycles => {
                    u32::try_from(mega_cycles).unwrap_or(u32::MAX) >= achievement.requirement
                }
            };
            if earned && achievement.unlock(now) {
                unlocked.push(achievement.clone());
            }
        }
        unlocked
    }

    pub fn initialize(&mut self) {
        self.achievements = catalog::ACHIEVEMENTS
            .iter()
            .map(|template| template.build())
            .collect();
    }
}
