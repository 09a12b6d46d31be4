use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Level {
    Principiante,
    Aprendiz,
    Dedicado,
    Experto,
    Maestro,
}

impl Level {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=20 => Self::Principiante,
            21..=40 => Self::Aprendiz,
            41..=60 => Self::Dedicado,
            61..=80 => Self::Experto,
            _ => Self::Maestro,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Principiante => "Principiante",
            Self::Aprendiz => "Aprendiz",
            Self::Dedicado => "Dedicado",
            Self::Experto => "Experto",
            Self::Maestro => "Maestro",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HabitCategory {
    Health,
    Fitness,
    Mind,
    Social,
    Finance,
    Productivity,
    Discipline,
}

impl HabitCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Fitness => "fitness",
            Self::Mind => "mind",
            Self::Social => "social",
            Self::Finance => "finance",
            Self::Productivity => "productivity",
            Self::Discipline => "discipline",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AchievementCategory {
    Overall,
    Fitness,
    Mind,
    Social,
    Finance,
    Productivity,
    Discipline,
}

impl AchievementCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overall => "overall",
            Self::Fitness => "fitness",
            Self::Mind => "mind",
            Self::Social => "social",
            Self::Finance => "finance",
            Self::Productivity => "productivity",
            Self::Discipline => "discipline",
        }
    }

    pub fn habit_category(&self) -> Option<HabitCategory> {
        match self {
            Self::Overall => None,
            Self::Fitness => Some(HabitCategory::Fitness),
            Self::Mind => Some(HabitCategory::Mind),
            Self::Social => Some(HabitCategory::Social),
            Self::Finance => Some(HabitCategory::Finance),
            Self::Productivity => Some(HabitCategory::Productivity),
            Self::Discipline => Some(HabitCategory::Discipline),
        }
    }

    pub fn covers(&self, category: HabitCategory) -> bool {
        match self.habit_category() {
            None => true,
            Some(tracked) => tracked == category,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AchievementKind {
    #[default]
    Streak,
    MegaHabitCycles,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Extreme => "extreme",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Benefit {
    Energy,
    Focus,
    Health,
    Confidence,
    Discipline,
    Social,
    Wealth,
    Calm,
}

impl Benefit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Energy => "energy",
            Self::Focus => "focus",
            Self::Health => "health",
            Self::Confidence => "confidence",
            Self::Discipline => "discipline",
            Self::Social => "social",
            Self::Wealth => "wealth",
            Self::Calm => "calm",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HabitInput {
    pub name: String,
    pub description: Option<String>,
    pub category: HabitCategory,
    pub goal: Option<u32>,
    pub is_mega_habit: bool,
    pub required_level: Option<Level>,
    pub benefits: Vec<Benefit>,
    pub difficulty: Option<Difficulty>,
}

impl HabitInput {
    pub fn new(name: impl Into<String>, category: HabitCategory) -> Self {
        Self {
            name: name.into(),
            description: None,
            category,
            goal: None,
            is_mega_habit: false,
            required_level: None,
            benefits: Vec::new(),
            difficulty: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GoalInput {
    pub title: String,
    pub description: Option<String>,
    pub category: HabitCategory,
    pub deadline: Option<DateTime<Utc>>,
    pub steps: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GoalChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<HabitCategory>,
    // `Some(None)` clears the deadline.
    pub deadline: Option<Option<DateTime<Utc>>>,
}
