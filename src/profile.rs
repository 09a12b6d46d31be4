use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::store::{Persisted, StoreKey};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhysicalCondition {
    Poor,
    Average,
    Good,
    Excellent,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommunicationSkills {
    Poor,
    Basic,
    Good,
    Expert,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifeStage {
    Crisis,
    Stagnation,
    Stable,
    Ascent,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Income {
    None,
    Low,
    Medium,
    High,
    VeryHigh,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Savings {
    None,
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendsCount {
    None,
    Few,
    Some,
    Many,
    VeryMany,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FemaleCommunication {
    Poor,
    Average,
    Good,
    Excellent,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublicSpeaking {
    Terrified,
    Nervous,
    Comfortable,
    Confident,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SleepQuality {
    Poor,
    Irregular,
    Good,
    Excellent,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmotionalState {
    Depressed,
    Anxious,
    Neutral,
    Stable,
    Thriving,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EducationLevel {
    None,
    HighSchool,
    Vocational,
    University,
    Postgraduate,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkStatus {
    Unemployed,
    Student,
    Employed,
    SelfEmployed,
    BusinessOwner,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipStatus {
    Single,
    Dating,
    Committed,
    Married,
}

// `None` is the "no bad habits" sentinel and must appear alone.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BadHabit {
    None,
    Smoking,
    Alcohol,
    Pornography,
    Procrastination,
    SocialMedia,
    JunkFood,
    Gambling,
    VideoGames,
}

impl BadHabit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Smoking => "smoking",
            Self::Alcohol => "alcohol",
            Self::Pornography => "pornography",
            Self::Procrastination => "procrastination",
            Self::SocialMedia => "social_media",
            Self::JunkFood => "junk_food",
            Self::Gambling => "gambling",
            Self::VideoGames => "video_games",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trauma {
    None,
    ChildhoodAbuse,
    Abandonment,
    Bullying,
    Loss,
    Betrayal,
    Violence,
    Rejection,
}

impl Trauma {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ChildhoodAbuse => "childhood_abuse",
            Self::Abandonment => "abandonment",
            Self::Bullying => "bullying",
            Self::Loss => "loss",
            Self::Betrayal => "betrayal",
            Self::Violence => "violence",
            Self::Rejection => "rejection",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AddictionLevel {
    pub habit: BadHabit,
    pub level: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    #[serde(default)]
    pub physical_condition: Option<PhysicalCondition>,
    #[serde(default)]
    pub communication_skills: Option<CommunicationSkills>,
    #[serde(default)]
    pub life_stage: Option<LifeStage>,
    #[serde(default)]
    pub income: Option<Income>,
    #[serde(default)]
    pub savings: Option<Savings>,
    #[serde(default)]
    pub friends_count: Option<FriendsCount>,
    #[serde(default)]
    pub female_communication: Option<FemaleCommunication>,
    #[serde(default)]
    pub public_speaking: Option<PublicSpeaking>,
    #[serde(default)]
    pub sleep_quality: Option<SleepQuality>,
    #[serde(default)]
    pub emotional_state: Option<EmotionalState>,
    #[serde(default)]
    pub education_level: Option<EducationLevel>,
    #[serde(default)]
    pub work_status: Option<WorkStatus>,
    #[serde(default)]
    pub relationship_status: Option<RelationshipStatus>,
    #[serde(default)]
    pub bad_habits: Vec<BadHabit>,
    #[serde(default)]
    pub addiction_levels: Vec<AddictionLevel>,
    #[serde(default)]
    pub past_traumas: Vec<Trauma>,
}

impl Questionnaire {
    pub fn active_bad_habits(&self) -> BTreeSet<BadHabit> {
        self.bad_habits
            .iter()
            .copied()
            .filter(|habit| *habit != BadHabit::None)
            .collect()
    }

    pub fn active_traumas(&self) -> BTreeSet<Trauma> {
        self.past_traumas
            .iter()
            .copied()
            .filter(|trauma| *trauma != Trauma::None)
            .collect()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let mut problems = Vec::new();
        if self.bad_habits.contains(&BadHabit::None)
            && self.bad_habits.iter().any(|habit| *habit != BadHabit::None)
        {
            problems.push("badHabits cannot combine NONE with other values".to_string());
        }
        if self.past_traumas.contains(&Trauma::None)
            && self.past_traumas.iter().any(|trauma| *trauma != Trauma::None)
        {
            problems.push("pastTraumas cannot combine NONE with other values".to_string());
        }
        for entry in &self.addiction_levels {
            if entry.habit == BadHabit::None {
                problems.push("addictionLevels entry cannot name NONE".to_string());
            }
            if !(1..=5).contains(&entry.level) {
                problems.push(format!(
                    "addictionLevels level {} for {} is outside 1..=5",
                    entry.level,
                    entry.habit.as_str()
                ));
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidInput(problems.join("\n")))
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub name: String,
    #[serde(flatten)]
    pub answers: Questionnaire,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub answers: Questionnaire,
}

impl UserProfile {
    pub fn new(id: String, input: ProfileInput, now: DateTime<Utc>) -> Result<Self, AppError> {
        validate_input(&input)?;
        Ok(Self {
            id,
            name: input.name.trim().to_string(),
            created_at: now,
            updated_at: now,
            answers: input.answers,
        })
    }

    pub fn replace(&mut self, input: ProfileInput, now: DateTime<Utc>) -> Result<(), AppError> {
        validate_input(&input)?;
        self.name = input.name.trim().to_string();
        self.answers = input.answers;
        self.updated_at = now;
        Ok(())
    }
}

fn validate_input(input: &ProfileInput) -> Result<(), AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::InvalidInput("profile name cannot be empty".to_string()));
    }
    input.answers.validate()
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileSlot(pub Option<UserProfile>);

impl Persisted for ProfileSlot {
    const KEY: StoreKey = StoreKey::UserProfile;
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OnboardedFlag(pub bool);

impl Persisted for OnboardedFlag {
    const KEY: StoreKey = StoreKey::IsOnboarded;
}
