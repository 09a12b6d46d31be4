use serde::Serialize;

use crate::model::Level;
use crate::profile::{
    BadHabit, CommunicationSkills, EducationLevel, EmotionalState, FemaleCommunication,
    FriendsCount, Income, LifeStage, PhysicalCondition, PublicSpeaking, Questionnaire, Savings,
    SleepQuality, Trauma, UserProfile, WorkStatus,
};

const BAD_HABIT_PENALTY: i32 = 5;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct LevelReport {
    pub score: u8,
    pub level: Level,
}

pub fn compute_level(profile: &UserProfile) -> LevelReport {
    let score = score_answers(&profile.answers);
    LevelReport {
        score,
        level: Level::from_score(score),
    }
}

pub fn score_answers(answers: &Questionnaire) -> u8 {
    let total = strengths(answers) - penalties(answers);
    total.clamp(0, 100) as u8
}

fn strengths(answers: &Questionnaire) -> i32 {
    let mut total = 0;

    total += match answers.physical_condition {
        Some(PhysicalCondition::Excellent) => 15,
        Some(PhysicalCondition::Good) => 10,
        Some(PhysicalCondition::Average) => 5,
        Some(PhysicalCondition::Poor) | None => 0,
    };
    total += match answers.communication_skills {
        Some(CommunicationSkills::Expert) => 15,
        Some(CommunicationSkills::Good) => 10,
        Some(CommunicationSkills::Basic) => 5,
        Some(CommunicationSkills::Poor) | None => 0,
    };
    total += match answers.life_stage {
        Some(LifeStage::Ascent) => 15,
        Some(LifeStage::Stable) => 5,
        Some(LifeStage::Stagnation) | Some(LifeStage::Crisis) | None => 0,
    };
    total += match answers.income {
        Some(Income::VeryHigh) => 15,
        Some(Income::High) => 10,
        Some(Income::Medium) => 5,
        Some(Income::Low) | Some(Income::None) | None => 0,
    };
    total += match answers.savings {
        Some(Savings::High) => 10,
        Some(Savings::Medium) => 5,
        Some(Savings::Low) | Some(Savings::None) | None => 0,
    };
    total += match answers.friends_count {
        Some(FriendsCount::VeryMany) => 10,
        Some(FriendsCount::Many) => 5,
        Some(FriendsCount::Some) => 3,
        Some(FriendsCount::Few) | Some(FriendsCount::None) | None => 0,
    };
    total += match answers.female_communication {
        Some(FemaleCommunication::Excellent) => 10,
        Some(FemaleCommunication::Good) => 5,
        Some(FemaleCommunication::Average) | Some(FemaleCommunication::Poor) | None => 0,
    };
    total += match answers.public_speaking {
        Some(PublicSpeaking::Confident) => 10,
        Some(PublicSpeaking::Comfortable) => 5,
        Some(PublicSpeaking::Nervous) | Some(PublicSpeaking::Terrified) | None => 0,
    };
    total += match answers.sleep_quality {
        Some(SleepQuality::Excellent) => 5,
        Some(SleepQuality::Good) => 3,
        Some(SleepQuality::Irregular) | Some(SleepQuality::Poor) | None => 0,
    };
    total += match answers.emotional_state {
        Some(EmotionalState::Thriving) => 5,
        Some(EmotionalState::Stable) => 3,
        Some(EmotionalState::Neutral)
        | Some(EmotionalState::Anxious)
        | Some(EmotionalState::Depressed)
        | None => 0,
    };
    total += match answers.education_level {
        Some(EducationLevel::Postgraduate) => 5,
        Some(EducationLevel::University) => 3,
        Some(EducationLevel::Vocational) => 2,
        Some(EducationLevel::HighSchool) | Some(EducationLevel::None) | None => 0,
    };
    total += match answers.work_status {
        Some(WorkStatus::BusinessOwner) => 5,
        Some(WorkStatus::Employed) | Some(WorkStatus::SelfEmployed) => 3,
        Some(WorkStatus::Student) | Some(WorkStatus::Unemployed) | None => 0,
    };

    total
}

fn penalties(answers: &Questionnaire) -> i32 {
    let bad_habits = answers.active_bad_habits().len() as i32 * BAD_HABIT_PENALTY;

    let addictions: i32 = answers
        .addiction_levels
        .iter()
        .filter(|entry| entry.habit != BadHabit::None)
        .map(|entry| match entry.level {
            3 => 3,
            4 => 4,
            5 => 5,
            _ => 0,
        })
        .sum();

    let traumas: i32 = answers.active_traumas().iter().map(trauma_penalty).sum();

    bad_habits + addictions + traumas
}

fn trauma_penalty(trauma: &Trauma) -> i32 {
    match trauma {
        Trauma::ChildhoodAbuse | Trauma::Violence => 5,
        Trauma::Abandonment => 4,
        Trauma::Bullying | Trauma::Loss | Trauma::Betrayal | Trauma::Rejection => 3,
        Trauma::None => 0,
    }
}
