use chrono::{DateTime, Utc};

use crate::app::AchievementStatus;
use crate::goals::Goal;
use crate::habits::{Habit, HabitProgress};
use crate::profile::UserProfile;
use crate::scoring::LevelReport;

pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_date(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

fn progress_label(progress: &HabitProgress) -> &'static str {
    match progress {
        HabitProgress::NotStarted => "not started",
        HabitProgress::InProgress { .. } => "in progress",
        HabitProgress::CycleComplete { .. } => "formed",
    }
}

pub fn format_habit_line(habit: &Habit) -> String {
    let mega = if habit.is_mega_habit { " [mega]" } else { "" };
    format!(
        "- {} {}{} ({}, streak {}/{}, {})",
        habit.id,
        habit.name,
        mega,
        habit.category.as_str(),
        habit.streak(),
        habit.goal,
        progress_label(&habit.progress)
    )
}

pub fn format_habit_detail(habit: &Habit) -> String {
    let mut output = String::new();
    output.push_str(&format!("Habit ID: {}\n", habit.id));
    output.push_str(&format!("Name: {}\n", habit.name));
    if let Some(description) = &habit.description {
        output.push_str(&format!("Description: {description}\n"));
    }
    output.push_str(&format!("Category: {}\n", habit.category.as_str()));
    output.push_str(&format!("Status: {}\n", progress_label(&habit.progress)));
    output.push_str(&format!("Streak: {}/{}\n", habit.streak(), habit.goal));
    output.push_str(&format!("Cycles: {}\n", habit.cycles_completed()));
    if habit.is_mega_habit {
        output.push_str(&format!(
            "Mega-habit: yes (x{} reward)\n",
            habit.reward_multiplier()
        ));
    }
    if let Some(level) = habit.required_level {
        output.push_str(&format!("Level: {level}\n"));
    }
    if let Some(difficulty) = habit.difficulty {
        output.push_str(&format!("Difficulty: {}\n", difficulty.as_str()));
    }
    if !habit.benefits.is_empty() {
        let benefits: Vec<&str> = habit.benefits.iter().map(|item| item.as_str()).collect();
        output.push_str(&format!("Benefits: {}\n", benefits.join(", ")));
    }
    match habit.last_completed {
        Some(last) => output.push_str(&format!("Last completed: {}\n", format_datetime(last))),
        None => output.push_str("Last completed: never\n"),
    }
    output.push_str(&format!("Created: {}", format_datetime(habit.created_at)));
    output
}

pub fn format_achievement_line(status: &AchievementStatus) -> String {
    let achievement = &status.achievement;
    let state = match achievement.unlocked_at {
        Some(at) => format!("unlocked {}", format_date(at)),
        None => format!("{}/{}", status.progress, achievement.requirement),
    };
    format!(
        "- {} {}: {} ({}, {})",
        achievement.id,
        achievement.name,
        achievement.description,
        achievement.category.as_str(),
        state
    )
}

pub fn format_goal_line(goal: &Goal) -> String {
    let check = if goal.completed { "x" } else { " " };
    let deadline = goal
        .deadline
        .map(|at| format!(", due {}", format_date(at)))
        .unwrap_or_default();
    format!(
        "- [{}] {} {} ({}%{})",
        check,
        goal.id,
        goal.title,
        goal.progress(),
        deadline
    )
}

pub fn format_goal_detail(goal: &Goal) -> String {
    let mut output = String::new();
    output.push_str(&format!("Goal ID: {}\n", goal.id));
    output.push_str(&format!("Title: {}\n", goal.title));
    if let Some(description) = &goal.description {
        output.push_str(&format!("Description: {description}\n"));
    }
    output.push_str(&format!("Category: {}\n", goal.category.as_str()));
    output.push_str(&format!(
        "Status: {}\n",
        if goal.completed { "done" } else { "open" }
    ));
    if let Some(at) = goal.completed_at {
        output.push_str(&format!("Completed: {}\n", format_datetime(at)));
    }
    if let Some(deadline) = goal.deadline {
        output.push_str(&format!("Deadline: {}\n", format_date(deadline)));
    }
    output.push_str(&format!(
        "Progress: {}% ({}/{} steps)\n",
        goal.progress(),
        goal.completed_steps(),
        goal.steps.len()
    ));
    output.push_str(&format!("Created: {}\n", format_datetime(goal.created_at)));
    output.push('\n');
    if goal.steps.is_empty() {
        output.push_str("Steps: (none)");
        return output;
    }
    output.push_str("Steps:\n");
    for step in &goal.steps {
        let check = if step.completed { "x" } else { " " };
        output.push_str(&format!(
            "- [{}] {} (step id {})\n",
            check, step.description, step.id
        ));
    }
    output.trim_end().to_string()
}

pub fn format_profile_detail(profile: &UserProfile, level: &LevelReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("Profile ID: {}\n", profile.id));
    output.push_str(&format!("Name: {}\n", profile.name));
    output.push_str(&format!("Score: {}\n", level.score));
    output.push_str(&format!("Level: {}\n", level.level));
    let bad_habits: Vec<&str> = profile
        .answers
        .active_bad_habits()
        .iter()
        .map(|habit| habit.as_str())
        .collect();
    if !bad_habits.is_empty() {
        output.push_str(&format!("Bad habits: {}\n", bad_habits.join(", ")));
    }
    let traumas: Vec<&str> = profile
        .answers
        .active_traumas()
        .iter()
        .map(|trauma| trauma.as_str())
        .collect();
    if !traumas.is_empty() {
        output.push_str(&format!("Traumas: {}\n", traumas.join(", ")));
    }
    output.push_str(&format!("Created: {}\n", format_datetime(profile.created_at)));
    output.push_str(&format!("Updated: {}", format_datetime(profile.updated_at)));
    output
}
