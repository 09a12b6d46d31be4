mod achievements;
mod app;
mod catalog;
mod cli;
mod db;
mod entities;
mod error;
mod goals;
mod habits;
mod ids;
mod model;
mod notify;
mod profile;
mod scoring;
mod settings;
mod store;
mod util;

use std::fs;
use std::io::Read;

use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::achievements::UnlockOutcome;
use crate::app::{App, CompletionReport};
use crate::cli::{
    AchievementCommand, AchievementList, BenefitArg, CategoryArg, Cli, Command, DifficultyArg,
    GoalAdd, GoalCommand, GoalList, GoalStepToggle, GoalUpdate, HabitAdd, HabitCommand,
    HabitList, LevelArg, ProfileCommand, SettingsCommand, SettingsSet,
};
use crate::error::AppError;
use crate::ids::UuidIds;
use crate::model::{Benefit, Difficulty, GoalChanges, GoalInput, HabitCategory, HabitInput, Level};
use crate::notify::ConsoleNotifier;
use crate::profile::ProfileInput;
use crate::settings::SettingsChanges;
use crate::store::SqliteStore;
use crate::util::{
    format_achievement_line, format_goal_detail, format_goal_line, format_habit_detail,
    format_habit_line, format_profile_detail,
};

const LOG_ENV: &str = "HABITUAL_LOG";
const STDIN_SOURCE: &str = "-";

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), AppError> {
    let Cli { data_dir, command } = Cli::parse();

    let data_dir = db::resolve_data_dir(data_dir)?;
    let db_path = db::resolve_db_path(&data_dir);
    db::ensure_parent_dir(&db_path)?;
    let mut lock = db::open_lock(&db_path)?;
    let _guard = lock.write()?;

    debug!(path = %db_path.display(), "opening database");
    let db = db::connect(&db_path).await?;
    db::ensure_schema(&db).await?;
    let app = App::new(
        Box::new(SqliteStore::new(db)),
        Box::new(ConsoleNotifier),
        Box::new(UuidIds),
    );

    match command {
        Command::Onboard(args) => handle_onboard(&app, &args.source).await,
        Command::Profile(command) => handle_profile(&app, command).await,
        Command::Habit(command) => handle_habit(&app, command).await,
        Command::Achievement(command) => handle_achievement(&app, command).await,
        Command::Goal(command) => handle_goal(&app, command).await,
        Command::Settings(command) => handle_settings(&app, command).await,
    }
}

async fn handle_onboard(app: &App, source: &str) -> Result<(), AppError> {
    let input = read_profile_input(source)?;
    let report = app.onboard(input).await?;
    println!(
        "Welcome, {}! Score: {} Level: {}",
        report.profile.name, report.level.score, report.level.level
    );
    println!(
        "Seeded {} habits, {} achievements and {} goals.",
        report.habits, report.achievements, report.goals
    );
    Ok(())
}

async fn handle_profile(app: &App, command: ProfileCommand) -> Result<(), AppError> {
    match command {
        ProfileCommand::Show => {
            let Some(profile) = app.profile().await? else {
                println!("No profile yet. Run `habitual onboard <PROFILE.json>`.");
                return Ok(());
            };
            let level = app.level().await?;
            println!("{}", format_profile_detail(&profile, &level));
        }
        ProfileCommand::Level => {
            let level = app.level().await?;
            println!("Score: {} Level: {}", level.score, level.level);
        }
        ProfileCommand::Set(args) => {
            let input = read_profile_input(&args.source)?;
            let profile = app.replace_profile(input).await?;
            let level = app.level().await?;
            println!(
                "Updated profile ID: {} (score {}, level {})",
                profile.id, level.score, level.level
            );
        }
    }
    Ok(())
}

async fn handle_habit(app: &App, command: HabitCommand) -> Result<(), AppError> {
    match command {
        HabitCommand::Add(args) => handle_habit_add(app, args).await,
        HabitCommand::List(args) => handle_habit_list(app, args).await,
        HabitCommand::Show(args) => {
            let habit = app.habit(&args.id).await?;
            println!("{}", format_habit_detail(&habit));
            Ok(())
        }
        HabitCommand::Done(args) => {
            match app.complete_habit(&args.id).await? {
                CompletionReport::Recorded {
                    habit,
                    cycle,
                    unlocked,
                } => {
                    debug!(
                        habit = %habit.id,
                        streak = habit.streak(),
                        cycles = cycle.map_or(0, |cycle| cycle.cycles),
                        unlocked = unlocked.len(),
                        "completion recorded"
                    );
                }
                CompletionReport::AlreadyDoneToday(habit) => {
                    debug!(habit = %habit.id, "completion skipped");
                }
            }
            Ok(())
        }
        HabitCommand::Recommended => {
            let (level, habits) = app.recommended_habits().await?;
            println!("Level: {} (score {})", level.level, level.score);
            if habits.is_empty() {
                println!("No recommended habits.");
                return Ok(());
            }
            for habit in &habits {
                println!("{}", format_habit_line(habit));
            }
            Ok(())
        }
    }
}

async fn handle_habit_add(app: &App, args: HabitAdd) -> Result<(), AppError> {
    require_non_empty("habit name", &args.name)?;
    let wanted = args.name.trim().to_lowercase();
    let existing = app.list_habits(None).await?;
    if existing
        .iter()
        .any(|habit| habit.name.trim().to_lowercase() == wanted)
    {
        return Err(AppError::InvalidInput(format!(
            "a habit named '{}' already exists",
            args.name.trim()
        )));
    }

    let habit = app
        .add_habit(HabitInput {
            description: args.description,
            goal: args.goal,
            is_mega_habit: args.mega,
            required_level: args.required_level.map(level_from_arg),
            benefits: args.benefits.into_iter().map(benefit_from_arg).collect(),
            difficulty: args.difficulty.map(difficulty_from_arg),
            ..HabitInput::new(args.name, category_from_arg(args.category))
        })
        .await?;
    println!("Created habit ID: {}: {}", habit.id, habit.name);
    Ok(())
}

async fn handle_habit_list(app: &App, args: HabitList) -> Result<(), AppError> {
    let habits = app.list_habits(args.category.map(category_from_arg)).await?;
    if habits.is_empty() {
        println!("No habits found.");
        return Ok(());
    }
    for habit in &habits {
        println!("{}", format_habit_line(habit));
    }
    Ok(())
}

async fn handle_achievement(app: &App, command: AchievementCommand) -> Result<(), AppError> {
    match command {
        AchievementCommand::List(args) => handle_achievement_list(app, args).await,
        AchievementCommand::Unlock(args) => match app.unlock_achievement(&args.id).await? {
            UnlockOutcome::Unlocked(_) => Ok(()),
            UnlockOutcome::AlreadyUnlocked(achievement) => {
                println!("Achievement {} is already unlocked.", achievement.name);
                Ok(())
            }
            UnlockOutcome::Unknown => Err(AppError::NotFound(format!(
                "achievement id {}",
                args.id
            ))),
        },
    }
}

async fn handle_achievement_list(app: &App, args: AchievementList) -> Result<(), AppError> {
    let AchievementList { unlocked, locked } = args;
    let statuses: Vec<_> = app
        .list_achievements()
        .await?
        .into_iter()
        .filter(|status| {
            let is_unlocked = status.achievement.is_unlocked();
            (!unlocked || is_unlocked) && (!locked || !is_unlocked)
        })
        .collect();
    if statuses.is_empty() {
        println!("No achievements found.");
        return Ok(());
    }
    for status in &statuses {
        println!("{}", format_achievement_line(status));
    }
    Ok(())
}

async fn handle_goal(app: &App, command: GoalCommand) -> Result<(), AppError> {
    match command {
        GoalCommand::Add(args) => handle_goal_add(app, args).await,
        GoalCommand::List(args) => handle_goal_list(app, args).await,
        GoalCommand::Show(args) => {
            let goal = app.goal(&args.id).await?;
            println!("{}", format_goal_detail(&goal));
            Ok(())
        }
        GoalCommand::Update(args) => handle_goal_update(app, args).await,
        GoalCommand::Done(args) => {
            let goal = app.complete_goal(&args.id).await?;
            println!("Goal ID: {} marked done: {}", goal.id, goal.title);
            Ok(())
        }
        GoalCommand::Step(args) => handle_goal_step(app, args).await,
    }
}

async fn handle_goal_add(app: &App, args: GoalAdd) -> Result<(), AppError> {
    require_non_empty("goal title", &args.title)?;
    let deadline = args.deadline.as_deref().map(parse_deadline).transpose()?;
    let goal = app
        .add_goal(GoalInput {
            title: args.title,
            description: args.description,
            category: category_from_arg(args.category),
            deadline,
            steps: args.steps,
        })
        .await?;
    println!(
        "Created goal ID: {}: {} (steps: {})",
        goal.id,
        goal.title,
        goal.steps.len()
    );
    Ok(())
}

async fn handle_goal_list(app: &App, args: GoalList) -> Result<(), AppError> {
    let goals = app.list_goals(args.all).await?;
    if goals.is_empty() {
        println!("No goals found.");
        return Ok(());
    }
    for goal in &goals {
        println!("{}", format_goal_line(goal));
    }
    Ok(())
}

async fn handle_goal_update(app: &App, args: GoalUpdate) -> Result<(), AppError> {
    let deadline = if args.clear_deadline {
        Some(None)
    } else {
        args.deadline
            .as_deref()
            .map(parse_deadline)
            .transpose()?
            .map(Some)
    };
    let changes = GoalChanges {
        title: args.title,
        description: args.description,
        category: args.category.map(category_from_arg),
        deadline,
    };
    if changes.title.is_none()
        && changes.description.is_none()
        && changes.category.is_none()
        && changes.deadline.is_none()
    {
        return Err(AppError::InvalidInput("no changes provided".to_string()));
    }
    let goal = app.update_goal(&args.id, changes).await?;
    println!("Updated goal ID: {}: {}", goal.id, goal.title);
    Ok(())
}

async fn handle_goal_step(app: &App, args: GoalStepToggle) -> Result<(), AppError> {
    let goal = app
        .set_goal_step(&args.goal_id, &args.step_id, !args.undo)
        .await?;
    println!(
        "Goal ID: {} progress {}% ({}/{} steps)",
        goal.id,
        goal.progress(),
        goal.completed_steps(),
        goal.steps.len()
    );
    Ok(())
}

async fn handle_settings(app: &App, command: SettingsCommand) -> Result<(), AppError> {
    let settings = match command {
        SettingsCommand::Show => app.settings().await?,
        SettingsCommand::Set(SettingsSet { repeat_same_day }) => {
            if repeat_same_day.is_none() {
                return Err(AppError::InvalidInput("no changes provided".to_string()));
            }
            app.update_settings(SettingsChanges { repeat_same_day })
                .await?
        }
    };
    println!("repeat-same-day: {}", settings.repeat_same_day);
    Ok(())
}

fn read_profile_input(source: &str) -> Result<ProfileInput, AppError> {
    let raw = if source == STDIN_SOURCE {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(source)?
    };
    Ok(serde_json::from_str(&raw)?)
}

fn parse_deadline(value: &str) -> Result<DateTime<Utc>, AppError> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|err| {
        AppError::InvalidInput(format!("invalid deadline '{value}': {err}"))
    })?;
    date.and_hms_opt(23, 59, 59)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| AppError::InvalidInput(format!("invalid deadline '{value}'")))
}

fn require_non_empty(label: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{label} cannot be empty")));
    }
    Ok(())
}

fn category_from_arg(arg: CategoryArg) -> HabitCategory {
    match arg {
        CategoryArg::Health => HabitCategory::Health,
        CategoryArg::Fitness => HabitCategory::Fitness,
        CategoryArg::Mind => HabitCategory::Mind,
        CategoryArg::Social => HabitCategory::Social,
        CategoryArg::Finance => HabitCategory::Finance,
        CategoryArg::Productivity => HabitCategory::Productivity,
        CategoryArg::Discipline => HabitCategory::Discipline,
    }
}

fn difficulty_from_arg(arg: DifficultyArg) -> Difficulty {
    match arg {
        DifficultyArg::Easy => Difficulty::Easy,
        DifficultyArg::Medium => Difficulty::Medium,
        DifficultyArg::Hard => Difficulty::Hard,
        DifficultyArg::Extreme => Difficulty::Extreme,
    }
}

fn level_from_arg(arg: LevelArg) -> Level {
    match arg {
        LevelArg::Principiante => Level::Principiante,
        LevelArg::Aprendiz => Level::Aprendiz,
        LevelArg::Dedicado => Level::Dedicado,
        LevelArg::Experto => Level::Experto,
        LevelArg::Maestro => Level::Maestro,
    }
}

fn benefit_from_arg(arg: BenefitArg) -> Benefit {
    match arg {
        BenefitArg::Energy => Benefit::Energy,
        BenefitArg::Focus => Benefit::Focus,
        BenefitArg::Health => Benefit::Health,
        BenefitArg::Confidence => Benefit::Confidence,
        BenefitArg::Discipline => Benefit::Discipline,
        BenefitArg::Social => Benefit::Social,
        BenefitArg::Wealth => Benefit::Wealth,
        BenefitArg::Calm => Benefit::Calm,
    }
}
