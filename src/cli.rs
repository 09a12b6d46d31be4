use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "habitual",
    version,
    about = "Track habits, streaks, achievements and goals"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Data directory (defaults to $HABITUAL_HOME or ~/.habitual)"
    )]
    pub data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Onboard(Onboard),
    #[command(subcommand)]
    Profile(ProfileCommand),
    #[command(subcommand)]
    Habit(HabitCommand),
    #[command(subcommand)]
    Achievement(AchievementCommand),
    #[command(subcommand)]
    Goal(GoalCommand),
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Args, Debug)]
pub struct Onboard {
    #[arg(value_name = "PROFILE", help = "Profile JSON file, or - for stdin")]
    pub source: String,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    Show,
    Level,
    Set(ProfileSet),
}

#[derive(Args, Debug)]
pub struct ProfileSet {
    #[arg(value_name = "PROFILE", help = "Profile JSON file, or - for stdin")]
    pub source: String,
}

#[derive(Subcommand, Debug)]
pub enum HabitCommand {
    Add(HabitAdd),
    List(HabitList),
    Show(HabitShow),
    Done(HabitDone),
    Recommended,
}

#[derive(Args, Debug)]
pub struct HabitAdd {
    pub name: String,
    #[arg(long, value_enum)]
    pub category: CategoryArg,
    #[arg(long, help = "Days needed to complete a cycle (default 21)")]
    pub goal: Option<u32>,
    #[arg(long)]
    pub mega: bool,
    #[arg(long, value_enum)]
    pub difficulty: Option<DifficultyArg>,
    #[arg(long, value_enum)]
    pub required_level: Option<LevelArg>,
    #[arg(long = "benefit", value_enum, value_name = "BENEFIT")]
    pub benefits: Vec<BenefitArg>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct HabitList {
    #[arg(long, value_enum)]
    pub category: Option<CategoryArg>,
}

#[derive(Args, Debug)]
pub struct HabitShow {
    pub id: String,
}

#[derive(Args, Debug)]
pub struct HabitDone {
    pub id: String,
}

#[derive(Subcommand, Debug)]
pub enum AchievementCommand {
    List(AchievementList),
    Unlock(AchievementUnlock),
}

#[derive(Args, Debug)]
pub struct AchievementList {
    #[arg(long, conflicts_with = "locked")]
    pub unlocked: bool,
    #[arg(long)]
    pub locked: bool,
}

#[derive(Args, Debug)]
pub struct AchievementUnlock {
    pub id: String,
}

#[derive(Subcommand, Debug)]
pub enum GoalCommand {
    Add(GoalAdd),
    List(GoalList),
    Show(GoalShow),
    Update(GoalUpdate),
    Done(GoalDone),
    Step(GoalStepToggle),
}

#[derive(Args, Debug)]
pub struct GoalAdd {
    pub title: String,
    #[arg(long, value_enum)]
    pub category: CategoryArg,
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub deadline: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long = "step", value_name = "STEP")]
    pub steps: Vec<String>,
}

#[derive(Args, Debug)]
pub struct GoalList {
    #[arg(long, help = "Include completed goals")]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct GoalShow {
    pub id: String,
}

#[derive(Args, Debug)]
pub struct GoalUpdate {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, value_enum)]
    pub category: Option<CategoryArg>,
    #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "clear_deadline")]
    pub deadline: Option<String>,
    #[arg(long)]
    pub clear_deadline: bool,
}

#[derive(Args, Debug)]
pub struct GoalDone {
    pub id: String,
}

#[derive(Args, Debug)]
pub struct GoalStepToggle {
    pub goal_id: String,
    pub step_id: String,
    #[arg(long, help = "Mark the step as not done")]
    pub undo: bool,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    Show,
    Set(SettingsSet),
}

#[derive(Args, Debug)]
pub struct SettingsSet {
    #[arg(long, value_name = "BOOL")]
    pub repeat_same_day: Option<bool>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum CategoryArg {
    Health,
    Fitness,
    Mind,
    Social,
    Finance,
    Productivity,
    Discipline,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DifficultyArg {
    Easy,
    Medium,
    Hard,
    Extreme,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LevelArg {
    Principiante,
    Aprendiz,
    Dedicado,
    Experto,
    Maestro,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum BenefitArg {
    Energy,
    Focus,
    Health,
    Confidence,
    Discipline,
    Social,
    Wealth,
    Calm,
}
