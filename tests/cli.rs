use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use sea_orm::{ConnectionTrait, Database, DatabaseBackend, Statement};
use serde_json::Value;
use tempfile::TempDir;
use url::Url;

const STRONG_PROFILE: &str = r#"{
    "name": "Ana",
    "physicalCondition": "EXCELLENT",
    "communicationSkills": "EXPERT",
    "lifeStage": "ASCENT",
    "income": "VERY_HIGH",
    "savings": "HIGH",
    "badHabits": ["NONE"],
    "pastTraumas": ["NONE"]
}"#;

const BEGINNER_PROFILE: &str = r#"{
    "name": "Luis",
    "badHabits": ["SMOKING", "PORNOGRAPHY"],
    "addictionLevels": [{"habit": "SMOKING", "level": 4}]
}"#;

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_habitual"))
}

fn run_cmd(data_dir: &Path, args: &[&str], input: Option<&str>) -> Output {
    let mut cmd = Command::new(bin_path());
    cmd.arg("--data-dir").arg(data_dir);
    cmd.args(args);
    cmd.env_remove("HABITUAL_LOG");
    if input.is_some() {
        cmd.stdin(Stdio::piped());
    }
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = cmd.spawn().expect("spawn command");
    if let Some(input) = input {
        child
            .stdin
            .as_mut()
            .expect("stdin")
            .write_all(input.as_bytes())
            .expect("write stdin");
    }
    child.wait_with_output().expect("wait output")
}

fn output_stdout(output: Output) -> String {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout utf8")
}

fn output_stderr(output: Output) -> String {
    assert!(!output.status.success(), "command unexpectedly succeeded");
    String::from_utf8(output.stderr).expect("stderr utf8")
}

fn onboard(dir: &TempDir, profile: &str) -> String {
    output_stdout(run_cmd(dir.path(), &["onboard", "-"], Some(profile)))
}

fn parse_created_id(stdout: &str, prefix: &str) -> String {
    let rest = stdout.trim().strip_prefix(prefix).expect("created output");
    rest.split(':').next().expect("id").trim().to_string()
}

fn step_ids(detail: &str) -> Vec<String> {
    detail
        .lines()
        .filter_map(|line| line.split("(step id ").nth(1))
        .map(|rest| rest.trim_end_matches(')').to_string())
        .collect()
}

fn sqlite_url(dir: &TempDir) -> String {
    let db_path = dir.path().join("habitual.db");
    let mut url = Url::from_file_path(&db_path).expect("db path");
    url.set_query(Some("mode=rwc"));
    url.as_str().replacen("file://", "sqlite://", 1)
}

#[test]
fn onboarding_reports_level_and_seeds_catalog() {
    let dir = TempDir::new().expect("temp dir");
    let stdout = onboard(&dir, STRONG_PROFILE);
    assert!(stdout.contains("Welcome, Ana! Score: 70 Level: Experto"));
    assert!(stdout.contains("Seeded 18 habits, 10 achievements and 3 goals."));

    let level = output_stdout(run_cmd(dir.path(), &["profile", "level"], None));
    assert_eq!(level.trim(), "Score: 70 Level: Experto");

    let habits = output_stdout(run_cmd(dir.path(), &["habit", "list"], None));
    assert_eq!(habits.lines().count(), 18);
    assert!(habits.contains("- cold-shower Ducha fría [mega]"));

    let goals = output_stdout(run_cmd(dir.path(), &["goal", "list"], None));
    assert_eq!(goals.lines().count(), 3);
}

#[test]
fn onboarding_from_file_adds_bad_habit_habits() {
    let dir = TempDir::new().expect("temp dir");
    let profile_path = dir.path().join("profile.json");
    std::fs::write(&profile_path, BEGINNER_PROFILE).expect("write profile");
    let stdout = output_stdout(run_cmd(
        dir.path(),
        &["onboard", profile_path.to_str().expect("utf8 path")],
        None,
    ));
    assert!(stdout.contains("Score: 0 Level: Principiante"));
    assert!(stdout.contains("Seeded 21 habits"));

    let discipline = output_stdout(run_cmd(
        dir.path(),
        &["habit", "list", "--category", "discipline"],
        None,
    ));
    assert!(discipline.contains("no-smoking"));
    assert!(discipline.contains("no-porn "));
    assert!(discipline.contains("no-porn-5-days"));
}

#[test]
fn onboarding_twice_fails() {
    let dir = TempDir::new().expect("temp dir");
    onboard(&dir, STRONG_PROFILE);
    let stderr = output_stderr(run_cmd(dir.path(), &["onboard", "-"], Some(STRONG_PROFILE)));
    assert!(stderr.contains("already onboarded"));
}

#[test]
fn invalid_profile_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let stderr = output_stderr(run_cmd(
        dir.path(),
        &["onboard", "-"],
        Some(r#"{"name": "Ana", "badHabits": ["NONE", "ALCOHOL"]}"#),
    ));
    assert!(stderr.starts_with("Error: Invalid input"));
    let stdout = output_stdout(run_cmd(dir.path(), &["profile", "show"], None));
    assert!(stdout.contains("No profile yet."));
}

#[test]
fn level_before_onboarding_is_not_found() {
    let dir = TempDir::new().expect("temp dir");
    let stderr = output_stderr(run_cmd(dir.path(), &["profile", "level"], None));
    assert!(stderr.contains("Not found: profile"));
}

#[test]
fn profile_set_recomputes_score() {
    let dir = TempDir::new().expect("temp dir");
    onboard(&dir, BEGINNER_PROFILE);
    let stdout = output_stdout(run_cmd(
        dir.path(),
        &["profile", "set", "-"],
        Some(STRONG_PROFILE),
    ));
    assert!(stdout.contains("(score 70, level Experto)"));
    let show = output_stdout(run_cmd(dir.path(), &["profile", "show"], None));
    assert!(show.contains("Name: Ana"));
}

#[test]
fn profile_show_lists_bad_habits_and_traumas() {
    let dir = TempDir::new().expect("temp dir");
    onboard(
        &dir,
        r#"{"name": "Eva", "badHabits": ["SMOKING"], "pastTraumas": ["LOSS", "BULLYING"]}"#,
    );
    let show = output_stdout(run_cmd(dir.path(), &["profile", "show"], None));
    assert!(show.contains("Bad habits: smoking"));
    assert!(show.contains("Traumas: bullying, loss"));
}

#[test]
fn first_completion_unlocks_first_step() {
    let dir = TempDir::new().expect("temp dir");
    onboard(&dir, STRONG_PROFILE);

    let stdout = output_stdout(run_cmd(dir.path(), &["habit", "done", "drink-water"], None));
    assert!(stdout.contains("* Beber 2 litros de agua: streak 1/21."));
    assert!(stdout.contains("* Achievement unlocked: Primer Paso"));

    let unlocked = output_stdout(run_cmd(
        dir.path(),
        &["achievement", "list", "--unlocked"],
        None,
    ));
    assert_eq!(unlocked.lines().count(), 1);
    assert!(unlocked.contains("first-step Primer Paso"));

    let locked = output_stdout(run_cmd(
        dir.path(),
        &["achievement", "list", "--locked"],
        None,
    ));
    assert_eq!(locked.lines().count(), 9);
    assert!(locked.contains("perfect-week Semana Perfecta: Alcanza una racha de 7 días (overall, 1/7)"));
}

#[test]
fn same_day_completion_is_ignored() {
    let dir = TempDir::new().expect("temp dir");
    onboard(&dir, STRONG_PROFILE);
    output_stdout(run_cmd(dir.path(), &["habit", "done", "meditate"], None));

    let stdout = output_stdout(run_cmd(dir.path(), &["habit", "done", "meditate"], None));
    assert_eq!(stdout.trim(), "* Meditar 10 minutos was already completed today.");

    let detail = output_stdout(run_cmd(dir.path(), &["habit", "show", "meditate"], None));
    assert!(detail.contains("Streak: 1/21"));
}

#[test]
fn repeat_setting_allows_same_day_cycles() {
    let dir = TempDir::new().expect("temp dir");
    let stdout = output_stdout(run_cmd(
        dir.path(),
        &["habit", "add", "Flexiones", "--category", "fitness", "--goal", "2", "--mega"],
        None,
    ));
    let id = parse_created_id(&stdout, "Created habit ID: ");

    let settings = output_stdout(run_cmd(
        dir.path(),
        &["settings", "set", "--repeat-same-day", "true"],
        None,
    ));
    assert_eq!(settings.trim(), "repeat-same-day: true");

    output_stdout(run_cmd(dir.path(), &["habit", "done", &id], None));
    let stdout = output_stdout(run_cmd(dir.path(), &["habit", "done", &id], None));
    assert!(stdout.contains("* Flexiones: streak 2/2."));
    assert!(stdout.contains(
        "* Cycle complete for Flexiones (cycles: 1). Mega-habit bonus: x2 reward!"
    ));

    let detail = output_stdout(run_cmd(dir.path(), &["habit", "show", &id], None));
    assert!(detail.contains("Status: formed"));
    assert!(detail.contains("Cycles: 1"));
}

#[test]
fn habit_add_rejects_duplicate_names() {
    let dir = TempDir::new().expect("temp dir");
    output_stdout(run_cmd(
        dir.path(),
        &["habit", "add", "Yoga", "--category", "fitness"],
        None,
    ));
    let stderr = output_stderr(run_cmd(
        dir.path(),
        &["habit", "add", " yoga ", "--category", "mind"],
        None,
    ));
    assert!(stderr.contains("already exists"));

    let stderr = output_stderr(run_cmd(
        dir.path(),
        &["habit", "add", "Correr", "--category", "fitness", "--goal", "0"],
        None,
    ));
    assert!(stderr.contains("at least 1 day"));
}

#[test]
fn unknown_ids_report_not_found() {
    let dir = TempDir::new().expect("temp dir");
    onboard(&dir, STRONG_PROFILE);
    let stderr = output_stderr(run_cmd(dir.path(), &["habit", "done", "missing"], None));
    assert_eq!(stderr.trim(), "Error: Not found: habit id missing");

    let stderr = output_stderr(run_cmd(
        dir.path(),
        &["achievement", "unlock", "missing"],
        None,
    ));
    assert_eq!(stderr.trim(), "Error: Not found: achievement id missing");
}

#[test]
fn manual_unlock_is_idempotent() {
    let dir = TempDir::new().expect("temp dir");
    onboard(&dir, STRONG_PROFILE);
    let first = output_stdout(run_cmd(dir.path(), &["achievement", "unlock", "saver"], None));
    assert!(first.contains("* Achievement unlocked: Ahorrador"));
    let second = output_stdout(run_cmd(dir.path(), &["achievement", "unlock", "saver"], None));
    assert_eq!(second.trim(), "Achievement Ahorrador is already unlocked.");
}

#[test]
fn goal_steps_drive_progress() {
    let dir = TempDir::new().expect("temp dir");
    let stdout = output_stdout(run_cmd(
        dir.path(),
        &[
            "goal",
            "add",
            "Correr un 10K",
            "--category",
            "fitness",
            "--deadline",
            "2030-06-01",
            "--step",
            "Comprar zapatillas",
            "--step",
            "Correr 3K",
            "--step",
            "Correr 5K",
            "--step",
            "Correr 10K",
        ],
        None,
    ));
    assert!(stdout.contains("(steps: 4)"));
    let goal_id = parse_created_id(&stdout, "Created goal ID: ");

    let detail = output_stdout(run_cmd(dir.path(), &["goal", "show", &goal_id], None));
    assert!(detail.contains("Deadline: 2030-06-01"));
    let steps = step_ids(&detail);
    assert_eq!(steps.len(), 4);

    let toggled = output_stdout(run_cmd(
        dir.path(),
        &["goal", "step", &goal_id, &steps[0]],
        None,
    ));
    assert!(toggled.contains("progress 25% (1/4 steps)"));

    let undone = output_stdout(run_cmd(
        dir.path(),
        &["goal", "step", &goal_id, &steps[0], "--undo"],
        None,
    ));
    assert!(undone.contains("progress 0% (0/4 steps)"));

    output_stdout(run_cmd(dir.path(), &["goal", "done", &goal_id], None));
    output_stdout(run_cmd(dir.path(), &["goal", "done", &goal_id], None));
    let open = output_stdout(run_cmd(dir.path(), &["goal", "list"], None));
    assert_eq!(open.trim(), "No goals found.");
    let all = output_stdout(run_cmd(dir.path(), &["goal", "list", "--all"], None));
    assert!(all.contains(&format!("- [x] {goal_id} Correr un 10K")));
}

#[test]
fn goal_update_keeps_completion() {
    let dir = TempDir::new().expect("temp dir");
    let stdout = output_stdout(run_cmd(
        dir.path(),
        &["goal", "add", "Ahorrar", "--category", "finance", "--deadline", "2030-01-01"],
        None,
    ));
    let goal_id = parse_created_id(&stdout, "Created goal ID: ");
    output_stdout(run_cmd(dir.path(), &["goal", "done", &goal_id], None));

    output_stdout(run_cmd(
        dir.path(),
        &["goal", "update", &goal_id, "--title", "Ahorrar más", "--clear-deadline"],
        None,
    ));
    let detail = output_stdout(run_cmd(dir.path(), &["goal", "show", &goal_id], None));
    assert!(detail.contains("Title: Ahorrar más"));
    assert!(detail.contains("Status: done"));
    assert!(!detail.contains("Deadline:"));
    assert!(detail.contains("Progress: 100% (0/0 steps)"));

    let stderr = output_stderr(run_cmd(dir.path(), &["goal", "update", &goal_id], None));
    assert!(stderr.contains("no changes provided"));
}

#[test]
fn recommended_habits_match_level() {
    let dir = TempDir::new().expect("temp dir");
    onboard(&dir, BEGINNER_PROFILE);
    let stdout = output_stdout(run_cmd(dir.path(), &["habit", "recommended"], None));
    assert!(stdout.starts_with("Level: Principiante (score 0)"));
    assert!(stdout.contains("drink-water"));
    assert!(!stdout.contains("cold-shower"));
}

#[tokio::test]
async fn collections_are_stored_as_json_blobs() {
    let dir = TempDir::new().expect("temp dir");
    onboard(&dir, STRONG_PROFILE);

    let db = Database::connect(&sqlite_url(&dir))
        .await
        .expect("connect db");
    let rows = db
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT key, payload FROM collections ORDER BY key;".to_string(),
        ))
        .await
        .expect("query collections");
    let keys: Vec<String> = rows
        .iter()
        .map(|row| row.try_get::<String>("", "key").expect("key"))
        .collect();
    assert_eq!(
        keys,
        vec!["achievements", "goals", "habits", "isOnboarded", "userProfile"]
    );

    let habits_row = rows
        .iter()
        .find(|row| row.try_get::<String>("", "key").expect("key") == "habits")
        .expect("habits row");
    let payload: String = habits_row.try_get("", "payload").expect("payload");
    let habits: Value = serde_json::from_str(&payload).expect("habits json");
    let first = &habits[0];
    assert_eq!(first["progress"]["state"], "NOT_STARTED");
    assert_eq!(first["isMegaHabit"], false);
    assert!(first["createdAt"].is_string());
}

#[tokio::test]
async fn corrupt_collection_falls_back_to_empty() {
    let dir = TempDir::new().expect("temp dir");
    onboard(&dir, STRONG_PROFILE);

    let db = Database::connect(&sqlite_url(&dir))
        .await
        .expect("connect db");
    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        "UPDATE collections SET payload = '{broken' WHERE key = 'habits';".to_string(),
    ))
    .await
    .expect("corrupt habits");
    drop(db);

    let stdout = output_stdout(run_cmd(dir.path(), &["habit", "list"], None));
    assert_eq!(stdout.trim(), "No habits found.");
    let goals = output_stdout(run_cmd(dir.path(), &["goal", "list"], None));
    assert_eq!(goals.lines().count(), 3);
}
