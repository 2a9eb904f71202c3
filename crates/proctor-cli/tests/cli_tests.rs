use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Temporary directory holding the database and a UTC configuration
struct TestEnv {
    dir: TempDir,
    db_path: PathBuf,
    config_path: PathBuf,
}

fn create_cli_test_environment() -> TestEnv {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = dir.path().join("cli_test.db");
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        "timezone = \"UTC\"\n\n[reminders]\nrenotify_interval_minutes = 60\n",
    )
    .expect("Failed to write config");
    TestEnv {
        dir,
        db_path,
        config_path,
    }
}

/// Command with --no-color, an isolated environment and the offline
/// collaborator
fn proctor_cmd(env: &TestEnv) -> Command {
    let mut cmd = Command::cargo_bin("proctor").expect("Failed to find proctor binary");
    cmd.env_remove("OPENAI_API_KEY")
        .env_remove("OPENAI_BASE_URL")
        .env("XDG_CONFIG_HOME", env.dir.path())
        .env("XDG_DATA_HOME", env.dir.path())
        .arg("--no-color")
        .arg("--database-file")
        .arg(&env.db_path)
        .arg("--config")
        .arg(&env.config_path);
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("Invalid UTF-8")
}

fn extract_id_from_output(output: &str) -> String {
    let start = output.find("ID: ").expect("output should contain an ID") + 4;
    output[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect()
}

fn add_past_block(env: &TestEnv, plan_id: &str, title: &str) -> String {
    let output = stdout_of(proctor_cmd(env).args([
        "plan",
        "add-block",
        plan_id,
        "2020-01-01",
        "20:00",
        "21:00",
        title,
        "--description",
        "Push the exercise and paste the commit",
    ]));
    assert!(output.contains("Added block with ID:"));
    extract_id_from_output(&output)
}

#[test]
fn test_cli_create_plan_offline() {
    let env = create_cli_test_environment();

    proctor_cmd(&env)
        .args(["plan", "create", "Learn Rust"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created plan with ID: 1 (7 blocks)"))
        .stdout(predicate::str::contains("# 1. Learn Rust"))
        .stdout(predicate::str::contains("- Breakdown: fallback template"));
}

#[test]
fn test_cli_list_empty_plans() {
    let env = create_cli_test_environment();

    proctor_cmd(&env)
        .args(["plan", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plans found."));
}

#[test]
fn test_cli_default_command_lists_plans() {
    let env = create_cli_test_environment();
    proctor_cmd(&env)
        .args(["plan", "create", "Learn Go"])
        .assert()
        .success();

    proctor_cmd(&env)
        .assert()
        .success()
        .stdout(predicate::str::contains("## Learn Go (ID: 1) (0/7)"));
}

#[test]
fn test_cli_blank_goal_fails() {
    let env = create_cli_test_environment();

    proctor_cmd(&env)
        .args(["plan", "create", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Goal cannot be empty"));
}

#[test]
fn test_cli_show_missing_plan_fails() {
    let env = create_cli_test_environment();

    proctor_cmd(&env)
        .args(["plan", "show", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Plan with ID 42 not found"));
}

#[test]
fn test_cli_add_block_rejects_bad_time() {
    let env = create_cli_test_environment();
    proctor_cmd(&env)
        .args(["plan", "create", "Learn Rust"])
        .assert()
        .success();

    proctor_cmd(&env)
        .args(["plan", "add-block", "1", "2026-03-02", "25:00", "26:00", "Typo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HH:MM"));
}

#[test]
fn test_cli_remind_then_check_in() {
    let env = create_cli_test_environment();
    let plan_id = extract_id_from_output(&stdout_of(
        proctor_cmd(&env).args(["plan", "create", "Learn Rust"]),
    ));
    let block_id = add_past_block(&env, &plan_id, "Ownership drill");

    proctor_cmd(&env)
        .args(["tick"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**Ownership drill**"))
        .stdout(predicate::str::contains("reminder 1"));

    // Same instant again is within the renotify interval
    let output = stdout_of(proctor_cmd(&env).args(["tick"]));
    assert!(!output.contains("Ownership drill"));

    proctor_cmd(&env)
        .args([
            "checkin",
            "submit",
            &block_id,
            "Wrote the borrowing exercise and pushed it",
            "-e",
            "commit 1a2b3c",
            "--self-score",
            "8",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Block checked in."))
        .stdout(predicate::str::contains("#### Feedback (offline)"));

    proctor_cmd(&env)
        .args(["checkin", "submit", &block_id, "Again"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already checked in"));

    proctor_cmd(&env)
        .args(["checkin", "list", &block_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("- commit 1a2b3c"))
        .stdout(predicate::str::contains("- Self score: 8/10"));

    proctor_cmd(&env)
        .args(["plan", "show", &plan_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("## 2020-01-01"))
        .stdout(predicate::str::contains("Ownership drill"));
}

#[test]
fn test_cli_tick_before_anything_is_due() {
    let env = create_cli_test_environment();
    proctor_cmd(&env)
        .args(["plan", "create", "Learn Rust"])
        .assert()
        .success();

    proctor_cmd(&env)
        .args(["tick", "--at", "2000-01-01T00:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No blocks are due for a reminder."));
}

#[test]
fn test_cli_check_in_validation() {
    let env = create_cli_test_environment();
    proctor_cmd(&env)
        .args(["plan", "create", "Learn Rust"])
        .assert()
        .success();

    proctor_cmd(&env)
        .args(["checkin", "submit", "1", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("report"));

    proctor_cmd(&env)
        .args(["checkin", "submit", "999", "Did the exercises"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task block with ID 999 not found"));

    proctor_cmd(&env)
        .args(["checkin", "list", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No check-ins recorded."));
}

fn read_json(path: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(path).expect("export file should exist");
    serde_json::from_str(&raw).expect("export should be valid JSON")
}

#[test]
fn test_cli_export() {
    let env = create_cli_test_environment();
    let plan_id = extract_id_from_output(&stdout_of(
        proctor_cmd(&env).args(["plan", "create", "Learn Rust"]),
    ));
    let block_id = add_past_block(&env, &plan_id, "Traits");
    proctor_cmd(&env)
        .args(["checkin", "submit", &block_id, "did it"])
        .assert()
        .success();

    let export_path = env.dir.path().join("export.json");
    proctor_cmd(&env)
        .args(["export", "-o"])
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Exported 1 plans, 8 blocks and 1 check-ins",
        ));

    let document = read_json(&export_path);
    assert_eq!(document["schema_version"], 1);
    assert_eq!(document["plans"].as_array().unwrap().len(), 1);
    assert_eq!(document["blocks"].as_array().unwrap().len(), 8);
    assert_eq!(document["check_ins"][0]["late"], false);

    proctor_cmd(&env)
        .args(["export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"exported_at\""));
}

#[test]
fn test_cli_broken_config_fails() {
    let env = create_cli_test_environment();
    std::fs::write(&env.config_path, "[reminders]\nmax_reminders = 9\n").unwrap();

    proctor_cmd(&env)
        .args(["plan", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_reminders"));
}

#[test]
fn test_cli_today_and_history() {
    let env = create_cli_test_environment();
    let plan_id = extract_id_from_output(&stdout_of(
        proctor_cmd(&env).args(["plan", "create", "Learn Rust"]),
    ));
    let block_id = add_past_block(&env, &plan_id, "Ownership drill");

    proctor_cmd(&env)
        .args(["today", "--day", "2020-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## 2020-01-01"))
        .stdout(predicate::str::contains("20:00-21:00 Ownership drill"));

    proctor_cmd(&env)
        .args(["today", "--day", "1999-12-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No blocks scheduled."));

    proctor_cmd(&env)
        .args(["checkin", "history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No check-ins recorded."));

    proctor_cmd(&env)
        .args(["checkin", "submit", &block_id, "Pushed the exercise", "-e", "commit 1a2b3c"])
        .assert()
        .success();

    proctor_cmd(&env)
        .args(["checkin", "history", "-n", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## 2020-01-01 Ownership drill"))
        .stdout(predicate::str::contains("- commit 1a2b3c"));

    proctor_cmd(&env)
        .args(["checkin", "history", "-n", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Limit must be between 1 and 500"));
}

#[test]
fn test_cli_shows_times_in_configured_zone() {
    let env = create_cli_test_environment();
    std::fs::write(&env.config_path, "timezone = \"Asia/Tokyo\"\n").unwrap();
    let plan_id = extract_id_from_output(&stdout_of(
        proctor_cmd(&env).args(["plan", "create", "Learn Rust"]),
    ));
    add_past_block(&env, &plan_id, "Ownership drill");

    proctor_cmd(&env)
        .args(["plan", "show", &plan_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("20:00-21:00 Ownership drill"))
        .stdout(predicate::str::contains("JST"));
}
