use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_test_env() -> (TempDir, std::sync::MutexGuard<'static, ()>) {
    let guard = test_env::lock_test_env();
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let config_dir = temp_dir.path().join(".huntl");
    fs::create_dir_all(&config_dir).unwrap();
    let config_file = config_dir.join("rc");
    fs::write(&config_file, format!("data.location={}\n", db_path.display())).unwrap();
    std::env::set_var("HOME", temp_dir.path().to_str().unwrap());
    (temp_dir, guard)
}

fn huntl_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("huntl").unwrap();
    cmd.env("HOME", temp_dir.path());
    cmd
}

#[test]
fn test_set_stage_moves_application() {
    let (temp_dir, _guard) = setup_test_env();

    huntl_cmd(&temp_dir)
        .args(["add", "Acme", "Backend"])
        .assert()
        .success();

    huntl_cmd(&temp_dir)
        .args(["set-stage", "1", "hr-screen"])
        .assert()
        .success()
        .stdout(predicates::str::contains("moved to hr-screen"));

    huntl_cmd(&temp_dir)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicates::str::contains("hr-screen"));

    drop(temp_dir);
}

#[test]
fn test_set_stage_accepts_loose_spelling() {
    let (temp_dir, _guard) = setup_test_env();

    huntl_cmd(&temp_dir)
        .args(["add", "Acme", "Backend"])
        .assert()
        .success();

    // Underscores and capitals normalize to the dashed form.
    huntl_cmd(&temp_dir)
        .args(["set-stage", "1", "HR_Screen"])
        .assert()
        .success();

    drop(temp_dir);
}

#[test]
fn test_set_stage_unknown_stage_lists_valid_ones() {
    let (temp_dir, _guard) = setup_test_env();

    huntl_cmd(&temp_dir)
        .args(["add", "Acme", "Backend"])
        .assert()
        .success();

    huntl_cmd(&temp_dir)
        .args(["set-stage", "1", "purgatory"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicates::str::contains("Valid stages"))
        .stderr(predicates::str::contains("to-apply"));

    drop(temp_dir);
}

#[test]
fn test_set_stage_missing_application_is_internal_flow() {
    let (temp_dir, _guard) = setup_test_env();

    huntl_cmd(&temp_dir)
        .args(["set-stage", "7", "offer"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("No application with ID 7"));

    drop(temp_dir);
}

#[test]
fn test_pipeline_walkthrough() {
    let (temp_dir, _guard) = setup_test_env();

    huntl_cmd(&temp_dir)
        .args(["add", "Acme", "Backend"])
        .assert()
        .success();

    for stage in ["applied", "hr-screen", "interview", "offer"] {
        huntl_cmd(&temp_dir)
            .args(["set-stage", "1", stage])
            .assert()
            .success();
    }

    huntl_cmd(&temp_dir)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicates::str::contains("offer"));

    drop(temp_dir);
}
