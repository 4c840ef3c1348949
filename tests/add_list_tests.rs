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
fn test_add_creates_application() {
    let (temp_dir, _guard) = setup_test_env();

    huntl_cmd(&temp_dir)
        .args(["add", "Acme", "Backend Engineer"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Created application 1"));

    drop(temp_dir);
}

#[test]
fn test_list_shows_columns_and_default_stage() {
    let (temp_dir, _guard) = setup_test_env();

    huntl_cmd(&temp_dir)
        .args(["add", "Acme", "Backend Engineer"])
        .assert()
        .success();

    huntl_cmd(&temp_dir)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Company"))
        .stdout(predicates::str::contains("Stage"))
        .stdout(predicates::str::contains("Acme"))
        .stdout(predicates::str::contains("to-apply"));

    drop(temp_dir);
}

#[test]
fn test_add_with_explicit_stage() {
    let (temp_dir, _guard) = setup_test_env();

    huntl_cmd(&temp_dir)
        .args(["add", "Globex", "SRE", "--stage", "applied"])
        .assert()
        .success();

    huntl_cmd(&temp_dir)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicates::str::contains("applied"));

    drop(temp_dir);
}

#[test]
fn test_add_rejects_unknown_stage() {
    let (temp_dir, _guard) = setup_test_env();

    huntl_cmd(&temp_dir)
        .args(["add", "Acme", "Eng", "--stage", "limbo"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicates::str::contains("Unknown stage"));

    drop(temp_dir);
}

#[test]
fn test_add_rejects_empty_company() {
    let (temp_dir, _guard) = setup_test_env();

    huntl_cmd(&temp_dir)
        .args(["add", "  ", "Eng"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicates::str::contains("Company cannot be empty"));

    drop(temp_dir);
}

#[test]
fn test_list_json_output() {
    let (temp_dir, _guard) = setup_test_env();

    huntl_cmd(&temp_dir)
        .args(["add", "Acme", "Backend"])
        .assert()
        .success();

    let output = huntl_cmd(&temp_dir)
        .args(["list", "--json"])
        .assert()
        .success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed[0]["company"], "Acme");
    assert_eq!(parsed[0]["stage"], "to-apply");

    drop(temp_dir);
}

#[test]
fn test_list_filter_by_stage() {
    let (temp_dir, _guard) = setup_test_env();

    huntl_cmd(&temp_dir)
        .args(["add", "Acme", "Backend"])
        .assert()
        .success();
    huntl_cmd(&temp_dir)
        .args(["add", "Globex", "SRE", "--stage", "offer"])
        .assert()
        .success();

    huntl_cmd(&temp_dir)
        .args(["list", "--stage", "offer"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Globex"))
        .stdout(predicates::str::contains("Acme").not());

    drop(temp_dir);
}

#[test]
fn test_show_and_rm() {
    let (temp_dir, _guard) = setup_test_env();

    huntl_cmd(&temp_dir)
        .args(["add", "Acme", "Backend", "--url", "https://example.com/job"])
        .assert()
        .success();

    huntl_cmd(&temp_dir)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Acme"))
        .stdout(predicates::str::contains("https://example.com/job"));

    huntl_cmd(&temp_dir).args(["rm", "1"]).assert().success();

    huntl_cmd(&temp_dir)
        .args(["show", "1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicates::str::contains("No application with ID 1"));

    drop(temp_dir);
}

#[test]
fn test_edit_updates_only_given_fields() {
    let (temp_dir, _guard) = setup_test_env();

    huntl_cmd(&temp_dir)
        .args(["add", "Acme", "Backend", "--url", "https://example.com/job"])
        .assert()
        .success();

    huntl_cmd(&temp_dir)
        .args(["edit", "1", "--role", "Staff Backend"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Updated application 1"));

    huntl_cmd(&temp_dir)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Acme"))
        .stdout(predicates::str::contains("Staff Backend"))
        .stdout(predicates::str::contains("https://example.com/job"));

    drop(temp_dir);
}

#[test]
fn test_edit_without_fields_is_user_error() {
    let (temp_dir, _guard) = setup_test_env();

    huntl_cmd(&temp_dir)
        .args(["add", "Acme", "Backend"])
        .assert()
        .success();

    huntl_cmd(&temp_dir)
        .args(["edit", "1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicates::str::contains("Nothing to edit"));

    drop(temp_dir);
}

#[test]
fn test_invalid_id_is_user_error() {
    let (temp_dir, _guard) = setup_test_env();

    huntl_cmd(&temp_dir)
        .args(["show", "abc"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicates::str::contains("Invalid application ID"));

    drop(temp_dir);
}
