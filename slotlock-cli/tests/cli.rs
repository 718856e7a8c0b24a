//! Basic CLI integration tests: argument handling, init, and the
//! read-only commands.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn slotlock() -> Command {
    Command::cargo_bin("slotlock").unwrap()
}

fn data_dir_arg(dir: &TempDir) -> String {
    dir.path().join("data").to_str().unwrap().to_string()
}

#[test]
fn test_help_lists_commands() {
    slotlock()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("hold"))
        .stdout(predicate::str::contains("confirm"))
        .stdout(predicate::str::contains("sweep"));
}

#[test]
fn test_version_flag() {
    slotlock().arg("--version").assert().success();
}

#[test]
fn test_unknown_command_fails() {
    slotlock().arg("frobnicate").assert().failure();
}

#[test]
fn test_init_creates_database() {
    let dir = TempDir::new().unwrap();
    let data_dir = data_dir_arg(&dir);

    slotlock()
        .args(["--data-dir", &data_dir, "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(dir.path().join("data").join("slotlock.db").exists());
}

#[test]
fn test_init_with_config_writes_defaults() {
    let dir = TempDir::new().unwrap();
    let data_dir = data_dir_arg(&dir);

    slotlock()
        .args(["--data-dir", &data_dir, "init", "--with-config"])
        .assert()
        .success();

    let config = std::fs::read_to_string(dir.path().join("data").join("config.yaml")).unwrap();
    assert!(config.contains("default_ttl_minutes"));
}

#[test]
fn test_check_free_slot_exits_zero() {
    let dir = TempDir::new().unwrap();
    let data_dir = data_dir_arg(&dir);

    slotlock().args(["--data-dir", &data_dir, "init"]).assert().success();

    slotlock()
        .args([
            "--data-dir", &data_dir,
            "check",
            "--resource", "van-07",
            "--date", "2026-05-01",
            "--slot", "10:00-12:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("free"));
}

#[test]
fn test_list_empty_day() {
    let dir = TempDir::new().unwrap();
    let data_dir = data_dir_arg(&dir);

    slotlock().args(["--data-dir", &data_dir, "init"]).assert().success();

    slotlock()
        .args([
            "--data-dir", &data_dir,
            "list",
            "--resource", "van-07",
            "--date", "2026-05-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("(no blocks)"));
}

#[test]
fn test_invalid_slot_is_rejected() {
    let dir = TempDir::new().unwrap();
    let data_dir = data_dir_arg(&dir);

    slotlock().args(["--data-dir", &data_dir, "init"]).assert().success();

    // End before start never parses into an interval.
    slotlock()
        .args([
            "--data-dir", &data_dir,
            "check",
            "--resource", "van-07",
            "--date", "2026-05-01",
            "--slot", "12:00-10:00",
        ])
        .assert()
        .failure();
}

#[test]
fn test_block_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let data_dir = data_dir_arg(&dir);

    slotlock().args(["--data-dir", &data_dir, "init"]).assert().success();

    slotlock()
        .args([
            "--data-dir", &data_dir,
            "block",
            "--resource", "van-07",
            "--date", "2026-06-01",
            "--slot", "09:00-17:00",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would:"));

    // The slot is still free.
    slotlock()
        .args([
            "--data-dir", &data_dir,
            "check",
            "--resource", "van-07",
            "--date", "2026-06-01",
            "--slot", "10:00-11:00",
        ])
        .assert()
        .success();
}
