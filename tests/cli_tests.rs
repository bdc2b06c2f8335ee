//! Integration tests for the CLI interface

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary run inside an empty directory with no user configuration
fn gitvis(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gitvis").unwrap();
    cmd.current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("xdg"))
        .env("HOME", dir.path())
        .env_remove("GITVIS_REMOTE")
        .env_remove("GITVIS_GRAPH_LINES")
        .env_remove("GITVIS_COLOR")
        .env_remove("GITVIS_TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help_flag() {
    let dir = TempDir::new().unwrap();
    gitvis(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("commit-branch"))
        .stdout(predicate::str::contains("check-message"));
}

#[test]
fn test_commit_requires_message() {
    let dir = TempDir::new().unwrap();
    gitvis(&dir)
        .arg("commit")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--message"));
}

#[test]
fn test_invalid_command() {
    let dir = TempDir::new().unwrap();
    gitvis(&dir)
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_check_message_accepts_conventional_message() {
    let dir = TempDir::new().unwrap();
    gitvis(&dir)
        .args(["check-message", "feat(auth): add login"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: feat(auth): add login"));
}

#[test]
fn test_check_message_rejects_with_reason() {
    let dir = TempDir::new().unwrap();
    gitvis(&dir)
        .args(["check-message", "update stuff"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing type/colon separator"))
        .stderr(predicate::str::contains("[E7001]"));
}

#[test]
fn test_check_message_unknown_type() {
    let dir = TempDir::new().unwrap();
    gitvis(&dir)
        .args(["check-message", "feature: add login"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown commit type 'feature'"));
}

#[test]
fn test_check_message_from_hook_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("COMMIT_EDITMSG");
    std::fs::write(
        &file,
        "fix(parser): handle empty input\n\n\
         Empty files used to panic.\n\
         # Please enter the commit message for your changes.\n",
    )
    .unwrap();

    gitvis(&dir)
        .arg("check-message")
        .arg("--file")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: fix(parser): handle empty input"));
}

#[test]
fn test_subject_limit_from_repo_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".gitvis.toml"), "subject_max_len = 10\n").unwrap();

    gitvis(&dir)
        .args(["check-message", "docs: a rather long subject"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("limit is 10"));
}

#[test]
fn test_unknown_config_key_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".gitvis.toml"), "colour = \"never\"\n").unwrap();

    gitvis(&dir)
        .args(["check-message", "feat: x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"))
        .stderr(predicate::str::contains(".gitvis.toml"));
}

#[test]
fn test_invalid_env_value_is_reported() {
    let dir = TempDir::new().unwrap();
    gitvis(&dir)
        .env("GITVIS_COLOR", "rainbow")
        .args(["check-message", "feat: x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITVIS_COLOR"));
}
