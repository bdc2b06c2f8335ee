use super::*;
use std::time::Duration;

#[tokio::test]
async fn test_production_runner_success() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("echo")
        .arg("hello world")
        .build();

    let output = runner.run(command).await.unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout.trim(), "hello world");
    assert!(output.stderr.is_empty());
}

#[tokio::test]
async fn test_production_runner_failure() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("false").build();

    let output = runner.run(command).await.unwrap();
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
}

#[tokio::test]
async fn test_production_runner_captures_stderr() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("sh")
        .args(["-c", "echo oops >&2; exit 3"])
        .build();

    let output = runner.run(command).await.unwrap();
    assert_eq!(output.status, ExitStatus::Error(3));
    assert_eq!(output.stderr, "oops\n");
}

#[tokio::test]
async fn test_production_runner_env_and_dir() {
    let dir = tempfile::TempDir::new().unwrap();
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("sh")
        .args(["-c", "echo \"$GITVIS_TEST_VAR\"; pwd"])
        .env("GITVIS_TEST_VAR", "present")
        .current_dir(dir.path())
        .build();

    let output = runner.run(command).await.unwrap();
    let mut lines = output.stdout.lines();
    assert_eq!(lines.next(), Some("present"));
    let pwd = std::path::PathBuf::from(lines.next().unwrap());
    assert_eq!(
        pwd.canonicalize().unwrap(),
        dir.path().canonicalize().unwrap()
    );
}

#[tokio::test]
async fn test_production_runner_command_not_found() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("nonexistent-command-12345").build();

    let result = runner.run(command).await;
    assert!(matches!(
        result.unwrap_err(),
        ProcessError::CommandNotFound(_)
    ));
}

#[tokio::test]
async fn test_production_runner_timeout() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("sleep")
        .arg("5")
        .timeout(Duration::from_millis(100))
        .build();

    let result = runner.run(command).await;
    assert!(matches!(result.unwrap_err(), ProcessError::Timeout(_)));
}

#[tokio::test]
async fn test_mock_runner_basic() {
    let mut mock = MockProcessRunner::new();

    mock.expect_command("git")
        .with_args(|args| args == ["status"])
        .returns_stdout("On branch main\n")
        .returns_success()
        .finish();

    let output = mock
        .run(ProcessCommandBuilder::new("git").arg("status").build())
        .await
        .unwrap();

    assert!(output.status.success());
    assert_eq!(output.stdout, "On branch main\n");
    assert!(mock.verify_called("git", 1));
}

#[tokio::test]
async fn test_mock_runner_args_matcher_selects_expectation() {
    let mut mock = MockProcessRunner::new();

    mock.expect_command("git")
        .with_args(|args| args.first().map(String::as_str) == Some("push"))
        .returns_exit_code(128)
        .returns_stderr("fatal: no remote")
        .finish();
    mock.expect_command("git").returns_success().finish();

    let push = mock
        .run(ProcessCommandBuilder::new("git").args(["push", "origin"]).build())
        .await
        .unwrap();
    assert_eq!(push.status, ExitStatus::Error(128));
    assert_eq!(push.stderr, "fatal: no remote");

    let log = mock
        .run(ProcessCommandBuilder::new("git").arg("log").build())
        .await
        .unwrap();
    assert!(log.status.success());
    assert_eq!(mock.get_call_history().len(), 2);
}

#[tokio::test]
async fn test_mock_runner_times_limit() {
    let mut mock = MockProcessRunner::new();
    mock.expect_command("git").times(1).finish();

    let command = ProcessCommandBuilder::new("git").arg("fetch").build();
    assert!(mock.run(command.clone()).await.is_ok());
    assert!(matches!(
        mock.run(command).await.unwrap_err(),
        ProcessError::MockExpectationNotMet(_)
    ));
}

#[tokio::test]
async fn test_mock_runner_unexpected_command() {
    let mock = MockProcessRunner::new();
    let result = mock
        .run(ProcessCommandBuilder::new("hg").arg("log").build())
        .await;
    assert!(matches!(
        result.unwrap_err(),
        ProcessError::MockExpectationNotMet(_)
    ));
}

#[test]
fn test_synthetic_exit_codes() {
    assert_eq!(
        ProcessError::CommandNotFound("git".into()).synthetic_exit_code(),
        127
    );
    assert_eq!(
        ProcessError::Timeout(Duration::from_secs(1)).synthetic_exit_code(),
        124
    );
}
