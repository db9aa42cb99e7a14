use super::*;
use std::time::Duration;

#[cfg(unix)]
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

#[cfg(unix)]
#[tokio::test]
async fn test_production_runner_failure() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("false").build();

    let output = runner.run(command).await.unwrap();
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
}

#[tokio::test]
async fn test_production_runner_command_not_found() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("nonexistent-command-12345").build();

    let result = runner.run(command).await;
    assert!(matches!(result, Err(ProcessError::CommandNotFound(_))));
}

#[cfg(unix)]
#[tokio::test]
async fn test_production_runner_timeout() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("sleep")
        .arg("5")
        .timeout(Duration::from_millis(100))
        .build();

    let result = runner.run(command).await;
    assert!(matches!(result, Err(ProcessError::Timeout(_))));
}

#[tokio::test]
async fn test_mock_runner_answers_ffprobe() {
    let mock = MockProcessRunner::new();
    mock.expect_command("ffprobe")
        .with_arg("format=duration")
        .returns_stdout("12.5\n")
        .finish();

    let command = ProcessCommandBuilder::new("ffprobe")
        .args(["-show_entries", "format=duration"])
        .build();
    let output = mock.run(command).await.unwrap();

    assert!(output.status.success());
    assert_eq!(output.stdout, "12.5\n");
    assert!(mock.verify_called("ffprobe", 1));
}

#[tokio::test]
async fn test_mock_runner_script_is_used_up() {
    let mock = MockProcessRunner::new();
    mock.expect_command("ffmpeg").times(1).finish();

    let command = ProcessCommandBuilder::new("ffmpeg").arg("-y").build();
    assert!(mock.run(command.clone()).await.is_ok());
    assert!(matches!(
        mock.run(command).await,
        Err(ProcessError::Unscripted(_))
    ));
    assert_eq!(mock.call_count("ffmpeg"), 2);
}

#[tokio::test]
async fn test_mock_runner_falls_through_to_next_script() {
    let mock = MockProcessRunner::new();
    mock.expect_command("ffmpeg")
        .fails_with(1, "Invalid data found when processing input")
        .times(1)
        .finish();
    mock.expect_command("ffmpeg").finish();

    let command = ProcessCommandBuilder::new("ffmpeg").arg("out.m4a").build();
    let first = mock.run(command.clone()).await.unwrap();
    let second = mock.run(command).await.unwrap();

    assert_eq!(first.status, ExitStatus::Error(1));
    assert!(first.stderr.contains("Invalid data"));
    assert!(second.status.success());
}

#[tokio::test]
async fn test_mock_runner_writes_output_file() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let output = temp_dir.path().join("ch1.m4a");

    let mock = MockProcessRunner::new();
    mock.expect_command("ffmpeg")
        .with_arg("-i")
        .writes_output(b"m4a")
        .finish();

    let command = ProcessCommandBuilder::new("ffmpeg")
        .args(["-i", "ch1.wav"])
        .path_arg(&output)
        .build();
    mock.run(command).await.unwrap();

    assert_eq!(std::fs::read(&output).unwrap(), b"m4a");
}

#[tokio::test]
async fn test_mock_runner_unexpected_command() {
    let mock = MockProcessRunner::new();
    let command = ProcessCommandBuilder::new("sox").build();

    assert!(matches!(
        mock.run(command).await,
        Err(ProcessError::Unscripted(_))
    ));
    assert_eq!(mock.get_call_history().len(), 1);
}

#[test]
fn test_command_display() {
    let command = ProcessCommandBuilder::new("ffmpeg")
        .args(["-y", "-i", "in.wav"])
        .maybe_timeout(None)
        .build();
    assert_eq!(command.display(), "ffmpeg -y -i in.wav");
    assert_eq!(ExitStatus::Error(2).to_string(), "exit code 2");
}
