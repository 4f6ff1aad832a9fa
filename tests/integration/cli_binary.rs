//! Process-level behavior of the whodunit binary.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn whodunit(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_whodunit"));
    cmd.current_dir(temp_dir.path())
        .env("XDG_CONFIG_HOME", temp_dir.path().join("xdg"))
        .env_remove("OPENAI_API_KEY")
        .env_remove("WHODUNIT__PROVIDER__API_KEY")
        .env_remove("WHODUNIT_ENV");
    cmd
}

#[test]
fn test_missing_api_key_exits_with_error() {
    let temp_dir = TempDir::new().unwrap();
    let output = whodunit(&temp_dir).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.starts_with("Error: Provider not configured"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn test_invalid_config_file_exits_with_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("whodunit.toml");
    fs::write(&config_file, "[retry]\nmax_retry_attempts = 99\n").unwrap();

    let output = whodunit(&temp_dir)
        .arg("--config")
        .arg(&config_file)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Configuration validation failed"), "stderr: {}", stderr);
}

#[test]
fn test_help_lists_config_flag() {
    let temp_dir = TempDir::new().unwrap();
    let output = whodunit(&temp_dir).arg("--help").output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--config"));
}
