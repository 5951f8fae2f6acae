//! CLI integration tests
//!
//! These run the built binary and check argument handling, dry runs and exit
//! codes. Nothing here reaches a real provider.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn lotus_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lotus-agents"))
}

/// Runs the binary with provider settings scrubbed from the environment
fn run(args: &[&str]) -> Output {
    Command::new(lotus_bin())
        .args(args)
        .env_remove("LOTUS_PROVIDER")
        .env_remove("LOTUS_MODEL")
        .env_remove("LOTUS_MAX_TOKENS")
        .env_remove("LOTUS_REQUEST_TIMEOUT")
        .env_remove("LOTUS_CONTEXT_CAP")
        .env_remove("LOTUS_LOG_LEVEL")
        .env_remove("ANTHROPIC_API_KEY")
        .output()
        .expect("Failed to execute lotus-agents")
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("lotus-agents"));
    assert!(stdout.contains("--preset"));
    assert!(stdout.contains("--dry-run"));
}

#[test]
fn test_cli_version() {
    let output = run(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_dry_run_prints_plan() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let output = run(&[out.to_str().unwrap(), "--preset", "payments", "--dry-run"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Microservice Name: payments"));
    assert!(stdout.contains("Backend & Database Agent"));
    assert!(!out.exists());
}

#[test]
fn test_missing_credentials_exit_code() {
    let dir = TempDir::new().unwrap();
    let output = run(&[dir.path().to_str().unwrap(), "--provider", "anthropic", "-q"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ANTHROPIC_API_KEY"));
}

#[test]
fn test_unknown_preset_exit_code() {
    let output = run(&["--preset", "warehouse", "--dry-run"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_service_file_with_path_name_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{"name": "../escape", "description": "x"}"#).unwrap();

    let output = run(&["--service", path.to_str().unwrap(), "--dry-run"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_service_file_dry_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orders.toml");
    fs::write(
        &path,
        "name = \"orders\"\ndescription = \"Order lifecycle\"\nentities = [\"Order\"]\n",
    )
    .unwrap();

    let output = run(&["--service", path.to_str().unwrap(), "--dry-run"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Core Domain Entities:\n  - Order\n"));
}

#[test]
fn test_invalid_format_rejected() {
    let output = run(&["--format", "dockerfile"]);
    assert!(!output.status.success());
}
