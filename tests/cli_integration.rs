//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end. Nothing here reaches the
//! network: gateway-backed commands are exercised with a blank API key,
//! which fails fast with a configuration error.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get the binary to test.
fn handoff() -> Command {
    let mut cmd = Command::cargo_bin("handoff").unwrap();
    // A blank key reads as unset, so no test can accidentally hit the API.
    cmd.env("GEMINI_API_KEY", "");
    cmd
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    handoff()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("offboarding interviews"));
}

#[test]
fn test_short_help_flag() {
    handoff().arg("-h").assert().success().stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_flag() {
    handoff()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_short_version_flag() {
    handoff().arg("-V").assert().success().stdout(predicate::str::contains("handoff"));
}

// ============================================================================
// Topics Command Tests
// ============================================================================

#[test]
fn test_topics_command_help() {
    handoff()
        .args(["topics", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generate interview topics"));
}

#[test]
fn test_topics_requires_identity_flags() {
    handoff()
        .args(["topics", "--name", "Alex Chen"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--role"));
}

#[test]
fn test_topics_rejects_blank_identity() {
    handoff()
        .args(["topics", "--name", "  ", "--role", "SRE", "--department", "Platform"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("name must not be empty"));
}

#[test]
fn test_topics_without_api_key_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    handoff()
        .current_dir(dir.path())
        .args([
            "topics",
            "--name",
            "Alex Chen",
            "--role",
            "Senior Backend Engineer",
            "--department",
            "Platform Infrastructure",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

// ============================================================================
// Transcribe Command Tests
// ============================================================================

#[test]
fn test_transcribe_command_help() {
    handoff()
        .args(["transcribe", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transcribe a recorded clip"));
}

#[test]
fn test_transcribe_missing_file_fails_before_the_gateway() {
    handoff()
        .args(["transcribe", "/no/such/clip.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not read"));
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_prints_defaults() {
    let dir = tempfile::tempdir().unwrap();
    handoff()
        .current_dir(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("gemini-2.5-flash"));
}

#[test]
fn test_config_honors_local_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".handoff.toml"), "[ai]\nmodel = \"gemini-2.0-pro\"\n")
        .unwrap();

    handoff()
        .current_dir(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("gemini-2.0-pro"));
}

#[test]
fn test_config_path_flag() {
    handoff()
        .args(["config", "--path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ============================================================================
// Completions Tests
// ============================================================================

#[test]
fn test_completions_bash() {
    handoff()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("handoff"));
}

#[test]
fn test_completions_rejects_unknown_shell() {
    handoff().args(["completions", "tcsh"]).assert().failure();
}
