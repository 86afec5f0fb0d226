//! Binary-level checks for the commands that need no network access.

use crate::integration::test_utils::{chunk_json, day_json};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn journeygen(workspace: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_journeygen"))
        .arg("--workspace")
        .arg(workspace)
        .arg("--quiet")
        .args(args)
        .env("HOME", workspace.join("home"))
        .env("XDG_CONFIG_HOME", workspace.join("xdg"))
        .env_remove("OPENROUTER_API_KEY")
        .env_remove("JOURNEYGEN_ENV")
        .output()
        .expect("failed to run journeygen")
}

#[test]
fn plan_prints_windows_as_json() {
    let temp = TempDir::new().unwrap();
    let output = journeygen(
        temp.path(),
        &["plan", "--start", "2025-08-01", "--months", "8", "--format", "json"],
    );
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let windows = value["windows"].as_array().unwrap();
    assert_eq!(windows.len(), 16);
    assert_eq!(windows[0]["label"], "August 1 to 15, 2025");
    assert_eq!(windows[15]["end"], "2026-03-31");
}

#[test]
fn generate_without_credential_fails_before_writing() {
    let temp = TempDir::new().unwrap();
    let output = journeygen(temp.path(), &["generate", "--months", "1", "--cooldown-secs", "0"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("OPENROUTER_API_KEY"), "stderr: {stderr}");
    assert!(!temp.path().join("data").join("journeyData.json").exists());
}

#[test]
fn validate_reports_reference_issues() {
    let temp = TempDir::new().unwrap();
    let artifact = temp.path().join("journey.json");
    let dangling = day_json("2025-08-02", Some("Lab results"), "Results are in")
        .replace("\"triggeredByMessageId\":\"msg_2025-08-02\"", "\"triggeredByMessageId\":\"msg_missing\"");
    std::fs::write(
        &artifact,
        chunk_json(&[day_json("2025-08-01", None, "Hello"), dangling]),
    )
    .unwrap();

    let output = journeygen(temp.path(), &["validate", "journey.json", "--format", "json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["clean"], false);
    assert_eq!(value["audit"]["total_days"], 2);
    assert_eq!(value["audit"]["dangling_triggers"][0]["message_id"], "msg_missing");
}

#[test]
fn validate_missing_artifact_exits_non_zero() {
    let temp = TempDir::new().unwrap();
    let output = journeygen(temp.path(), &["validate"]);
    assert!(!output.status.success());
}
