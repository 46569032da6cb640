// ABOUTME: Integration tests for the bascule CLI commands.
// ABOUTME: Validates --help output, init, profile resolution, and rehearsals.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"
application: App
deployment_group: Group
scaling_group: app-asg
revision:
  bucket: artifacts
  key: app/build-1.zip
profiles:
  staging:
    deployment_group: Group-staging
"#;

fn bascule_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bascule"));
    cmd.env_remove("BASCULE_ENVIRONMENT");
    cmd
}

fn write_config(dir: &Path) {
    fs::write(dir.join("bascule.yml"), CONFIG).unwrap();
}

#[test]
fn help_shows_commands() {
    bascule_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("profile"))
        .stdout(predicate::str::contains("rehearse"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("bascule.yml");

    bascule_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .success();

    assert!(config_path.exists(), "bascule.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("scaling_group:"));
    assert!(content.contains("BASCULE_REVISION_KEY"));
}

#[test]
fn init_uses_application_name() {
    let temp_dir = tempfile::tempdir().unwrap();

    bascule_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--application", "billing"])
        .assert()
        .success();

    let content = fs::read_to_string(temp_dir.path().join("bascule.yml")).unwrap();
    assert!(content.contains("application: billing"));
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("bascule.yml");

    fs::write(&config_path, "existing: config").unwrap();

    bascule_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(&config_path).unwrap(), "existing: config");
}

#[test]
fn init_force_overwrites() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("bascule.yml");
    fs::write(&config_path, "existing: config").unwrap();

    bascule_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--force"])
        .assert()
        .success();

    assert!(fs::read_to_string(&config_path).unwrap().contains("revision:"));
}

#[test]
fn profile_without_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    bascule_cmd()
        .current_dir(temp_dir.path())
        .arg("profile")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn profile_prints_named_profile() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(temp_dir.path());

    bascule_cmd()
        .current_dir(temp_dir.path())
        .args(["profile", "--environment", "staging"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Group-staging"))
        .stdout(predicate::str::contains("named"));
}

#[test]
fn profile_environment_comes_from_env_var() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(temp_dir.path());

    bascule_cmd()
        .current_dir(temp_dir.path())
        .env("BASCULE_ENVIRONMENT", "staging")
        .arg("profile")
        .assert()
        .success()
        .stdout(predicate::str::contains("Group-staging"));
}

#[test]
fn unknown_environment_warns_about_fallback() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(temp_dir.path());

    bascule_cmd()
        .current_dir(temp_dir.path())
        .args(["profile", "--environment", "feature-x"])
        .assert()
        .success()
        .stderr(predicate::str::contains("no profile named feature-x"));
}

#[test]
fn rehearse_runs_blue_green_rollout() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(temp_dir.path());

    bascule_cmd()
        .current_dir(temp_dir.path())
        .arg("rehearse")
        .assert()
        .success()
        .stdout(predicate::str::contains("scaling up"))
        .stdout(predicate::str::contains("tagging active"))
        .stdout(predicate::str::contains("Succeeded"));
}

#[test]
fn rehearse_reports_injected_failure_code() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(temp_dir.path());

    bascule_cmd()
        .current_dir(temp_dir.path())
        .args(["rehearse", "--fail-with", "HEALTH_CONSTRAINTS"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HEALTH_CONSTRAINTS"))
        .stderr(predicate::str::contains("deploying"));
}

#[test]
fn rehearse_json_emits_result_event() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(temp_dir.path());

    let assert = bascule_cmd()
        .current_dir(temp_dir.path())
        .args(["--json", "rehearse"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let result = stdout
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|event| event["event"] == "result")
        .expect("result event");
    assert_eq!(result["result"]["status"], "Succeeded");
    assert_eq!(result["result"]["deployment_type"], "blue-green");
}
