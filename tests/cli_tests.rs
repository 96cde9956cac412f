//! Binary-level tests: subcommand dispatch and host parameter loading.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn migrate_settings(temp: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_migrate-settings"));
    cmd.current_dir(temp.path())
        .env("MIGRATE_SETTINGS_PROJECT_DIR", temp.path().join("project"))
        .env("MIGRATE_SETTINGS_USER_DIR", temp.path().join("user"))
        .env_remove("MIGRATE_SETTINGS_CONFIG_PATH");
    cmd
}

#[test]
fn fields_ignores_broken_host_config() {
    let temp = TempDir::new().unwrap();
    let broken = temp.path().join("broken.yaml");
    fs::write(&broken, "parameters: [unclosed\n").unwrap();

    let output = migrate_settings(&temp)
        .args(["--log", "0", "--config"])
        .arg(&broken)
        .arg("fields")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.lines().any(|l| l.starts_with("changeLogFile")));

    let output = migrate_settings(&temp)
        .args(["--log", "0", "--config"])
        .arg(&broken)
        .args(["resolve", "--change-log-file", "db/changelog.xml"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn fields_ignores_broken_project_tier() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("project")).unwrap();
    fs::write(
        temp.path().join("project").join("config.yaml"),
        "parameters:\n  - not: a map\n",
    )
    .unwrap();

    let output = migrate_settings(&temp)
        .args(["--log", "0", "fields", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["name"], "driver");
}
