//! Integration tests for the lockstep binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ROOT_MANIFEST: &str = r#"[workspace]
members = ["crates/core", "crates/app"]

[workspace.package]
version = "0.9.0"

[package]
name = "demo"
version.workspace = true
"#;

const LOCKFILE: &str = r#"version = 4

[[package]]
name = "demo"
version = "0.9.0"

[[package]]
name = "demo-app"
version = "0.9.0"

[[package]]
name = "demo-core"
version = "0.9.0"
"#;

fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full, content).unwrap();
}

fn create_workspace() -> TempDir {
    let temp = tempfile::Builder::new()
        .prefix("lockstep_test_")
        .tempdir()
        .expect("Failed to create temp directory");
    let root = temp.path();
    write(root, "Cargo.toml", ROOT_MANIFEST);
    write(root, "Cargo.lock", LOCKFILE);
    write(root, "crates/core/Cargo.toml", "[package]\nname = \"demo-core\"\n");
    write(root, "crates/app/Cargo.toml", "[package]\nname = \"demo-app\"\n");
    temp
}

fn lockstep() -> Command {
    #[allow(deprecated)]
    let cmd = Command::cargo_bin("lockstep").unwrap();
    cmd
}

#[test]
fn test_version_command() {
    lockstep()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("lockstep "));
}

#[test]
fn test_plan_human_output() {
    let temp = create_workspace();

    lockstep()
        .args(["plan", "--release-version", "1.0.0", "--root"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Release plan for 1.0.0 (3 update(s)):"))
        .stdout(predicate::str::contains("1. CHANGELOG.md [changelog]"))
        .stdout(predicate::str::contains(
            "pins 3 package(s): demo, demo-core, demo-app",
        ));
}

#[test]
fn test_plan_json_output() {
    let temp = create_workspace();

    let output = lockstep()
        .args(["plan", "--release-version", "1.0.0", "--skip-changelog", "--output", "json", "--root"])
        .arg(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let updates = json["updates"].as_array().unwrap();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0]["path"], "Cargo.toml");
    assert_eq!(updates[0]["updater"]["type"], "workspaceManifest");
    assert_eq!(updates[1]["updater"]["versions"]["demo-app"], "1.0.0");
}

#[test]
fn test_plan_default_changelog_heading() {
    let temp = create_workspace();

    lockstep()
        .args(["plan", "--release-version", "1.0.0", "--output", "json", "--root"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"## \[1\.0\.0\] - \d{4}-\d{2}-\d{2}").unwrap());
}

#[test]
fn test_plan_diff_leaves_files_untouched() {
    let temp = create_workspace();

    lockstep()
        .args(["plan", "--release-version", "1.0.0", "--diff", "--root"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("+++ b/Cargo.lock"))
        .stdout(predicate::str::contains("+version = \"1.0.0\""));

    assert_eq!(
        fs::read_to_string(temp.path().join("Cargo.toml")).unwrap(),
        ROOT_MANIFEST
    );
    assert_eq!(
        fs::read_to_string(temp.path().join("Cargo.lock")).unwrap(),
        LOCKFILE
    );
    assert!(!temp.path().join("CHANGELOG.md").exists());
}

#[test]
fn test_plan_missing_member_warns() {
    let temp = create_workspace();
    fs::remove_file(temp.path().join("crates/app/Cargo.toml")).unwrap();

    lockstep()
        .args(["plan", "--release-version", "1.0.0", "--skip-changelog", "--root"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Warnings:"))
        .stdout(predicate::str::contains("member crates/app declared but manifest missing"));
}

#[test]
fn test_plan_without_workspace_fails() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "Cargo.toml", "[package]\nname = \"solo\"\nversion = \"0.1.0\"\n");

    lockstep()
        .args(["plan", "--release-version", "0.2.0", "--root"])
        .arg(temp.path())
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("requires a workspace in root manifest"));
}

#[test]
fn test_plan_invalid_version_fails() {
    let temp = create_workspace();

    lockstep()
        .args(["plan", "--release-version", "one.two", "--root"])
        .arg(temp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid version"));
}

#[test]
fn test_plan_respects_config_file() {
    let temp = create_workspace();
    write(
        temp.path(),
        "lockstep.toml",
        "[planner]\nchangelogPath = \"docs/CHANGES.md\"\n",
    );

    lockstep()
        .args(["plan", "--release-version", "1.0.0", "--root"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1. docs/CHANGES.md [changelog]"));
}
