//! End-to-end tests for the toolbelt binary

use assert_cmd::Command;
use predicates::prelude::*;
use toolbelt_test_utils::TestProject;

/// Get a Command for the toolbelt binary running inside `project`
fn toolbelt_cmd(project: &TestProject) -> Command {
    let mut cmd = Command::cargo_bin("toolbelt").expect("Failed to find toolbelt binary");
    cmd.current_dir(project.root())
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env("TMPDIR", project.path(".tmp"));
    std::fs::create_dir_all(project.path(".tmp")).unwrap();
    cmd
}

fn python_project() -> TestProject {
    let project = TestProject::new();
    project.write_file(
        "base.yaml",
        "variables:\n  TB_RUFF_VERSION: '0.5.0'\nglobal_exclude_patterns: ['build/']\n",
    );
    project.write_file(
        "toolbelt.yaml",
        r#"
include: base.yaml
variables:
  TB_RUFF_ARGS: "--fix --show-fixes"
profiles:
  python:
    extensions: [py]
    check_tools:
      - name: ruff-check
        command: ruff
        args: ["check", "${TB_RUFF_ARGS}"]
        description: Lint with ruff
    format_tools:
      - name: ruff-format
        command: uvx
        args: ["ruff@${TB_RUFF_VERSION}", "format"]
        file_handling_mode: batch
        default_target: "."
"#,
    );
    project
}

#[test]
fn test_no_command_shows_hint() {
    let project = TestProject::new();
    toolbelt_cmd(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("toolbelt --help"));
}

#[test]
fn test_config_lists_sources_in_load_order() {
    let project = python_project();

    let output = toolbelt_cmd(&project).arg("config").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let base_at = stdout.find("base.yaml").expect("base.yaml listed");
    let main_at = stdout.find("toolbelt.yaml").expect("toolbelt.yaml listed");
    assert!(base_at < main_at, "{stdout}");
    assert!(stdout.contains("TB_RUFF_VERSION"));
    assert!(stdout.contains("build/"));
}

#[test]
fn test_config_json_is_machine_readable() {
    let project = python_project();

    let output = toolbelt_cmd(&project)
        .args(["config", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["sources"].as_array().unwrap().len(), 2);
    assert_eq!(value["profiles"]["python"]["extensions"][0], ".py");
    assert_eq!(value["variables"]["TB_RUFF_VERSION"], "0.5.0");
}

#[test]
fn test_environment_overrides_config_variables() {
    let project = python_project();

    let output = toolbelt_cmd(&project)
        .env("TB_RUFF_VERSION", "9.9.9")
        .env("UNLISTED_SECRET", "hunter2")
        .args(["config", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["variables"]["TB_RUFF_VERSION"], "9.9.9");
    assert!(value["variables"].get("UNLISTED_SECRET").is_none());
}

#[test]
fn test_default_preset_without_config() {
    let project = TestProject::new();
    toolbelt_cmd(&project)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("__default__"))
        .stdout(predicate::str::contains("python"));
}

#[test]
fn test_list_shows_profile_tools() {
    let project = python_project();
    toolbelt_cmd(&project)
        .args(["list", "python"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ruff-check"))
        .stdout(predicate::str::contains("ruff-format"))
        .stdout(predicate::str::contains(".py"))
        .stdout(predicate::str::contains("batch"));
}

#[test]
fn test_list_unknown_profile_fails() {
    let project = python_project();
    toolbelt_cmd(&project)
        .args(["list", "rust"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown profile 'rust'"));
}

#[test]
fn test_command_expands_and_splits_arguments() {
    let project = python_project();
    toolbelt_cmd(&project)
        .args(["command", "python", "ruff-check", "a.py", "b.py"])
        .assert()
        .success()
        .stdout(predicate::str::diff("ruff check --fix --show-fixes a.py b.py\n"));
}

#[test]
fn test_command_batch_uses_default_target() {
    let project = python_project();
    toolbelt_cmd(&project)
        .args(["command", "python", "ruff-format"])
        .assert()
        .success()
        .stdout(predicate::str::diff("uvx ruff@0.5.0 format .\n"));
}

#[test]
fn test_command_unknown_tool_fails() {
    let project = python_project();
    toolbelt_cmd(&project)
        .args(["command", "python", "black"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown tool 'black'"))
        .stderr(predicate::str::contains("ruff-check, ruff-format"));
}

#[test]
fn test_explicit_config_flag() {
    let project = python_project();
    project.write_file("other.yaml", "profiles:\n  docs:\n    extensions: [md]\n");

    toolbelt_cmd(&project)
        .args(["--config", "other.yaml", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("docs"))
        .stdout(predicate::str::contains("python").not());
}

#[test]
fn test_invalid_yaml_reports_file() {
    let project = TestProject::new();
    project.write_file("toolbelt.yaml", "profiles: [oops\n");

    toolbelt_cmd(&project)
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("Error loading YAML config file"))
        .stderr(predicate::str::contains("toolbelt.yaml"));
}
