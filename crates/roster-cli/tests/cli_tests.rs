//! CLI integration tests using assert_cmd.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A `roster` command isolated from any config in the real cwd or home.
fn roster(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("roster").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("ROSTER_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn apply_text_output() {
    let dir = TempDir::new().unwrap();

    roster(&dir)
        .arg("apply")
        .arg("--script")
        .arg(fixture("kickoff.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Script: Kickoff (6 ops)"))
        .stdout(predicate::str::contains("[#1] add: added 12345678900 (Ana)"))
        .stdout(predicate::str::contains("[#4] remove: removed 98765432100"))
        .stdout(predicate::str::contains(
            "[#5] find: found 12345678900: Ana Maria <ana.maria@x.com>",
        ))
        .stdout(predicate::str::contains("[#6] count: count = 1"))
        .stdout(predicate::str::contains("123.456.789-00"))
        .stdout(predicate::str::contains("A=5"))
        .stdout(predicate::str::contains("B=1").not());
}

#[test]
fn apply_json_output() {
    let dir = TempDir::new().unwrap();

    let output = roster(&dir)
        .arg("apply")
        .arg("--script")
        .arg(fixture("kickoff.toml"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let report = &reports[0];
    assert_eq!(report["script"], "Kickoff");
    assert_eq!(report["failed"], 0);
    assert_eq!(report["ops"][2]["outcome"]["outcome"], "updated");
    assert_eq!(report["roster"][0]["cpf"], "12345678900");
    assert_eq!(report["roster"][0]["evaluations"][0]["goal"], "A");
    assert_eq!(report["roster"][0]["evaluations"][0]["grade"], 5.0);
}

#[test]
fn apply_reports_failures_and_exits_nonzero() {
    let dir = TempDir::new().unwrap();

    roster(&dir)
        .arg("apply")
        .arg("--script")
        .arg(fixture("conflicts.toml"))
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "FAILED: student with CPF 11122233344 already exists",
        ))
        .stdout(predicate::str::contains(
            "FAILED: student with CPF 55566677788 not found",
        ))
        .stdout(predicate::str::contains("[#4] count: count = 1"))
        .stderr(predicate::str::contains("Error: 2 op(s) failed"));
}

#[test]
fn apply_stop_on_error() {
    let dir = TempDir::new().unwrap();

    roster(&dir)
        .arg("apply")
        .arg("--script")
        .arg(fixture("conflicts.toml"))
        .arg("--stop-on-error")
        .assert()
        .failure()
        .stdout(predicate::str::contains("stopped after first failure"))
        .stdout(predicate::str::contains("[#3]").not())
        .stderr(predicate::str::contains("Error: 1 op(s) failed"));
}

#[test]
fn apply_uses_config_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("roster.toml"),
        "default_format = \"json\"\n",
    )
    .unwrap();

    let output = roster(&dir)
        .arg("apply")
        .arg("--script")
        .arg(fixture("kickoff.toml"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["script"], "Kickoff");
}

#[test]
fn apply_format_from_env() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("roster.toml"), "default_format = \"text\"\n").unwrap();

    let output = roster(&dir)
        .env("ROSTER_FORMAT", "json")
        .arg("apply")
        .arg("--script")
        .arg(fixture("kickoff.toml"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["script"], "Kickoff");
}

#[test]
fn apply_rejects_unknown_env_format() {
    let dir = TempDir::new().unwrap();

    roster(&dir)
        .env("ROSTER_FORMAT", "xml")
        .arg("apply")
        .arg("--script")
        .arg(fixture("kickoff.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("ROSTER_FORMAT: unknown output format: xml"));
}

#[test]
fn apply_hides_summary_when_disabled() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("roster.toml"), "show_summary = false\n").unwrap();

    roster(&dir)
        .arg("apply")
        .arg("--script")
        .arg(fixture("kickoff.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Script: Kickoff (6 ops)"))
        .stdout(predicate::str::contains("[#6] count: count = 1"))
        .stdout(predicate::str::contains("Evaluations").not())
        .stdout(predicate::str::contains("123.456.789-00").not());
}

#[test]
fn apply_reads_global_config() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join(".config").join("roster");
    std::fs::create_dir_all(&global).unwrap();
    std::fs::write(global.join("config.toml"), "default_format = \"json\"\n").unwrap();

    let output = roster(&dir)
        .arg("apply")
        .arg("--script")
        .arg(fixture("kickoff.toml"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["failed"], 0);
}

#[test]
fn apply_prefers_local_config_over_global() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join(".config").join("roster");
    std::fs::create_dir_all(&global).unwrap();
    std::fs::write(global.join("config.toml"), "default_format = \"json\"\n").unwrap();
    std::fs::write(dir.path().join("roster.toml"), "default_format = \"text\"\n").unwrap();

    roster(&dir)
        .arg("apply")
        .arg("--script")
        .arg(fixture("kickoff.toml"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Script: Kickoff"));
}

#[test]
fn apply_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();

    roster(&dir)
        .arg("apply")
        .arg("--script")
        .arg(fixture("kickoff.toml"))
        .arg("--format")
        .arg("yaml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown output format: yaml"));
}

#[test]
fn validate_valid_script() {
    let dir = TempDir::new().unwrap();

    roster(&dir)
        .arg("validate")
        .arg("--script")
        .arg(fixture("kickoff.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Script: Kickoff (6 ops)"))
        .stdout(predicate::str::contains("All scripts valid."));
}

#[test]
fn validate_reports_predicted_failures() {
    let dir = TempDir::new().unwrap();

    roster(&dir)
        .arg("validate")
        .arg("--script")
        .arg(fixture("conflicts.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[#2] WARNING: add of 11122233344 will fail: CPF already present",
        ))
        .stdout(predicate::str::contains(
            "[#3] WARNING: update of 55566677788 will fail: CPF not present",
        ))
        .stdout(predicate::str::contains("2 warning(s) found."));
}

#[test]
fn validate_directory() {
    let dir = TempDir::new().unwrap();

    roster(&dir)
        .arg("validate")
        .arg("--script")
        .arg(fixture(""))
        .assert()
        .success()
        .stdout(predicate::str::contains("Script: Conflicts"))
        .stdout(predicate::str::contains("Script: Kickoff"));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();

    roster(&dir)
        .arg("validate")
        .arg("--script")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn validate_rejects_missing_config() {
    let dir = TempDir::new().unwrap();

    roster(&dir)
        .arg("validate")
        .arg("--script")
        .arg(fixture("kickoff.toml"))
        .arg("--config")
        .arg("missing.toml")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Script:").not())
        .stderr(predicate::str::contains("config file not found: missing.toml"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    roster(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created roster.toml"))
        .stdout(predicate::str::contains("Created scripts/example.toml"))
        .stdout(predicate::str::contains("roster validate"));

    assert!(dir.path().join("roster.toml").exists());
    assert!(dir.path().join("scripts/example.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    roster(&dir).arg("init").assert().success();

    roster(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn init_then_apply_default_script_dir() {
    let dir = TempDir::new().unwrap();

    roster(&dir).arg("init").assert().success();

    roster(&dir)
        .arg("apply")
        .assert()
        .success()
        .stdout(predicate::str::contains("Script: Example (6 ops)"))
        .stdout(predicate::str::contains("[#6] count: count = 1"));

    roster(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("All scripts valid."));
}
