#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd!

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("drift").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Detect drift"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("gen-driftignore"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("drift").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("driftflow"));
}

#[test]
fn test_scan_help() {
    let mut cmd = Command::cargo_bin("drift").unwrap();
    cmd.arg("scan")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--from"))
        .stdout(predicate::str::contains("--snapshot"))
        .stdout(predicate::str::contains("--parallelism"))
        .stdout(predicate::str::contains("--only-types"));
}

#[test]
fn test_scan_requires_snapshot() {
    let mut cmd = Command::cargo_bin("drift").unwrap();
    cmd.args(["scan", "--from", "terraform.tfstate"])
        .env_remove("DRIFT_STATE")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--snapshot"));
}

#[test]
fn test_gen_driftignore_help() {
    let mut cmd = Command::cargo_bin("drift").unwrap();
    cmd.arg("gen-driftignore")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--exclude-unmanaged"))
        .stdout(predicate::str::contains("--exclude-deleted"))
        .stdout(predicate::str::contains("--exclude-drifted"));
}
