use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn pygrade() -> Command {
    let mut cmd = Command::cargo_bin("pygrade").unwrap();
    cmd.env_remove("PYGRADE_DB");
    cmd
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn check_valid_file_reports_beginner() {
    let tmp = tempfile::tempdir().unwrap();
    let file = write_file(tmp.path(), "soma.py", "def soma(a, b):\n    return a + b\n");

    pygrade()
        .arg("check")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Syntax:   valid"))
        .stdout(predicate::str::contains("beginner (25/100)"));
}

#[test]
fn check_broken_file_reports_error_but_exits_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let file = write_file(tmp.path(), "broken.py", "def f(:\n  pass\n");

    pygrade()
        .arg("check")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("invalid syntax"))
        .stdout(predicate::str::contains("with_errors (25/100)"));
}

#[test]
fn check_bmi_file_reports_critical() {
    let tmp = tempfile::tempdir().unwrap();
    let file = write_file(
        tmp.path(),
        "bmi.py",
        "peso = float(input())\naltura = float(input())\nimc = peso / (altura * altura)\nprint(imc)\n",
    );

    pygrade()
        .arg("check")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("critical (50/100)"))
        .stdout(predicate::str::contains("BMI exercise"));
}

#[test]
fn check_stdin_submission() {
    pygrade()
        .arg("check")
        .arg("-")
        .write_stdin("x = 1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("empty (0/100)"));
}

#[test]
fn check_json_output_is_parsable() {
    let tmp = tempfile::tempdir().unwrap();
    let file = write_file(tmp.path(), "soma.py", "def soma(a, b):\n    return a + b\n");

    let output = pygrade()
        .arg("check")
        .arg("--json")
        .arg(&file)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let reports: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let report = &reports.as_array().unwrap()[0];
    assert_eq!(report["valid"], true);
    assert_eq!(report["skill_assessment"]["level"], "beginner");
    // missing docstring shows up in suggestions
    assert!(!report["suggestions"].as_array().unwrap().is_empty());
}

#[test]
fn check_missing_file_fails() {
    pygrade()
        .arg("check")
        .arg("/nonexistent/nope.py")
        .assert()
        .failure();
}

#[test]
fn check_bad_python_version_is_config_error() {
    let tmp = tempfile::tempdir().unwrap();
    let file = write_file(tmp.path(), "x.py", "x = 1\n");

    pygrade()
        .arg("check")
        .arg("--python-version")
        .arg("4")
        .arg(&file)
        .assert()
        .failure()
        .code(2);
}

#[test]
fn save_then_history_show_delete() {
    let tmp = tempfile::tempdir().unwrap();
    let db = tmp.path().join("analyses.db");
    let file = write_file(tmp.path(), "soma.py", "def soma(a, b):\n    return a + b\n");

    pygrade()
        .arg("check")
        .arg("--save")
        .arg("--db")
        .arg(&db)
        .arg(&file)
        .assert()
        .success();

    pygrade()
        .arg("history")
        .arg("--db")
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("soma.py"))
        .stdout(predicate::str::contains("beginner"));

    pygrade()
        .arg("show")
        .arg("1")
        .arg("--db")
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("def soma(a, b):"));

    pygrade()
        .arg("delete")
        .arg("1")
        .arg("--db")
        .arg(&db)
        .assert()
        .success();

    pygrade()
        .arg("history")
        .arg("--db")
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("No stored analyses."));
}

#[test]
fn show_unknown_id_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let db = tmp.path().join("analyses.db");

    pygrade()
        .arg("show")
        .arg("42")
        .arg("--db")
        .arg(&db)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn batch_reports_every_file_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    let good = write_file(tmp.path(), "good.py", "def f():\n    \"\"\"Doc.\"\"\"\n    return 1\n");
    let bad = write_file(tmp.path(), "bad.py", "def g(:\n");

    let output = pygrade()
        .arg("check")
        .arg(&good)
        .arg(&bad)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).unwrap();
    let good_pos = text.find("good.py").unwrap();
    let bad_pos = text.find("bad.py").unwrap();
    assert!(good_pos < bad_pos);
}
