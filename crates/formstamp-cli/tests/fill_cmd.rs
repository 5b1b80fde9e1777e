//! Integration tests for the `fill` subcommand.

mod common;

use common::{RECORD, cmd, leave_form, pdf_with_pages, write_file};
use predicates::prelude::*;

#[test]
fn fill_writes_output_and_reports_fields() {
    let dir = tempfile::tempdir().unwrap();
    let form = write_file(dir.path(), "blank.pdf", &leave_form());
    let record = write_file(dir.path(), "record.json", RECORD.as_bytes());
    let output = dir.path().join("out/nested/filled.pdf");

    cmd()
        .arg("fill")
        .arg("--input")
        .arg(&form)
        .arg("--output")
        .arg(&output)
        .arg("--record")
        .arg(&record)
        .assert()
        .success()
        .stdout(predicate::str::contains("employee_name\t1\t"))
        .stdout(predicate::str::contains("serious_condition\t2\t487.30\t513.90"));

    assert!(output.exists());
    cmd()
        .arg("text")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Jordan Lee"))
        .stdout(predicate::str::contains("2026-03-02"));
}

#[test]
fn fill_json_report_lists_skipped_fields() {
    let dir = tempfile::tempdir().unwrap();
    let form = write_file(dir.path(), "blank.pdf", &leave_form());
    let record = write_file(
        dir.path(),
        "record.json",
        br#"{"employeeInformation": {"fullName": "Jordan Lee"}}"#,
    );
    let output = dir.path().join("filled.pdf");

    let out = cmd()
        .arg("fill")
        .arg("--input")
        .arg(&form)
        .arg("--output")
        .arg(&output)
        .arg("--record")
        .arg(&record)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["applied"].as_array().unwrap().len(), 7);
    let skipped: Vec<&str> = report["skipped"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["field"].as_str().unwrap())
        .collect();
    assert_eq!(skipped, vec!["date_commenced"]);
}

#[test]
fn fill_without_name_line_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let form = write_file(
        dir.path(),
        "blank.pdf",
        &pdf_with_pages(&[&[(72.0, 700.0, "Signature: ____")], &[]]),
    );
    let record = write_file(dir.path(), "record.json", RECORD.as_bytes());
    let output = dir.path().join("filled.pdf");

    cmd()
        .arg("fill")
        .arg("--input")
        .arg(&form)
        .arg("--output")
        .arg(&output)
        .arg("--record")
        .arg(&record)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("employee_name"));
    assert!(!output.exists());
}

#[test]
fn fill_rejects_malformed_record() {
    let dir = tempfile::tempdir().unwrap();
    let form = write_file(dir.path(), "blank.pdf", &leave_form());
    let record = write_file(dir.path(), "record.json", b"{ not json");

    cmd()
        .arg("fill")
        .arg("--input")
        .arg(&form)
        .arg("--output")
        .arg(dir.path().join("filled.pdf"))
        .arg("--record")
        .arg(&record)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid leave record"));
}

#[test]
fn fill_with_custom_template() {
    let dir = tempfile::tempdir().unwrap();
    let form = write_file(dir.path(), "blank.pdf", &leave_form());
    let record = write_file(dir.path(), "record.json", RECORD.as_bytes());
    // Same layout with the name pinned to the patient line.
    let template = include_str!("../../formstamp/templates/medical_leave.toml").replace(
        "strategy = \"text-search\"",
        "strategy = \"text-search\"\nrole = \"patient\"",
    );
    let template = write_file(dir.path(), "form.toml", template.as_bytes());
    let output = dir.path().join("filled.pdf");

    let out = cmd()
        .arg("fill")
        .arg("--input")
        .arg(&form)
        .arg("--output")
        .arg(&output)
        .arg("--record")
        .arg(&record)
        .arg("--template")
        .arg(&template)
        .args(["--format", "json", "-v"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let name = &report["applied"][0];
    assert_eq!(name["field"], "employee_name");
    assert!(name["y"].as_f64().unwrap() > 590.0);
    assert!(String::from_utf8_lossy(&out.stderr).contains("applied field"));
}
