use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

const EXPORT: &str = "\
Responsável da conversa,Data e hora de entrada,Tempo de espera após atribuição
Naura Lima,03/06/2025 09:15,0:05
Diessy Rocha,03/06/2025 10:40,0:12:30
Naura Lima,04/06/2025 14:05,-
Equipe Geral,04/06/2025 15:00,0:02
";

fn write_export(dir: &Path) -> PathBuf {
    let path = dir.join("export.csv");
    std::fs::write(&path, EXPORT).unwrap();
    path
}

fn cmd() -> Command {
    Command::cargo_bin("support-duo-metrics").unwrap()
}

#[test]
fn metrics_prints_a_summary() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_export(dir.path());

    cmd()
        .args(["metrics", "--csv"])
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Analyzed 3 conversations over 2 day(s)",
        ))
        .stdout(predicate::str::contains("Naura: 2 conversations"))
        .stdout(predicate::str::contains("Diessy: 1 conversations"))
        .stdout(predicate::str::contains("Recommendations:"));
}

#[test]
fn metrics_json_is_well_formed() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_export(dir.path());

    let output = cmd()
        .args(["metrics", "--json", "--csv"])
        .arg(&export)
        .output()
        .unwrap();
    assert!(output.status.success());

    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["metrics"]["total_conversations"], 3);
    assert_eq!(payload["metrics"]["period_days"], 2);
    assert_eq!(payload["metrics"]["first"]["label"], "Naura");
    assert_eq!(
        payload["metrics"]["first"]["wait_distribution"]["no data"],
        1
    );
    assert_eq!(payload["insights"]["volume_leader"], "first");
}

#[test]
fn report_writes_markdown() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_export(dir.path());
    let out = dir.path().join("report.md");

    cmd()
        .args(["report", "--csv"])
        .arg(&export)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let rendered = std::fs::read_to_string(&out).unwrap();
    assert!(rendered.starts_with("# Support Performance Report"));
    assert!(rendered.contains("## Volume by Day"));
}

#[test]
fn day_scope_with_no_rows_reports_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_export(dir.path());

    cmd()
        .args(["metrics", "--date", "10/06/2025", "--csv"])
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No conversations recorded for the selected day.",
        ));
}

#[test]
fn day_scope_renders_hourly_volume() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_export(dir.path());
    let out = dir.path().join("day.md");

    cmd()
        .args(["report", "--date", "03/06/2025", "--csv"])
        .arg(&export)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let rendered = std::fs::read_to_string(&out).unwrap();
    assert!(rendered.contains("## Volume by Hour"));
    assert!(rendered.contains("on 03/06/2025"));
}

#[test]
fn missing_required_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.csv");
    std::fs::write(&path, "Número,Data e hora de entrada\n1,03/06/2025 09:15\n").unwrap();

    cmd()
        .args(["metrics", "--csv"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing a required column"));
}

#[test]
fn untracked_rows_report_nothing_to_analyze() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("others.csv");
    std::fs::write(
        &path,
        "Responsável da conversa,Data e hora de entrada,Tempo de espera após atribuição\n\
         Equipe Geral,03/06/2025 09:15,0:05\n",
    )
    .unwrap();

    cmd()
        .args(["metrics", "--csv"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No conversations assigned to"));
}

#[test]
fn discovers_the_export_in_the_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_export(dir.path());

    cmd()
        .arg("metrics")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Analyzed 3 conversations"));
}

#[test]
fn empty_directory_asks_for_a_csv() {
    let dir = tempfile::tempdir().unwrap();

    cmd()
        .arg("metrics")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no CSV export found"));
}

#[test]
fn invalid_scope_date_is_rejected() {
    cmd()
        .args(["metrics", "--date", "2025-06-03"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected a DD/MM/YYYY date"));
}
