use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn jobtrack(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("jobtrack").expect("binary built");
    cmd.env("JOBTRACK_DB", dir.path().join("tracker.db"))
        .env_remove("RUST_LOG");
    cmd
}

fn add(dir: &TempDir, args: &[&str]) -> String {
    let output = jobtrack(dir)
        .arg("add")
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).expect("utf8 stdout");
    stdout
        .trim()
        .strip_prefix("Added application ")
        .expect("add prints the new id")
        .to_string()
}

#[test]
fn add_list_and_remove() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let google = add(&dir, &["--company", "Google", "--role", "SWE", "--date", "2024-01-02"]);
    add(
        &dir,
        &["--company", "Meta", "--role", "PM", "--date", "2024-01-01", "--status", "rejected"],
    );

    jobtrack(&dir)
        .args(["list", "--search", "go"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Google").and(predicate::str::contains("Meta").not()));

    jobtrack(&dir)
        .args(["list", "--status", "rejected"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Meta").and(predicate::str::contains("Google").not()));

    jobtrack(&dir).args(["rm", &google]).assert().success();
    jobtrack(&dir)
        .args(["rm", &google])
        .assert()
        .success()
        .stdout(predicate::str::contains("No application matches"));

    jobtrack(&dir)
        .args(["list", "--search", "go"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No applications found."));
    Ok(())
}

#[test]
fn add_requires_non_empty_company() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    jobtrack(&dir)
        .args(["add", "--company", " ", "--role", "SWE"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("companyName is required"));

    jobtrack(&dir)
        .args(["stats", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\": 0"));
    Ok(())
}

#[test]
fn edit_changes_only_given_fields() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let id = add(
        &dir,
        &["--company", "Acme", "--role", "SWE", "--team", "Infra", "--priority", "high"],
    );

    jobtrack(&dir)
        .args(["edit", &id[..8], "--status", "interviewing", "--round", "technical"])
        .assert()
        .success();

    jobtrack(&dir)
        .args(["show", &id])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Team: Infra")
                .and(predicate::str::contains("Priority: High"))
                .and(predicate::str::contains("Status: Interviewing"))
                .and(predicate::str::contains("Interview round: Technical")),
        );

    jobtrack(&dir)
        .args(["edit", "does-not-exist", "--status", "accepted"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
    Ok(())
}

#[test]
fn stats_and_board_report_every_status() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    add(&dir, &["--company", "A", "--role", "SWE"]);
    add(&dir, &["--company", "B", "--role", "SWE"]);
    add(&dir, &["--company", "C", "--role", "SWE", "--status", "accepted"]);

    let output = jobtrack(&dir)
        .args(["stats", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let summary: Value = serde_json::from_slice(&output)?;
    assert_eq!(summary["total"], 3);
    assert_eq!(summary["countsByStatus"]["Applied"], 2);
    assert_eq!(summary["countsByStatus"]["Interviewing"], 0);
    assert_eq!(summary["countsByStatus"]["Accepted"], 1);
    assert_eq!(summary["countsByStatus"]["Rejected"], 0);

    jobtrack(&dir)
        .arg("board")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("== Applied (2) ==")
                .and(predicate::str::contains("== Interviewing (0) =="))
                .and(predicate::str::contains("== Accepted (1) ==")),
        );
    Ok(())
}

#[test]
fn rejects_malformed_arguments() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    jobtrack(&dir)
        .args(["add", "--company", "A", "--role", "B", "--date", "01/02/2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));

    jobtrack(&dir)
        .args(["list", "--sort", "salary"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid sort field"));
    Ok(())
}
