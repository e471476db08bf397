#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn rota(store: &Path) -> Command {
    let mut cmd = Command::cargo_bin("organ-rota").unwrap();
    cmd.arg("--store").arg(store);
    cmd
}

#[test]
fn generate_persists_counts_unless_dry_run() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("rota.json");

    rota(&store)
        .args(["set-church", "--name", "Central", "--days", "sun,wed"])
        .assert()
        .success();
    for name in ["Ana", "Bia", "Cida"] {
        rota(&store)
            .args(["add-organist", "--name", name, "--days", "0"])
            .assert()
            .success();
    }
    rota(&store)
        .args(["add-organist", "--name", "Ana"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    rota(&store)
        .args([
            "generate", "--start", "2024-02-01", "--end", "2024-02-29", "--seed", "1", "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-02-07 | Wed |"))
        .stdout(predicate::str::contains("(unavailable)"))
        .stdout(predicate::str::contains(
            "services: 8 | organists: 3 | mean: 2.67 | std dev: 0.47 | spread: 1",
        ));
    rota(&store)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana | Sun | 0"));

    let grid = dir.path().join("grid.csv");
    rota(&store)
        .args(["generate", "--start", "2024-02-01", "--end", "2024-02-29", "--seed", "1"])
        .arg("--out-grid")
        .arg(&grid)
        .assert()
        .success();
    assert!(std::fs::read_to_string(&grid)
        .unwrap()
        .starts_with("CENTRAL - FEBRUARY 2024"));
    rota(&store)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Central | Sun, Wed"))
        .stdout(predicate::str::contains("Ana | Sun | 0").not());
}

#[test]
fn generate_reports_invalid_period() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("rota.json");
    rota(&store)
        .args(["set-church", "--name", "Central", "--days", "0"])
        .assert()
        .success();
    rota(&store)
        .args(["add-organist", "--name", "Ana"])
        .assert()
        .success();
    rota(&store)
        .args(["generate", "--start", "2024-03-10", "--end", "2024-03-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid period"));
}

#[test]
fn import_rejects_duplicate_ids() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("rota.json");
    let csv = dir.path().join("organists.csv");
    std::fs::write(&csv, "name,preferred_days,play_count,id\nAna,0,,x\nBia,0,,x\n").unwrap();

    rota(&store)
        .arg("import-organists")
        .arg("--csv")
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("organist id already exists: x"));
    assert!(!store.exists());

    std::fs::write(&csv, "name,preferred_days,play_count,id\nAna,0,,x\n").unwrap();
    rota(&store)
        .arg("import-organists")
        .arg("--csv")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 organist(s)"));
    // même id ou même nom qu'un enregistrement existant
    std::fs::write(&csv, "name,preferred_days,play_count,id\nBia,0,,x\n").unwrap();
    rota(&store)
        .arg("import-organists")
        .arg("--csv")
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("organist id already exists: x"));
    std::fs::write(&csv, "name,preferred_days,play_count,id\nAna,0,,y\n").unwrap();
    rota(&store)
        .arg("import-organists")
        .arg("--csv")
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("organist already exists: Ana"));
}
