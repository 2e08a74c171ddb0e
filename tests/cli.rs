//! End-to-end tests driving the `sportrent` binary against scratch projects.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::path::Path;
use std::process::{Command, Output};

fn sportrent(project: &Path, args: &[&str]) -> Output {
    sportrent_with_env(project, args, &[])
}

fn sportrent_with_env(project: &Path, args: &[&str], env: &[(&str, &str)]) -> Output {
    let empty_path = project.join(".empty-path");
    std::fs::create_dir_all(&empty_path).unwrap();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sportrent"));
    cmd.args(args)
        .arg("--project")
        .arg(project)
        .env("PATH", &empty_path)
        .env("RUST_LOG", "error")
        .env_remove("SPORTRENT_PROJECT_DIR")
        .env_remove("SPORTRENT_DATABASE")
        .env_remove("SPORTRENT_BACKUPS_DIR")
        .env_remove("SPORTRENT_APP_DIR");
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd.output().expect("binary should start")
}

fn with_database(root: &Path) {
    std::fs::create_dir_all(root.join("sportrent")).unwrap();
    std::fs::write(root.join("sportrent").join("db.sqlite3"), b"SQLite format 3\0").unwrap();
}

fn backup_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map_or(0, Iterator::count)
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn with_entry_point(root: &Path) {
    std::fs::create_dir_all(root.join("sportrent")).unwrap();
    std::fs::write(root.join("sportrent").join("manage.py"), "").unwrap();
}

#[test]
fn backup_without_database_fails_and_creates_nothing() {
    let tmp = tempfile::tempdir().unwrap();

    let output = sportrent(tmp.path(), &["backup"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("database file not found"));
    assert!(!tmp.path().join("backups").exists());
}

#[test]
fn backup_copies_database_to_timestamped_file() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(tmp.path().join("sportrent")).unwrap();
    let contents = b"SQLite format 3\0pretend pages".repeat(100);
    std::fs::write(tmp.path().join("sportrent").join("db.sqlite3"), &contents).unwrap();

    let output = sportrent(tmp.path(), &["backup"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let files: Vec<_> = std::fs::read_dir(tmp.path().join("backups"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("db-") && name.ends_with(".sqlite3"), "{name}");
    assert_eq!(name.len(), "db-YYYYMMDD-HHMMSS.sqlite3".len());
    assert_eq!(std::fs::read(&files[0]).unwrap(), contents);

    let printed = String::from_utf8_lossy(&output.stdout);
    assert!(printed.trim().ends_with(&name));
}

#[test]
fn serve_without_daphne_fails_with_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    with_entry_point(tmp.path());

    let output = sportrent(tmp.path(), &["serve"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("executable not found: daphne"));
}

#[test]
fn bootstrap_without_entry_point_fails() {
    let tmp = tempfile::tempdir().unwrap();

    let output = sportrent(tmp.path(), &["bootstrap"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("entry-point file not found"));
    assert!(!tmp.path().join("venv").exists());
}

#[test]
fn seed_without_environment_fails() {
    let tmp = tempfile::tempdir().unwrap();
    with_entry_point(tmp.path());

    let output = sportrent(tmp.path(), &["seed"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("virtual environment not found"));
}

#[test]
fn status_json_describes_empty_project() {
    let tmp = tempfile::tempdir().unwrap();

    let output = sportrent(tmp.path(), &["status", "--json"]);

    assert!(output.status.success(), "{}", stderr(&output));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["bind_address"], "127.0.0.1:8000");
    assert_eq!(report["entry_point"]["present"], false);
    assert_eq!(report["backups"]["count"], 0);
}

#[test]
fn prune_after_backups_keeps_newest() {
    let tmp = tempfile::tempdir().unwrap();
    let backups = tmp.path().join("backups");
    std::fs::create_dir_all(&backups).unwrap();
    for stamp in ["20260101-010101", "20260102-010101", "20260103-010101"] {
        std::fs::write(backups.join(format!("db-{stamp}.sqlite3")), stamp).unwrap();
    }

    let output = sportrent(tmp.path(), &["backup", "prune", "--keep", "1"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let left: Vec<_> = std::fs::read_dir(&backups)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(left, vec!["db-20260103-010101.sqlite3"]);
}

#[test]
fn dotenv_in_project_root_configures_backups_dir() {
    let tmp = tempfile::tempdir().unwrap();
    with_database(tmp.path());
    std::fs::write(tmp.path().join(".env"), "SPORTRENT_BACKUPS_DIR=alt\n").unwrap();

    let output = sportrent(tmp.path(), &["backup"]);
    assert!(output.status.success(), "{}", stderr(&output));

    assert_eq!(backup_count(&tmp.path().join("alt")), 1);
    assert!(!tmp.path().join("backups").exists());
}

#[test]
fn process_environment_wins_over_dotenv() {
    let tmp = tempfile::tempdir().unwrap();
    with_database(tmp.path());
    std::fs::write(tmp.path().join(".env"), "SPORTRENT_BACKUPS_DIR=alt\n").unwrap();

    let output = sportrent_with_env(
        tmp.path(),
        &["backup"],
        &[("SPORTRENT_BACKUPS_DIR", "from-env")],
    );
    assert!(output.status.success(), "{}", stderr(&output));

    assert_eq!(backup_count(&tmp.path().join("from-env")), 1);
    assert!(!tmp.path().join("alt").exists());
}

#[test]
fn invalid_probe_timeout_fails_before_probing() {
    let tmp = tempfile::tempdir().unwrap();

    let output = sportrent_with_env(
        tmp.path(),
        &["probe"],
        &[("SPORTRENT_PROBE_TIMEOUT_SECS", "0")],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("SPORTRENT_PROBE_TIMEOUT_SECS"));
}
