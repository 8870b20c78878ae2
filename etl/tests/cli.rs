//! Runs the `disaster-etl` binary and checks what the shell sees.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn etl() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_disaster-etl"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn wrong_arity_prints_usage_and_succeeds() {
    let output = etl().arg("only-one.csv").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Please provide the filepaths of the messages and categories"));
    assert!(stdout.contains("Example: disaster-etl"));
}

#[test]
fn happy_path_prints_progress() {
    let dir = TempDir::new().unwrap();
    let messages = dir.path().join("messages.csv");
    let categories = dir.path().join("categories.csv");
    let db = dir.path().join("out.db");
    fs::write(&messages, "id,text\n1,help\n2,food\n").unwrap();
    fs::write(&categories, "id,categories\n1,related-1;request-0\n").unwrap();

    let output = etl().arg(&messages).arg(&categories).arg(&db).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let expected = format!(
        "Loading data...\n    MESSAGES: {}\n    CATEGORIES: {}\nCleaning data...\nSaving data...\n    DATABASE: {}\nCleaned data saved to database!\n",
        messages.display(),
        categories.display(),
        db.display()
    );
    assert_eq!(stdout, expected);
}

#[test]
fn failing_stage_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let messages = dir.path().join("messages.csv");
    let categories = dir.path().join("categories.csv");
    fs::write(&messages, "id,text\n1,help\n").unwrap();
    fs::write(&categories, "id,categories\n1,related-x\n").unwrap();

    let output = etl()
        .arg(&messages)
        .arg(&categories)
        .arg(dir.path().join("out.db"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error during cleaning"));
}
