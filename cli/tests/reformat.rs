use anyhow::Context;
use assert_cmd::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn patchfmt() -> anyhow::Result<Command> {
    Command::cargo_bin("patchfmt").context("should find binary for patchfmt")
}

#[test]
fn test_identity_formatter_prints_document_unchanged() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let file = tmp.path().join("doc.txt");
    fs::write(&file, "alpha\nbeta\n")?;

    patchfmt()?
        .arg(&file)
        .arg("--")
        .arg("cat")
        .assert()
        .success()
        .stdout("alpha\nbeta\n")
        .stderr(predicates::str::is_empty());
    Ok(())
}

#[test]
fn test_patched_document_matches_formatter_output() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let file = tmp.path().join("doc.txt");
    fs::write(&file, "hello\nworld\n")?;

    patchfmt()?
        .arg(&file)
        .arg("--")
        .args(["tr", "a-z", "A-Z"])
        .assert()
        .success()
        .stdout("HELLO\nWORLD\n")
        .stderr(predicates::str::is_empty());
    // Without --write the file itself is untouched.
    assert_eq!(fs::read_to_string(&file)?, "hello\nworld\n");
    Ok(())
}

#[test]
fn test_write_rewrites_the_file_in_place() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let file = tmp.path().join("doc.txt");
    fs::write(&file, "hello\nworld\n")?;

    patchfmt()?
        .arg("-w")
        .arg(&file)
        .arg("--")
        .args(["tr", "a-z", "A-Z"])
        .assert()
        .success()
        .stdout(predicates::str::is_empty())
        .stderr(predicates::str::is_empty());
    assert_eq!(fs::read_to_string(&file)?, "HELLO\nWORLD\n");
    Ok(())
}

#[test]
fn test_combined_output_splits_report_from_document() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let file = tmp.path().join("doc.txt");
    fs::write(&file, "alpha\nbeta\n")?;

    // A formatter that multiplexes its report onto stdout behind a
    // delimiter line: the document comes through untouched, the report
    // lands on stderr.
    patchfmt()?
        .arg("--combined-output")
        .arg(&file)
        .arg("--")
        .args(["sh", "-c", "cat && echo ======== && echo 'warning: soft tabs'"])
        .assert()
        .success()
        .stdout("alpha\nbeta\n")
        .stderr("warning: soft tabs\n");
    Ok(())
}

#[test]
fn test_formatter_failure_aborts_without_patching() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let file = tmp.path().join("doc.txt");
    fs::write(&file, "alpha\n")?;

    patchfmt()?
        .arg("-w")
        .arg(&file)
        .arg("--")
        .args(["sh", "-c", "echo 'doc.txt:1: parse error' >&2; exit 3"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("parse error"));
    assert_eq!(fs::read_to_string(&file)?, "alpha\n");
    Ok(())
}

#[test]
fn test_missing_file_is_an_error() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    patchfmt()?
        .arg(tmp.path().join("absent.txt"))
        .arg("--")
        .arg("cat")
        .assert()
        .failure()
        .stderr(predicates::str::contains("failed to read"));
    Ok(())
}

#[test]
fn test_formatter_that_ignores_stdin_still_works() -> anyhow::Result<()> {
    // `true` exits immediately without draining stdin; the resulting broken
    // pipe must not be reported as a patchfmt error, and the empty output
    // empties the document.
    let tmp = tempdir()?;
    let file = tmp.path().join("doc.txt");
    fs::write(&file, "alpha\nbeta\n")?;

    patchfmt()?
        .arg(&file)
        .arg("--")
        .arg("true")
        .assert()
        .success()
        .stdout(predicates::str::is_empty());
    Ok(())
}
