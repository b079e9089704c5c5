//! Integration tests for the cropass CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! The master password is supplied through `CROPASS_PASSWORD` so no
//! terminal is needed; `add` reads the site password from piped stdin.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

/// Helper: a cropass command pointed at `dir` with a fixed master password.
fn cropass(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("cropass").expect("binary should exist");
    cmd.env_remove("CROPASS_PASS_DIR")
        .env("CROPASS_PASSWORD", "master-pw")
        .arg("--dir")
        .arg(dir.path());
    cmd
}

#[test]
fn help_flag_shows_usage() {
    #[allow(deprecated)]
    Command::cargo_bin("cropass")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local encrypted password store"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn no_args_shows_help() {
    #[allow(deprecated)]
    Command::cargo_bin("cropass")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn new_then_show_prints_record() {
    let tmp = TempDir::new().unwrap();

    cropass(&tmp)
        .args(["new", "example.com", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"example\.com alice [A-Za-z0-9]{16} \d+").unwrap());

    tmp.child("cropass-secret").assert(predicate::path::exists());

    cropass(&tmp)
        .args(["show", "example"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("example.com alice "));
}

#[test]
fn add_reads_site_password_from_stdin() {
    let tmp = TempDir::new().unwrap();

    cropass(&tmp)
        .args(["add", "github.com", "bob"])
        .write_stdin("hunter2\n")
        .assert()
        .success();

    cropass(&tmp)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("github.com bob hunter2 "));
}

#[test]
fn add_rejects_password_with_spaces() {
    let tmp = TempDir::new().unwrap();

    cropass(&tmp)
        .args(["add", "github.com", "bob"])
        .write_stdin("two words\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed record"));

    tmp.child("cropass-secret").assert(predicate::path::missing());
}

#[test]
fn show_filters_by_site() {
    let tmp = TempDir::new().unwrap();
    let import = tmp.child("import.txt");
    import
        .write_str("example.com alice s3cr3t 1700000000\ngithub.com bob hunter2 1700000100\n")
        .unwrap();

    cropass(&tmp).arg("import").arg(import.path()).assert().success();

    cropass(&tmp)
        .args(["show", "github"])
        .assert()
        .success()
        .stdout(predicate::str::contains("github.com bob hunter2 1700000100"))
        .stdout(predicate::str::contains("example.com").not());
}

#[test]
fn import_reset_replaces_records_and_keeps_backup() {
    let tmp = TempDir::new().unwrap();
    let first = tmp.child("first.txt");
    first.write_str("old.com u p 1\n").unwrap();
    let second = tmp.child("second.txt");
    second.write_str("new.com u p 2\n").unwrap();

    cropass(&tmp).arg("import").arg(first.path()).assert().success();
    cropass(&tmp)
        .arg("import")
        .arg(second.path())
        .arg("--reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Previous container kept as"));

    cropass(&tmp)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("new.com u p 2"))
        .stdout(predicate::str::contains("old.com").not());
}

#[test]
fn import_with_bad_line_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let import = tmp.child("bad.txt");
    import.write_str("a.com u p 1\nb.com u p notanumber\n").unwrap();

    cropass(&tmp)
        .arg("import")
        .arg(import.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timestamp"));

    tmp.child("cropass-secret").assert(predicate::path::missing());
}

#[test]
fn import_missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    cropass(&tmp)
        .args(["import", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn list_hides_passwords() {
    let tmp = TempDir::new().unwrap();
    let import = tmp.child("import.txt");
    import.write_str("example.com alice s3cr3t 1700000000\n").unwrap();
    cropass(&tmp).arg("import").arg(import.path()).assert().success();

    cropass(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("example.com"))
        .stdout(predicate::str::contains("2023-11-14"))
        .stdout(predicate::str::contains("s3cr3t").not());
}

#[test]
fn show_on_empty_store_succeeds() {
    let tmp = TempDir::new().unwrap();
    cropass(&tmp)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn completions_generate_script() {
    let tmp = TempDir::new().unwrap();
    cropass(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cropass"));
}

#[test]
fn first_run_notice_stays_off_stdout() {
    let tmp = TempDir::new().unwrap();
    let fresh = tmp.child("fresh-store");

    #[allow(deprecated)]
    Command::cargo_bin("cropass")
        .unwrap()
        .env_remove("CROPASS_PASS_DIR")
        .env("CROPASS_PASSWORD", "master-pw")
        .arg("--dir")
        .arg(fresh.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Created storage directory"));

    fresh.assert(predicate::path::is_dir());
}
