#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Output};

/// 假的 imapsync：`--user2` 为 fail@x 时以 3 退出，其余成功
const FAKE_IMAPSYNC: &str = r#"#!/bin/sh
while [ "$#" -gt 0 ]; do
  if [ "$1" = "--user2" ] && [ "$2" = "fail@x" ]; then
    exit 3
  fi
  shift
done
exit 0
"#;

fn write_fixture(dir: &Path, mails_file: &str) {
    let script = dir.join("imapsync");
    fs::write(&script, FAKE_IMAPSYNC).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    fs::write(
        dir.join("sync.yml"),
        format!(
            "source: old.example.com\ndestination: new.example.com\nerrors: 50\nthreads: 2\nmails_file: {mails_file}\n"
        ),
    )
    .unwrap();
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mailsync"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_missing_config_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_missing_job_list_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "does-not-exist.txt");

    let output = run_in(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("started job"));
}

#[test]
fn test_job_failures_do_not_change_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "mails.txt");
    fs::write(dir.path().join("mails.txt"), "ok@x;pw\nsrc@x;pw;fail@x;pw2\n").unwrap();

    let output = run_in(dir.path(), &[]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("finished job"), "stdout: {stdout}");
    assert!(stdout.contains("error on job"), "stdout: {stdout}");
    assert!(stdout.contains("fail@x"));
    assert!(stdout.contains("total time"));
}

#[test]
fn test_positional_argument_overrides_mails_file() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "missing.txt");
    fs::write(dir.path().join("other.txt"), "only@x;pw\n").unwrap();

    let output = run_in(dir.path(), &["other.txt"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("finished job 1: only@x"), "stdout: {stdout}");
}
