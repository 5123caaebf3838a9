//! End-to-end tests for the forthtest binary
//!
//! Each test builds a throwaway checkout: `examples/*.forth` are tiny shell scripts and the "compiler" is
//! `/bin/sh`, so `<compiler> <file> -v --show-code --stats` simply runs the example.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MARKER: &str = "Ready for Phase 5: ESP32 Integration & Optimization";

fn checkout(examples: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let examples_dir = dir.path().join("examples");
    fs::create_dir(&examples_dir).unwrap();
    for (name, script) in examples {
        fs::write(examples_dir.join(name), script).unwrap();
    }
    dir
}

fn install_compiler(root: &Path) {
    let build = root.join("build");
    fs::create_dir(&build).unwrap();
    let compiler = build.join("forth_compiler");
    fs::write(&compiler, "#!/bin/sh\nexec /bin/sh \"$@\"\n").unwrap();
    fs::set_permissions(&compiler, fs::Permissions::from_mode(0o755)).unwrap();
}

fn forthtest(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("forthtest").unwrap();
    cmd.current_dir(root);
    cmd
}

fn passing() -> String {
    format!("echo 'compiled 3 words'\necho '{MARKER}'\n")
}

#[test]
fn default_layout_reports_pass_then_fail() {
    let root = checkout(&[
        ("b.forth", "echo 'error: unknown word SWPA' >&2\nexit 1\n"),
        ("a.forth", passing().as_str()),
        ("README.md", "not an example"),
    ]);
    install_compiler(root.path());

    forthtest(root.path())
        .assert()
        .success()
        .stdout("a.forth: PASS\nb.forth: FAIL\n");
}

#[test]
fn verbose_prints_merged_output_and_rule() {
    let root = checkout(&[
        ("a.forth", passing().as_str()),
        ("b.forth", "echo out\necho err >&2\n"),
    ]);
    let rule = "=".repeat(40);

    forthtest(root.path())
        .args(["-v", "--compiler", "/bin/sh"])
        .assert()
        .success()
        .stdout(format!(
            "a.forth: PASS\ncompiled 3 words\n{MARKER}\n\n{rule}\nb.forth: FAIL\nout\nerr\n\n{rule}\n"
        ));
}

#[test]
fn long_verbose_flag_matches_short() {
    let root = checkout(&[("a.forth", passing().as_str())]);

    let short = forthtest(root.path()).args(["-v", "--compiler", "/bin/sh"]).output().unwrap();
    let long = forthtest(root.path()).args(["--verbose", "--compiler", "/bin/sh"]).output().unwrap();

    assert_eq!(short.stdout, long.stdout);
}

#[test]
fn other_first_argument_leaves_verbose_off() {
    let root = checkout(&[("a.forth", passing().as_str())]);
    install_compiler(root.path());

    forthtest(root.path())
        .args(["foo", "-v"])
        .assert()
        .success()
        .stdout("a.forth: PASS\n");
}

#[test]
fn missing_compiler_is_error_line_and_exit_zero() {
    let root = checkout(&[("a.forth", passing().as_str()), ("b.forth", passing().as_str())]);

    forthtest(root.path())
        .assert()
        .success()
        .stdout(
            predicate::str::starts_with("a.forth: ERROR - failed to run './build/forth_compiler': ")
                .and(predicate::str::contains("\nb.forth: ERROR - "))
                .and(predicate::str::contains("PASS").not()),
        );
}

#[test]
fn missing_examples_dir_is_fatal() {
    let root = tempfile::tempdir().unwrap();

    forthtest(root.path())
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("failed to read examples directory"));
}

#[test]
fn empty_examples_dir_prints_nothing() {
    let root = checkout(&[]);

    forthtest(root.path()).assert().success().stdout("");
}

#[test]
fn exit_status_only_matters_when_requested() {
    let root = checkout(&[("crash.forth", format!("echo '{MARKER}'\nexit 139\n").as_str())]);

    forthtest(root.path())
        .args(["--compiler", "/bin/sh"])
        .assert()
        .success()
        .stdout("crash.forth: PASS\n");

    forthtest(root.path())
        .args(["--compiler", "/bin/sh", "--require-exit-success"])
        .assert()
        .success()
        .stdout("crash.forth: FAIL\n");
}

#[test]
fn custom_dir_and_marker() {
    let root = tempfile::tempdir().unwrap();
    let demos = root.path().join("demos");
    fs::create_dir(&demos).unwrap();
    fs::write(demos.join("one.forth"), "echo 'all good'\n").unwrap();

    forthtest(root.path())
        .args(["--examples-dir", "demos", "--compiler", "/bin/sh", "--marker", "all good"])
        .assert()
        .success()
        .stdout("one.forth: PASS\n");
}

#[test]
fn repeated_runs_are_identical() {
    let root = checkout(&[
        ("z.forth", passing().as_str()),
        ("m.forth", "echo nothing\n"),
        ("A.forth", passing().as_str()),
    ]);

    let first = forthtest(root.path()).args(["--compiler", "/bin/sh"]).output().unwrap();
    let second = forthtest(root.path()).args(["--compiler", "/bin/sh"]).output().unwrap();

    assert_eq!(String::from_utf8_lossy(&first.stdout), "A.forth: PASS\nm.forth: FAIL\nz.forth: PASS\n");
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn help_exits_zero() {
    let root = tempfile::tempdir().unwrap();

    forthtest(root.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--require-exit-success"));
}

#[test]
fn short_help_letter_runs_the_batch() {
    let root = checkout(&[("a.forth", passing().as_str())]);
    install_compiler(root.path());

    for flag in ["-h", "-V"] {
        forthtest(root.path())
            .arg(flag)
            .assert()
            .success()
            .stdout("a.forth: PASS\n");
    }
}

#[cfg(target_os = "linux")]
#[test]
fn non_utf8_example_name_still_gets_a_line() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let root = checkout(&[("a.forth", passing().as_str())]);
    let odd = root.path().join("examples").join(OsStr::from_bytes(b"b\xff.forth"));
    fs::write(odd, "echo nothing\n").unwrap();

    forthtest(root.path())
        .args(["--compiler", "/bin/sh"])
        .assert()
        .success()
        .stdout("a.forth: PASS\nb\u{fffd}.forth: FAIL\n");
}
