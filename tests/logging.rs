mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{Trees, compare_cmd, compare_dirs_cmd, write_same_file};
use predicates::prelude::*;
use std::fs;

fn trees_with_subdirectory() -> Trees {
    let trees = Trees::new();
    write_same_file(&trees, "file.txt", "hello");
    fs::create_dir(trees.left().join("dir")).unwrap();
    fs::create_dir(trees.right().join("dir")).unwrap();
    trees
}

#[test]
fn respects_rust_log_info() {
    let trees = trees_with_subdirectory();

    compare_cmd(&trees)
        .env("RUST_LOG", "info")
        .assert()
        .success()
        .stderr(predicate::str::contains("Scanning"));
}

#[test]
fn respects_rust_log_warn() {
    let trees = trees_with_subdirectory();

    compare_cmd(&trees)
        .env("RUST_LOG", "warn")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn verbose_overrides_rust_log_warn() {
    let trees = trees_with_subdirectory();

    compare_cmd(&trees)
        .env("RUST_LOG", "warn")
        .arg("-v")
        .assert()
        .success()
        .stderr(predicate::str::contains("Scanning"))
        .stderr(predicate::str::contains("Descending into").not());
}

#[test]
fn verbose_debug_overrides_rust_log_warn() {
    let trees = trees_with_subdirectory();

    compare_cmd(&trees)
        .env("RUST_LOG", "warn")
        .arg("-vv")
        .assert()
        .success()
        .stderr(predicate::str::contains("Descending into"));
}

#[test]
fn log_level_overrides_rust_log_warn() {
    let trees = trees_with_subdirectory();

    compare_cmd(&trees)
        .env("RUST_LOG", "warn")
        .arg("--log-level")
        .arg("info")
        .assert()
        .success()
        .stderr(predicate::str::contains("Comparing"));
}

#[test]
fn trace_log_level_emits_debug_messages() {
    let trees = trees_with_subdirectory();

    compare_cmd(&trees)
        .env("RUST_LOG", "warn")
        .arg("--log-level")
        .arg("trace")
        .assert()
        .success()
        .stderr(predicate::str::contains("Descending into"));
}

#[test]
fn log_level_conflicts_with_verbose() {
    cargo_bin_cmd!("treecmp")
        .arg("--log-level")
        .arg("info")
        .arg("-v")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--log-level <LEVEL>"))
        .stderr(predicate::str::contains("--verbose"));
}

#[test]
fn help_mentions_rust_log_precedence_for_logging_flags() {
    cargo_bin_cmd!("treecmp")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("-v, --verbose"))
        .stdout(predicate::str::contains("--log-level <LEVEL>"))
        .stdout(predicate::str::contains("Takes precedence over RUST_LOG"));
}

#[test]
fn errors_are_logged_to_stderr_not_stdout() {
    let trees = Trees::new();

    compare_dirs_cmd(&trees.left(), &trees.temp.path().join("missing"))
        .assert()
        .code(255)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn emojis_suppressed_when_not_tty() {
    let trees = Trees::new();

    // capture() makes stdout/stderr non-tty
    let output = compare_dirs_cmd(&trees.left(), &trees.temp.path().join("missing"))
        .assert()
        .code(255)
        .get_output()
        .clone();

    let stderr = String::from_utf8_lossy(&output.stderr);

    // Should not include emoji prefixes when not a TTY
    for ch in stderr.chars() {
        assert!(
            ch.is_ascii(),
            "stderr unexpectedly contains non-ASCII character: {ch:?}"
        );
    }
    assert!(
        stderr.contains("ERROR:"),
        "stderr should include the error prefix"
    );
}
