// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests of the `quill` binary and the `run` pipeline.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use quill_eval::{buffer_handler, EvalErrorKind, RunError};
use quillc::commands::execute;
use quillc::RunOptions;

fn quill(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_quill"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn run_prints_output_values() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("page.quill"),
        "let title = \"Home\"\nprintln(\"building\")\n<h1>{title}</h1>",
    )
    .unwrap();
    let output = quill(&["run", "page.quill"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "building\n<h1>Home</h1>\n");
}

#[test]
fn bare_script_path_runs_it() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sum.quill"), "1 + 2").unwrap();
    let output = quill(&["sum.quill"], dir.path());
    assert_eq!(stdout(&output), "3\n");
}

#[test]
fn imports_beside_the_script_are_allowed() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("lib.quill"), "export let twice = fn(x) { x * 2 }").unwrap();
    fs::write(dir.path().join("main.quill"), "let lib = import @./lib\nlib.twice(21)").unwrap();
    let output = quill(&["run", "main.quill"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "42\n");
}

#[test]
fn writes_need_a_flag() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("w.quill"), "\"hi\" ==> text(@./out/hi.txt)").unwrap();
    fs::create_dir(dir.path().join("out")).unwrap();

    let denied = quill(&["run", "w.quill"], dir.path());
    assert_eq!(denied.status.code(), Some(1));
    assert!(stderr(&denied).contains("E6008"), "{}", stderr(&denied));

    let allowed = quill(&["run", "w.quill", "--allow-write", "out"], dir.path());
    assert!(allowed.status.success(), "{}", stderr(&allowed));
    assert_eq!(fs::read_to_string(dir.path().join("out/hi.txt")).unwrap(), "hi");
}

#[test]
fn runtime_errors_show_a_snippet() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.quill"), "let a = 1\nlet b = a / 0").unwrap();
    let output = quill(&["run", "bad.quill"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("error[E6004]"), "{err}");
    assert!(err.contains("bad.quill:2:9"), "{err}");
    assert!(err.contains("let b = a / 0"), "{err}");
}

#[test]
fn check_reports_every_syntax_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.quill"), "let = 1\nlet x = (1 +\nlet y = 2").unwrap();
    let output = quill(&["check", "broken.quill"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("aborting due to"), "{}", stderr(&output));

    fs::write(dir.path().join("fine.quill"), "let x = 1\nx").unwrap();
    let output = quill(&["check", "fine.quill"], dir.path());
    assert!(output.status.success());
    assert_eq!(stdout(&output), "OK: fine.quill (2 statements)\n");
}

#[test]
fn explain_known_and_unknown_codes() {
    let dir = tempfile::tempdir().unwrap();
    let output = quill(&["--explain", "e6004"], dir.path());
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("E6004: Division by zero"));

    let output = quill(&["--explain", "E4242"], dir.path());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn execute_captures_prints_and_respects_max_depth() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("deep.quill");
    fs::write(&file, "").unwrap();
    let options = RunOptions {
        file,
        max_depth: Some(10),
        ..RunOptions::default()
    };

    let handler = buffer_handler();
    let result = execute(&options, "print(\"x\")\nlet f = fn(n) { f(n + 1) }\nf(0)", handler.clone());
    let Err(RunError::Runtime(error)) = result else {
        panic!("expected a runtime error");
    };
    assert!(matches!(error.kind, EvalErrorKind::StackOverflow { depth: 10 }), "{error:?}");
    assert_eq!(handler.output(), "x");
}
