//! Reading and writing files from scripts.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use quill_eval::{buffer_handler, EvalErrorKind, Interpreter, Operation, RootedPolicy};
use tempfile::TempDir;

use crate::common::runtime_error;

/// Temporary directory, canonicalized so policy roots match resolved paths.
fn workspace() -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = fs::canonicalize(dir.path()).unwrap();
    (dir, root)
}

fn writer(root: &Path) -> Interpreter {
    Interpreter::builder()
        .print_handler(buffer_handler())
        .policy(Arc::new(RootedPolicy::new().allow(Operation::Write, root)))
        .build()
}

fn script(root: &Path, source: &str) -> std::path::PathBuf {
    let path = root.join("main.quill");
    fs::write(&path, source).unwrap();
    path
}

#[test]
fn json_round_trip_through_a_file() {
    let (_dir, root) = workspace();
    let main = script(
        &root,
        r#"
        let data = {name: "quill", tags: ["a", "b"], version: 2}
        data ==> JSON(@./out.json)
        let back <== JSON(@./out.json)
        back.tags[1], back.version
        "#,
    );
    let result = writer(&root).run_file(&main).unwrap();
    assert_eq!(result.rendered(), "b2");

    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(root.join("out.json")).unwrap()).unwrap();
    assert_eq!(written["name"], "quill");
}

#[test]
fn appending_lines() {
    let (_dir, root) = workspace();
    let main = script(
        &root,
        r#"
        "one" ==>> lines(@./log.txt)
        "two" ==>> lines(@./log.txt)
        let log <== lines(@./log.txt)
        log.join("+")
        "#,
    );
    let result = writer(&root).run_file(&main).unwrap();
    assert_eq!(result.rendered(), "one+two");
    assert_eq!(fs::read_to_string(root.join("log.txt")).unwrap(), "one\ntwo\n");
}

#[test]
fn overwrite_replaces_contents() {
    let (_dir, root) = workspace();
    fs::write(root.join("note.txt"), "old contents").unwrap();
    let main = script(&root, "\"new\" ==> text(@./note.txt)");
    writer(&root).run_file(&main).unwrap();
    assert_eq!(fs::read_to_string(root.join("note.txt")).unwrap(), "new");
}

#[test]
fn missing_files_are_captured() {
    let (_dir, root) = workspace();
    let main = script(
        &root,
        r"
        {data, error} <== text(@./missing.txt)
        data == null, error.code
        ",
    );
    let result = writer(&root).run_file(&main).unwrap();
    assert_eq!(result.rendered(), "trueE6012");
}

#[test]
fn writes_are_denied_by_default() {
    let (_dir, root) = workspace();
    let main = script(&root, "\"x\" ==> @./out.txt");
    let mut interp = Interpreter::builder().print_handler(buffer_handler()).build();
    let err = runtime_error(interp.run_file(&main));
    assert!(
        matches!(err.kind, EvalErrorKind::PermissionDenied { operation: "write", .. }),
        "{err:?}"
    );
    assert!(!root.join("out.txt").exists());
}

#[test]
fn denied_reads() {
    let (_dir, root) = workspace();
    fs::write(root.join("secret.txt"), "s").unwrap();
    let main = script(&root, "let s <== text(@./secret.txt)");
    let mut interp = Interpreter::builder()
        .print_handler(buffer_handler())
        .policy(Arc::new(RootedPolicy::new().deny(Operation::Read, &root)))
        .build();
    let err = runtime_error(interp.run_file(&main));
    assert!(matches!(err.kind, EvalErrorKind::PermissionDenied { .. }), "{err:?}");
}

#[test]
fn stdout_target_prints() {
    let (_dir, root) = workspace();
    let main = script(&root, "\"hi\" ==> text(@stdout)");
    let mut interp = writer(&root);
    interp.run_file(&main).unwrap();
    assert_eq!(interp.print_handler().output(), "hi");
}
