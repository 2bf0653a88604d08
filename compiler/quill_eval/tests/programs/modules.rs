//! Imports through an in-memory module source.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;
use quill_eval::{
    buffer_handler, EvalErrorKind, Interpreter, MemorySource, ModuleCache, Operation, RootedPolicy,
};

use crate::common::runtime_error;

fn project(files: &[(&str, &str)]) -> Arc<MemorySource> {
    let source = MemorySource::new();
    for (path, text) in files {
        source.insert(path, *text);
    }
    Arc::new(source)
}

fn interpreter_for(source: Arc<MemorySource>, cache: Arc<ModuleCache>) -> Interpreter {
    Interpreter::builder()
        .print_handler(buffer_handler())
        .policy(Arc::new(RootedPolicy::new().allow(Operation::Execute, "/m")))
        .module_source(source)
        .module_cache(cache)
        .entry_file("/m/main.quill")
        .build()
}

#[test]
fn exports_only_declared_bindings() {
    let source = project(&[(
        "/m/lib.quill",
        "export let greet = fn(n) { \"hello {n}\" }\nlet hidden = 1\nexport answer = 42",
    )]);
    let mut interp = interpreter_for(source, Arc::new(ModuleCache::new()));
    let result = interp
        .eval_source("let lib = import @./lib\nlib.greet(\"q\")\nlib.answer\nlib.hidden == null")
        .unwrap();
    assert_eq!(result.rendered(), "hello q\n42\ntrue");
}

#[test]
fn modules_run_once_per_cache() {
    let source = project(&[("/m/lib.quill", "println(\"loading\")\nexport let x = 1")]);
    let cache = Arc::new(ModuleCache::new());

    let mut first = interpreter_for(Arc::clone(&source), Arc::clone(&cache));
    let result = first
        .eval_source("let a = import @./lib\nlet b = import @./lib.quill\na.x + b.x")
        .unwrap();
    assert_eq!(result.rendered(), "2");
    assert_eq!(first.print_handler().output(), "loading\n");

    let mut second = interpreter_for(source, Arc::clone(&cache));
    second.eval_source("import(@./lib).x").unwrap();
    assert_eq!(second.print_handler().output(), "");
    assert_eq!(cache.len(), 1);
}

#[test]
fn concurrent_imports_share_one_load() {
    let source = project(&[("/m/lib.quill", "println(\"loading\")\nexport let x = 7")]);
    let cache = Arc::new(ModuleCache::new());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let source = Arc::clone(&source);
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let mut interp = interpreter_for(source, cache);
                let value = interp.eval_source("import(@./lib).x").unwrap().rendered();
                (value, interp.print_handler().output())
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.iter().all(|(value, _)| value == "7"));
    let loads = results.iter().filter(|(_, printed)| printed == "loading\n").count();
    assert_eq!(loads, 1);
}

#[test]
fn modules_do_not_see_the_importer() {
    let source = project(&[("/m/lib.quill", "export let y = secret")]);
    let mut interp = interpreter_for(source, Arc::new(ModuleCache::new()));
    let err = runtime_error(interp.eval_source("let secret = 1\nimport @./lib"));
    assert!(matches!(err.kind, EvalErrorKind::UndefinedVariable { .. }), "{err:?}");
}

#[test]
fn circular_imports_report_the_chain() {
    let source = project(&[
        ("/m/a.quill", "export let a = import(@./b).b"),
        ("/m/b.quill", "export let b = import(@./a).a"),
    ]);
    let mut interp = interpreter_for(source, Arc::new(ModuleCache::new()));
    let err = runtime_error(interp.eval_source("import @./a"));
    let EvalErrorKind::CircularImport { chain } = &err.kind else {
        panic!("expected a circular import, got {err:?}");
    };
    let expected: Vec<PathBuf> = ["/m/a.quill", "/m/b.quill", "/m/a.quill"]
        .iter()
        .map(PathBuf::from)
        .collect();
    assert_eq!(chain, &expected);
}

#[test]
fn importing_the_entry_file_is_circular() {
    let source = project(&[("/m/main.quill", "import @./main")]);
    let mut interp = interpreter_for(source, Arc::new(ModuleCache::new()));
    let err = runtime_error(interp.eval_source("import @./main"));
    assert!(matches!(err.kind, EvalErrorKind::CircularImport { .. }), "{err:?}");
}

#[test]
fn failed_loads_are_not_cached() {
    let source = project(&[("/m/lib.quill", "fail(\"broken\")")]);
    let cache = Arc::new(ModuleCache::new());
    let mut interp = interpreter_for(Arc::clone(&source), Arc::clone(&cache));
    let err = runtime_error(interp.eval_source("import @./lib"));
    assert!(matches!(err.kind, EvalErrorKind::Failed { .. }), "{err:?}");
    assert!(cache.is_empty());

    source.insert("/m/lib.quill", "export let ok = true");
    let mut interp = interpreter_for(source, cache);
    assert_eq!(interp.eval_source("import(@./lib).ok").unwrap().rendered(), "true");
}

#[test]
fn module_syntax_errors() {
    let source = project(&[("/m/lib.quill", "let x = 1\nlet = 2")]);
    let mut interp = interpreter_for(source, Arc::new(ModuleCache::new()));
    let err = runtime_error(interp.eval_source("import @./lib"));
    let EvalErrorKind::ModuleParse { path, position, .. } = &err.kind else {
        panic!("expected a module parse error, got {err:?}");
    };
    assert_eq!(path, &PathBuf::from("/m/lib.quill"));
    assert_eq!(position.line, 2);
}

#[test]
fn missing_modules() {
    let mut interp = interpreter_for(project(&[]), Arc::new(ModuleCache::new()));
    let err = runtime_error(interp.eval_source("import @./nope"));
    assert!(matches!(err.kind, EvalErrorKind::ModuleNotFound { .. }), "{err:?}");
}

#[test]
fn execution_needs_permission() {
    let source = project(&[("/m/lib.quill", "export let x = 1")]);
    let mut interp = Interpreter::builder()
        .print_handler(buffer_handler())
        .module_source(source)
        .entry_file("/m/main.quill")
        .build();
    let err = runtime_error(interp.eval_source("import @./lib"));
    assert!(
        matches!(err.kind, EvalErrorKind::PermissionDenied { operation: "execute", .. }),
        "{err:?}"
    );
}
