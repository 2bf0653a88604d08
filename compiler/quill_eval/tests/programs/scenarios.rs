//! Complete scripts.

use pretty_assertions::assert_eq;
use quill_eval::EvalErrorKind;

use crate::common::{run, run_err};

#[test]
fn counter_closures_are_independent() {
    let source = r"
        let counter = fn() {
            n = 0
            fn() { n = n + 1; n }
        }
        let a = counter()
        let b = counter()
        a(), a(), b(), a()
    ";
    assert_eq!(run(source), "1213");
}

#[test]
fn report_from_records() {
    let source = r#"
        let people = [
            {name: "Ada", age: 36, langs: ["analytical engine"]},
            {name: "Grace", age: 85, langs: ["cobol", "flow-matic"]},
            {name: "Linus", age: 12, langs: []},
        ]
        let adults = for (p in people) { if (p.age >= 18) p }
        let names = for ({name, langs} in adults) { "{name} ({len(langs)})" }
        names.join(", ")
    "#;
    assert_eq!(run(source), "Ada (1), Grace (2)");
}

#[test]
fn html_page_from_components() {
    let source = r#"
        let Item = fn({label, done}) {
            <li class={if (done) "done" else null}>{label}</li>
        }
        let todos = [{label: "write", done: true}, {label: "test", done: false}]
        <ul>{for (t in todos) { <Item label={t.label} done={t.done}/> }}</ul>
    "#;
    assert_eq!(run(source), r#"<ul><li class="done">write</li><li>test</li></ul>"#);
}

#[test]
fn recoverable_errors() {
    let source = r#"
        let parse_age = fn(text) {
            let n = int(text)
            if (n < 0) fail("negative age") else n
        }
        {data, error} <== parse_age("-4")
        let age = data ?? 0
        age, error.message
    "#;
    assert_eq!(run(source), "0negative age");
}

#[test]
fn uncaught_errors_carry_their_location() {
    let source = "let xs = [1]\n\nlet y = xs[3]";
    let err = run_err(source);
    assert!(matches!(err.kind, EvalErrorKind::IndexOutOfBounds { index: 3, len: 1 }), "{err:?}");
    assert_eq!(err.position.map(|p| p.line), Some(3));
}

#[test]
fn natural_sort_of_file_names() {
    let source = r#"
        let files = "img12.png", "img10.png", "img2.png", "img1.png"
        files.sort().join(" ")
    "#;
    assert_eq!(run(source), "img1.png img2.png img10.png img12.png");
}

#[test]
fn slices_copy_and_shapes() {
    let source = r"
        let grid = [1, 2], [3, 4]
        let row = grid[0][:]
        row[0] = 99
        len(grid), grid[0][0], row[0]
    ";
    assert_eq!(run(source), "2199");
}

#[test]
fn lazy_configuration_dictionary() {
    let source = r#"
        let env = "prod"
        let config = {
            host: if (env == "prod") "example.org" else "localhost",
            port: 443,
            url: "https://{this.host}:{this.port}/",
        }
        config.url
    "#;
    assert_eq!(run(source), "https://example.org:443/");
}

#[test]
fn reduce_and_ranges() {
    assert_eq!(run("let xs = 1..10\nxs.reduce(fn(a, b) { a + b })"), "55");
    assert_eq!(run("let xs = 1..4\nxs.map(fn(x) { x * x }).reduce(fn(a, b) { a + b }, 0)"), "30");
}

#[test]
fn runaway_recursion_stops() {
    let err = run_err("let loop = fn() { loop() }\nloop()");
    assert!(matches!(err.kind, EvalErrorKind::StackOverflow { .. }), "{err:?}");
}
