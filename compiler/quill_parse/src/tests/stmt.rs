use pretty_assertions::assert_eq;

use super::parse_ok;

#[test]
fn let_bindings() {
    assert_eq!(parse_ok("let x = 1"), "(let x 1)");
    assert_eq!(parse_ok("let a, b = 1, 2"), "(let [a b] [1 2])");
    assert_eq!(parse_ok("let a, ...rest = xs"), "(let [a ...rest] xs)");
    assert_eq!(parse_ok("let [a, ...rest] = xs"), "(let [a ...rest] xs)");
    assert_eq!(parse_ok("let xs = 1, 2, 3"), "(let xs [1 2 3])");
}

#[test]
fn dictionary_patterns() {
    assert_eq!(
        parse_ok("let {a, b as c, d: {e}, f = 1, ...r} = obj"),
        "(let {a, b as c, d: {e}, f = 1, ...r} obj)"
    );
    assert_eq!(parse_ok(r#"let {"a": [x, y]} = obj"#), "(let {a: [x y]} obj)");
}

#[test]
fn exports() {
    assert_eq!(parse_ok("export let x = 1"), "(export let x 1)");
    assert_eq!(parse_ok("export y = 2"), "(export = y 2)");
}

#[test]
fn assignments() {
    assert_eq!(parse_ok("x = 1"), "(= x 1)");
    assert_eq!(parse_ok("a.b = 1"), "(= (. a b) 1)");
    assert_eq!(parse_ok("a[0] = 1"), "(= (index a 0) 1)");
    assert_eq!(parse_ok("a, b = b, a"), "(= [a b] [b a])");
    assert_eq!(parse_ok("x = y == 2"), "(= x (== y 2))");
}

#[test]
fn destructuring_at_statement_start() {
    assert_eq!(parse_ok("[a, b] = pair"), "(= [a b] pair)");
    assert_eq!(parse_ok("{a, b} = obj"), "(= {a, b} obj)");
    // Not followed by `=`: an ordinary dictionary expression.
    assert_eq!(parse_ok("{a, b}"), "{a: a, b: b}");
    assert_eq!(parse_ok("[a, b]"), "[a b]");
}

#[test]
fn read_and_error_capture() {
    assert_eq!(
        parse_ok("{data, error} <== op()"),
        "(<== {data, error} (call op))"
    );
    assert_eq!(
        parse_ok("let {data, error} <== JSON(@./x.json)"),
        "(let <== {data, error} (call JSON @path(./x.json)))"
    );
    assert_eq!(parse_ok("rows <== CSV(@./r.csv)"), "(<== rows (call CSV @path(./r.csv)))");
}

#[test]
fn write_and_append() {
    assert_eq!(
        parse_ok("data ==> JSON(@./out.json)"),
        "(==> data (call JSON @path(./out.json)))"
    );
    assert_eq!(
        parse_ok(r#""line" ==>> lines(@./log.txt)"#),
        r#"(==>> "line" (call lines @path(./log.txt)))"#
    );
}

#[test]
fn statement_separators() {
    assert_eq!(parse_ok("x = 1; y = 2"), "(= x 1)\n(= y 2)");
    assert_eq!(parse_ok("x = 1\ny = 2;;"), "(= x 1)\n(= y 2)");
    // `(` on a new line starts a new statement rather than a call.
    assert_eq!(parse_ok("f\n(1)"), "f\n1");
    assert_eq!(parse_ok("a\n[1]"), "a\n[1]");
}

#[test]
fn return_break_continue() {
    assert_eq!(parse_ok("fn() { return }"), "(fn [] (block (return)))");
    assert_eq!(parse_ok("fn() { return\n x }"), "(fn [] (block (return) x))");
    assert_eq!(parse_ok("fn() { return 1, 2 }"), "(fn [] (block (return [1 2])))");
    assert_eq!(
        parse_ok("for (x in xs) { if (x) { break }\n continue }"),
        "(for x xs (block (if x (block (break))) (continue)))"
    );
}
