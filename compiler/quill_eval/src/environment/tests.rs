use pretty_assertions::assert_eq;

use super::*;

fn int(value: Option<Value>) -> Option<i64> {
    value.and_then(|v| v.as_int())
}

#[test]
fn lookup_walks_parents() {
    let global = Environment::new();
    global.define("x", Value::Int(1));
    let inner = global.child().child();
    assert_eq!(int(inner.lookup("x")), Some(1));
    assert!(inner.lookup("missing").is_none());
}

#[test]
fn define_shadows_outer_binding() {
    let outer = Environment::new();
    outer.define("x", Value::Int(1));
    let inner = outer.child();
    inner.define("x", Value::Int(2));
    assert_eq!(int(inner.lookup("x")), Some(2));
    assert_eq!(int(outer.lookup("x")), Some(1));
}

#[test]
fn assign_updates_nearest_binding() {
    let outer = Environment::new().child();
    outer.define("n", Value::Int(0));
    let inner = outer.child();
    inner.assign("n", Value::Int(5));
    assert_eq!(int(outer.lookup("n")), Some(5));
    assert_eq!(inner.local_names(), Vec::<String>::new());
}

#[test]
fn assign_never_writes_the_root_scope() {
    let root = Environment::new();
    root.define("len", Value::Int(0));
    let program = root.child();
    program.assign("len", Value::Int(9));
    assert_eq!(int(program.lookup("len")), Some(9));
    assert_eq!(int(root.lookup("len")), Some(0));
}

#[test]
fn assign_defines_when_unbound() {
    let outer = Environment::new();
    let inner = outer.child();
    inner.assign("fresh", Value::Int(3));
    assert_eq!(int(inner.lookup("fresh")), Some(3));
    assert!(outer.lookup("fresh").is_none());
}

#[test]
fn exports_keep_declaration_order() {
    let env = Environment::new();
    env.define_with("b", Value::Int(2), true);
    env.define("hidden", Value::Int(0));
    env.define_with("a", Value::Int(1), true);
    env.define_with("b", Value::Int(3), true);
    let names: Vec<(String, Option<i64>)> = env
        .exports()
        .into_iter()
        .map(|(name, value)| (name, value.as_int()))
        .collect();
    assert_eq!(
        names,
        vec![("b".to_string(), Some(3)), ("a".to_string(), Some(1))]
    );
}

#[test]
fn redefining_keeps_export_flag() {
    let env = Environment::new();
    env.define_with("x", Value::Int(1), true);
    env.define("x", Value::Int(2));
    assert_eq!(env.exports().len(), 1);
}

#[test]
fn environments_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Environment>();
    assert_send_sync::<Value>();
}
