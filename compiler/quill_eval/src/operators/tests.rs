use pretty_assertions::assert_eq;

use super::*;
use crate::errors::EvalErrorKind;

const MAX: usize = 1000;

fn ints(values: &[i64]) -> Value {
    Value::array(values.iter().copied().map(Value::Int).collect())
}

fn strs(values: &[&str]) -> Value {
    Value::array(values.iter().copied().map(Value::from).collect())
}

fn eval(op: BinaryOp, left: &Value, right: &Value) -> Value {
    binary(op, left, right, MAX).unwrap()
}

fn show(value: &Value) -> String {
    format!("{value:?}")
}

#[test]
fn integer_arithmetic_is_checked() {
    assert_eq!(eval(BinaryOp::Add, &Value::Int(2), &Value::Int(3)).as_int(), Some(5));
    assert_eq!(eval(BinaryOp::Div, &Value::Int(7), &Value::Int(2)).as_int(), Some(3));
    assert_eq!(eval(BinaryOp::Div, &Value::Int(-7), &Value::Int(2)).as_int(), Some(-3));
    let overflow = binary(BinaryOp::Add, &Value::Int(i64::MAX), &Value::Int(1), MAX).unwrap_err();
    assert!(matches!(overflow.kind, EvalErrorKind::IntegerOverflow { .. }));
    let zero = binary(BinaryOp::Div, &Value::Int(1), &Value::Int(0), MAX).unwrap_err();
    assert_eq!(zero.kind, EvalErrorKind::DivisionByZero);
    let zero = binary(BinaryOp::Mod, &Value::Int(1), &Value::Int(0), MAX).unwrap_err();
    assert_eq!(zero.kind, EvalErrorKind::ModuloByZero);
}

#[test]
fn mixed_arithmetic_is_float() {
    let value = eval(BinaryOp::Mul, &Value::Int(2), &Value::Float(1.5));
    assert_eq!(value.as_f64(), Some(3.0));
    assert!(matches!(value, Value::Float(_)));
}

#[test]
fn concat_lifts_scalars() {
    assert_eq!(show(&eval(BinaryOp::Concat, &ints(&[1, 2]), &Value::Int(3))), show(&ints(&[1, 2, 3])));
    assert_eq!(show(&eval(BinaryOp::Concat, &Value::Int(0), &ints(&[1]))), show(&ints(&[0, 1])));
    assert_eq!(render(&eval(BinaryOp::Concat, &Value::from("ab"), &Value::from("cd"))), "abcd");
}

#[test]
fn dict_concat_merges_right_over_left() {
    let a = Value::Dict(Dict::from_values([("x", Value::Int(1)), ("y", Value::Int(2))]));
    let b = Value::Dict(Dict::from_values([("y", Value::Int(9)), ("z", Value::Int(3))]));
    assert_eq!(render(&eval(BinaryOp::Concat, &a, &b)), r#"{"x":1,"y":9,"z":3}"#);
}

#[test]
fn array_set_operations() {
    let a = ints(&[1, 2, 2, 3]);
    let b = ints(&[3, 4]);
    assert_eq!(show(&eval(BinaryOp::Union, &a, &b)), show(&ints(&[1, 2, 3, 4])));
    assert_eq!(show(&eval(BinaryOp::Intersect, &a, &b)), show(&ints(&[3])));
    assert_eq!(show(&eval(BinaryOp::Sub, &a, &b)), show(&ints(&[1, 2])));
}

#[test]
fn set_equality_is_by_rendered_value() {
    let a = Value::array(vec![Value::Int(1), Value::from("1"), Value::from("x")]);
    assert_eq!(show(&eval(BinaryOp::Union, &a, &strs(&[]))), show(&Value::array(vec![Value::Int(1), Value::from("x")])));
}

#[test]
fn dict_set_operations() {
    let a = Value::Dict(Dict::from_values([("x", Value::Int(1)), ("y", Value::Int(2))]));
    let b = Value::Dict(Dict::from_values([("y", Value::Int(9)), ("z", Value::Int(3))]));
    assert_eq!(render(&eval(BinaryOp::Intersect, &a, &b)), r#"{"y":2}"#);
    assert_eq!(render(&eval(BinaryOp::Sub, &a, &b)), r#"{"x":1}"#);
    assert_eq!(render(&eval(BinaryOp::Union, &a, &b)), r#"{"x":1,"y":2,"z":3}"#);
}

#[test]
fn chunk_and_repeat() {
    let chunks = eval(BinaryOp::Div, &ints(&[1, 2, 3, 4, 5]), &Value::Int(2));
    assert_eq!(
        show(&chunks),
        show(&Value::array(vec![ints(&[1, 2]), ints(&[3, 4]), ints(&[5])]))
    );
    assert_eq!(render(&eval(BinaryOp::Mul, &Value::from("ab"), &Value::Int(3))), "ababab");
    assert_eq!(show(&eval(BinaryOp::Mul, &ints(&[1]), &Value::Int(2))), show(&ints(&[1, 1])));
    assert_eq!(render(&eval(BinaryOp::Mul, &Value::from("ab"), &Value::Int(-2))), "");
}

#[test]
fn repetition_is_bounded() {
    let huge = Value::Int(i64::MAX);
    let error = binary(BinaryOp::Mul, &Value::from("ab"), &huge, MAX).unwrap_err();
    assert!(matches!(
        error.kind,
        EvalErrorKind::IntegerOverflow { .. } | EvalErrorKind::RangeTooLarge { .. }
    ));
    let error = binary(BinaryOp::Mul, &ints(&[1]), &huge, MAX).unwrap_err();
    assert!(matches!(error.kind, EvalErrorKind::RangeTooLarge { max: MAX, .. }));

    let error = binary(BinaryOp::Mul, &Value::from("abc"), &Value::Int(100_000_000_000), MAX).unwrap_err();
    assert!(matches!(error.kind, EvalErrorKind::RangeTooLarge { len: 300_000_000_000, max: MAX }));

    // Exactly at the limit is fine.
    let filled = eval(BinaryOp::Mul, &Value::from("x"), &Value::Int(1000));
    assert_eq!(render(&filled).len(), MAX);
}

#[test]
fn chunk_size_must_be_positive() {
    let error = binary(BinaryOp::Div, &ints(&[1, 2, 3]), &Value::Int(-1), MAX).unwrap_err();
    assert_eq!(error.message, "chunk size must be positive, got -1");
    let error = binary(BinaryOp::Div, &ints(&[1, 2, 3]), &Value::Int(0), MAX).unwrap_err();
    assert!(matches!(error.kind, EvalErrorKind::DivisionByZero));
}

#[test]
fn ranges() {
    assert_eq!(show(&eval(BinaryOp::Range, &Value::Int(1), &Value::Int(4))), show(&ints(&[1, 2, 3, 4])));
    assert_eq!(show(&eval(BinaryOp::Range, &Value::Int(3), &Value::Int(1))), show(&ints(&[3, 2, 1])));
    let error = binary(BinaryOp::Range, &Value::Int(0), &Value::Int(5000), MAX).unwrap_err();
    assert!(matches!(error.kind, EvalErrorKind::RangeTooLarge { len: 5001, max: MAX }));
}

#[test]
fn comparisons() {
    assert_eq!(show(&eval(BinaryOp::Lt, &Value::Int(1), &Value::Float(1.5))), "Bool(true)");
    assert_eq!(show(&eval(BinaryOp::GtEq, &Value::from("b"), &Value::from("a"))), "Bool(true)");
    assert!(binary(BinaryOp::Lt, &Value::Int(1), &Value::from("a"), MAX).is_err());
    assert_eq!(show(&eval(BinaryOp::Eq, &Value::Int(1), &Value::Float(1.0))), "Bool(true)");
}

#[test]
fn membership() {
    assert_eq!(show(&eval(BinaryOp::In, &Value::Int(2), &ints(&[1, 2]))), "Bool(true)");
    let dict = Value::Dict(Dict::from_values([("k", Value::Null)]));
    assert_eq!(show(&eval(BinaryOp::In, &Value::from("k"), &dict)), "Bool(true)");
    assert_eq!(show(&eval(BinaryOp::In, &Value::from("ell"), &Value::from("hello"))), "Bool(true)");
}

#[test]
fn regex_operators() {
    let re = regex::new("(\\d+)-(\\d+)", "").unwrap();
    let caps = eval(BinaryOp::Match, &Value::from("call 555-1234"), &re);
    assert_eq!(show(&caps), show(&strs(&["555-1234", "555", "1234"])));
    assert!(eval(BinaryOp::Match, &Value::from("none"), &re).is_null());
    assert_eq!(show(&eval(BinaryOp::NotMatch, &Value::from("none"), &re)), "Bool(true)");
}

#[test]
fn pseudo_type_operators() {
    let day = duration::parse("1d").unwrap();
    let date = datetime::parse("2024-02-28").unwrap();
    assert_eq!(render(&eval(BinaryOp::Add, &date, &day)), "2024-02-29");
    assert_eq!(render(&eval(BinaryOp::Mul, &day, &Value::Int(3))), "3d");
    assert_eq!(render(&eval(BinaryOp::Sub, &day, &duration::parse("1h").unwrap())), "23h");
    let later = datetime::parse("2024-03-01").unwrap();
    assert_eq!(show(&eval(BinaryOp::Gt, &later, &date)), "Bool(true)");

    let dir = path::new("./data");
    assert_eq!(render(&eval(BinaryOp::Div, &dir, &Value::from("x.json"))), "./data/x.json");
    assert_eq!(render(&eval(BinaryOp::Add, &dir, &Value::from("y"))), "./data/y");

    let site = url::parse("https://example.com/api").unwrap();
    assert_eq!(render(&eval(BinaryOp::Add, &site, &Value::from("users"))), "https://example.com/api/users");
}

#[test]
fn unary_operators() {
    assert_eq!(unary(UnaryOp::Neg, &Value::Int(3)).unwrap().as_int(), Some(-3));
    assert_eq!(show(&unary(UnaryOp::Not, &Value::from("")).unwrap()), "Bool(true)");
    assert!(unary(UnaryOp::Neg, &Value::from("x")).is_err());
    assert!(unary(UnaryOp::Neg, &Value::Int(i64::MIN)).is_err());
    let neg = unary(UnaryOp::Neg, &duration::parse("2h").unwrap()).unwrap();
    assert_eq!(render(&neg), "-2h");
}
