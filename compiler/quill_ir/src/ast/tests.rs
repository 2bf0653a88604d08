use super::*;
use crate::Span;

#[test]
fn precedence_orders_operators() {
    assert!(BinaryOp::Coalesce.precedence() < BinaryOp::Or.precedence());
    assert!(BinaryOp::Or.precedence() < BinaryOp::And.precedence());
    assert!(BinaryOp::Eq.precedence() < BinaryOp::Lt.precedence());
    assert!(BinaryOp::Match.precedence() < BinaryOp::Range.precedence());
    assert!(BinaryOp::Range.precedence() < BinaryOp::Add.precedence());
    assert_eq!(BinaryOp::Union.precedence(), BinaryOp::Sub.precedence());
    assert_eq!(BinaryOp::Intersect.precedence(), BinaryOp::Mul.precedence());
    assert!(BinaryOp::Mul.precedence() < BinaryOp::Concat.precedence());
}

#[test]
fn symbols() {
    assert_eq!(BinaryOp::Concat.as_symbol(), "++");
    assert_eq!(BinaryOp::NotMatch.as_symbol(), "!~");
    assert_eq!(UnaryOp::Not.as_symbol(), "!");
}

#[test]
fn short_circuit_operators() {
    assert!(BinaryOp::Coalesce.is_short_circuit());
    assert!(BinaryOp::And.is_short_circuit());
    assert!(!BinaryOp::Intersect.is_short_circuit());
}

#[test]
fn constant_literals() {
    assert!(ExprKind::Int(1).is_constant());
    assert!(ExprKind::Str("a".into()).is_constant());
    assert!(!ExprKind::Ident("a".into()).is_constant());
    assert!(!ExprKind::Array(vec![]).is_constant());
}

#[test]
fn dict_pattern_binding_name() {
    let plain = DictPatternField {
        key: "a".into(),
        alias: None,
        nested: None,
        default: None,
    };
    let aliased = DictPatternField {
        alias: Some("b".into()),
        ..plain.clone()
    };
    assert_eq!(plain.binding_name(), "a");
    assert_eq!(aliased.binding_name(), "b");
}

#[test]
fn tag_component_flag() {
    let tag = TagNode {
        name: "Card".into(),
        attrs: vec![],
        children: vec![],
        self_closing: true,
        kind: TagKind::Component,
    };
    assert!(tag.is_component());
    let pattern = Pattern::new(PatternKind::Ident("x".into()), Span::new(0, 1));
    assert_eq!(pattern.span, Span::new(0, 1));
}
