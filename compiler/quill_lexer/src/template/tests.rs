use pretty_assertions::assert_eq;

use super::*;

#[test]
fn plain_text_is_one_part() {
    assert_eq!(
        split_template("hello", 0).ok(),
        Some(vec![RawPart::Text("hello".into())])
    );
}

#[test]
fn empty_string_is_one_empty_part() {
    assert_eq!(split_template("", 0).ok(), Some(vec![RawPart::Text(String::new())]));
}

#[test]
fn interpolation_ranges_are_absolute() {
    // raw starts at offset 10 in the file
    let parts = split_template("Hi {name}!", 10).ok();
    assert_eq!(
        parts,
        Some(vec![
            RawPart::Text("Hi ".into()),
            RawPart::Expr { start: 14, end: 18 },
            RawPart::Text("!".into()),
        ])
    );
}

#[test]
fn escapes_resolve() {
    assert_eq!(
        split_template(r#"a\n\t\"\{x\}\\"#, 0).ok(),
        Some(vec![RawPart::Text("a\n\t\"{x}\\".into())])
    );
    assert_eq!(
        split_template(r"\u{48}\u{1F600}", 0).ok(),
        Some(vec![RawPart::Text("H\u{1F600}".into())])
    );
}

#[test]
fn unknown_escape_is_kept() {
    assert_eq!(
        split_template(r"\d+", 0).ok(),
        Some(vec![RawPart::Text(r"\d+".into())])
    );
}

#[test]
fn empty_braces_are_literal() {
    assert_eq!(
        split_template("{} and { }", 0).ok(),
        Some(vec![RawPart::Text("{} and { }".into())])
    );
}

#[test]
fn nested_braces_and_strings() {
    let parts = split_template(r#"{d["k"]} {f({a: 1})}"#, 0).ok();
    assert_eq!(
        parts,
        Some(vec![
            RawPart::Expr { start: 1, end: 7 },
            RawPart::Text(" ".into()),
            RawPart::Expr { start: 10, end: 19 },
        ])
    );
}

#[test]
fn unclosed_interpolation_errors() {
    let err = split_template("a {b", 5).err();
    assert_eq!(err.map(|e| (e.kind, e.offset)), Some((LexErrorKind::UnterminatedString, 7)));
}

#[test]
fn bad_unicode_escape_errors() {
    let err = split_template(r"\u{zz}", 0).err();
    assert_eq!(err.map(|e| e.kind), Some(LexErrorKind::InvalidEscape));
}
