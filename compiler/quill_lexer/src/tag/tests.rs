use pretty_assertions::assert_eq;

use super::*;
use crate::Lexer;

fn content_tokens(source: &str, raw_tag: Option<&str>) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(source);
    let mut out = Vec::new();
    let mut pos = 0;
    loop {
        let token = lexer.scan_tag_content(pos, raw_tag);
        pos = token.span.end as usize;
        let done = matches!(token.kind, TokenKind::Eof | TokenKind::TagEnd(_) | TokenKind::LBrace | TokenKind::AtLBrace);
        out.push(token.kind);
        if done {
            return out;
        }
    }
}

#[test]
fn header_with_attributes() {
    let raw = r#"a href="/p/{id}" class={cls} hidden"#;
    let header = parse_tag_header(raw, 1).ok();
    assert_eq!(
        header,
        Some(TagHeader {
            name: "a".into(),
            kind: TagHeaderKind::Element,
            attrs: vec![
                RawAttr {
                    name: "href".into(),
                    span: 3..17,
                    value: RawAttrValue::Text {
                        raw: "/p/{id}".into(),
                        start: 9
                    },
                },
                RawAttr {
                    name: "class".into(),
                    span: 18..29,
                    value: RawAttrValue::Expr { start: 25, end: 28 },
                },
                RawAttr {
                    name: "hidden".into(),
                    span: 30..36,
                    value: RawAttrValue::Flag,
                },
            ],
            self_closing: false,
        })
    );
}

#[test]
fn self_closing_and_fragment_headers() {
    let header = parse_tag_header("br/", 0).ok();
    assert_eq!(header.map(|h| (h.name, h.self_closing)), Some(("br".into(), true)));
    let header = parse_tag_header("Card title=\"x\" /", 0).ok();
    assert_eq!(header.map(|h| (h.name, h.attrs.len(), h.self_closing)), Some(("Card".into(), 1, true)));
    assert_eq!(parse_tag_header("", 0).ok().map(|h| h.kind), Some(TagHeaderKind::Fragment));
    assert_eq!(
        parse_tag_header("!DOCTYPE html", 0).ok().map(|h| h.kind),
        Some(TagHeaderKind::Directive)
    );
}

#[test]
fn header_errors() {
    assert!(parse_tag_header("a =x", 0).is_err());
    assert!(parse_tag_header("a title=", 0).is_err());
}

#[test]
fn scan_tag_reads_whole_header() {
    let mut lexer = Lexer::new(r#"<a title="x > y" n={a > b}>rest"#);
    let lt = lexer.next_token();
    assert_eq!(lt.kind, TokenKind::Lt);
    let tag = lexer.scan_tag(&lt).map(|t| t.kind);
    assert_eq!(tag, Some(TokenKind::TagStart(r#"a title="x > y" n={a > b}"#.into())));
    assert_eq!(lexer.pos(), 27);
}

#[test]
fn scan_tag_fails_without_close() {
    let mut lexer = Lexer::new("<a b c");
    let lt = lexer.next_token();
    assert_eq!(lexer.scan_tag(&lt), None);
    assert_eq!(lexer.pos(), 1);

    let mut lexer = Lexer::new("< 3");
    let lt = lexer.next_token();
    assert_eq!(lexer.scan_tag(&lt), None);
}

#[test]
fn content_splits_text_and_interpolation() {
    assert_eq!(
        content_tokens("Hello {", None),
        vec![TokenKind::TagText("Hello ".into()), TokenKind::LBrace]
    );
}

#[test]
fn content_drops_formatting_whitespace() {
    assert_eq!(
        content_tokens("\n    <li>", None),
        vec![TokenKind::TagStart("li".into()), TokenKind::Eof]
    );
    assert_eq!(
        content_tokens("\n  a b\n</ul>", None),
        vec![TokenKind::TagText("a b".into()), TokenKind::TagEnd("ul".into())]
    );
}

#[test]
fn content_strips_comments() {
    assert_eq!(
        content_tokens("a <!-- hidden --> b // note\n</p>", None),
        vec![TokenKind::TagText("a  b".into()), TokenKind::TagEnd("p".into())]
    );
    assert_eq!(
        content_tokens("see https://x.io</p>", None),
        vec![TokenKind::TagText("see https://x.io".into()), TokenKind::TagEnd("p".into())]
    );
}

#[test]
fn content_escaped_braces_are_text() {
    assert_eq!(
        content_tokens(r"\{x\}</p>", None),
        vec![TokenKind::TagText("{x}".into()), TokenKind::TagEnd("p".into())]
    );
}

#[test]
fn raw_mode_only_at_brace_interpolates() {
    assert_eq!(
        content_tokens("p { color: red; } a < b @{", Some("style")),
        vec![
            TokenKind::TagText("p { color: red; } a < b ".into()),
            TokenKind::AtLBrace
        ]
    );
    assert_eq!(
        content_tokens("if (a<b) {}</SCRIPT>", Some("script")),
        vec![
            TokenKind::TagText("if (a<b) {}".into()),
            TokenKind::TagEnd("SCRIPT".into())
        ]
    );
}
