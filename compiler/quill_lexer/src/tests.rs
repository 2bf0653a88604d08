use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use quill_ir::AtKind;

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).into_iter().map(|t| t.kind).collect()
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Ident(name.to_string())
}

#[test]
fn let_statement() {
    assert_eq!(
        kinds("let x = 1_000 + 2.5"),
        vec![
            TokenKind::Let,
            ident("x"),
            TokenKind::Eq,
            TokenKind::Int(1000),
            TokenKind::Plus,
            TokenKind::Float(2.5f64.to_bits()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn range_is_not_a_float() {
    assert_eq!(
        kinds("1..5"),
        vec![TokenKind::Int(1), TokenKind::DotDot, TokenKind::Int(5), TokenKind::Eof]
    );
}

#[test]
fn exponent_floats() {
    assert_eq!(
        kinds("1e3 2.5e-2"),
        vec![
            TokenKind::Float(1000.0f64.to_bits()),
            TokenKind::Float(0.025f64.to_bits()),
            TokenKind::Eof
        ]
    );
}

#[test]
fn multi_char_operators() {
    assert_eq!(
        kinds("++ == != <= >= !~ ?? ... <== ==> ==>> || &&"),
        vec![
            TokenKind::PlusPlus,
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::LtEq,
            TokenKind::GtEq,
            TokenKind::BangTilde,
            TokenKind::Question2,
            TokenKind::DotDotDot,
            TokenKind::ReadArrow,
            TokenKind::WriteArrow,
            TokenKind::AppendArrow,
            TokenKind::PipePipe,
            TokenKind::AmpAmp,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn strings_keep_raw_body() {
    assert_eq!(
        kinds(r#""a {b["c"]} \" d" `x`"#),
        vec![
            TokenKind::Str {
                raw: r#"a {b["c"]} \" d"#.into(),
                backtick: false
            },
            TokenKind::Str {
                raw: "x".into(),
                backtick: true
            },
            TokenKind::Eof,
        ]
    );
}

#[test]
fn backtick_strings_span_lines() {
    assert_eq!(
        kinds("`a\nb`"),
        vec![
            TokenKind::Str {
                raw: "a\nb".into(),
                backtick: true
            },
            TokenKind::Eof
        ]
    );
}

#[test]
fn unterminated_string_is_illegal_and_lexing_continues() {
    let tokens = lex("\"abc\nlet");
    assert!(matches!(
        tokens[0].kind,
        TokenKind::Illegal {
            kind: quill_ir::LexErrorKind::UnterminatedString,
            ..
        }
    ));
    assert_eq!(tokens[1].kind, TokenKind::Let);
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("a // comment\nb <!-- html --> c"),
        vec![ident("a"), ident("b"), ident("c"), TokenKind::Eof]
    );
}

#[test]
fn newline_flag_is_recorded() {
    let tokens = lex("a\nb c");
    let breaks: Vec<bool> = tokens.iter().map(|t| t.newline_before).collect();
    assert_eq!(breaks, vec![false, true, false, false]);
}

#[test]
fn positions_are_line_and_column() {
    let tokens = lex("let a\n  = 1");
    assert_eq!(tokens[2].position, Position::new(2, 3));
    assert_eq!(tokens[2].span, Span::new(8, 9));
}

#[test]
fn at_literals() {
    assert_eq!(
        kinds("@2024-01-15 @1h30m @./a.txt @https://x.io/p @stdin @-1d"),
        vec![
            TokenKind::At {
                kind: AtKind::DateTime,
                text: "2024-01-15".into()
            },
            TokenKind::At {
                kind: AtKind::Duration,
                text: "1h30m".into()
            },
            TokenKind::At {
                kind: AtKind::Path,
                text: "./a.txt".into()
            },
            TokenKind::At {
                kind: AtKind::Url,
                text: "https://x.io/p".into()
            },
            TokenKind::At {
                kind: AtKind::Path,
                text: "stdin".into()
            },
            TokenKind::At {
                kind: AtKind::Duration,
                text: "-1d".into()
            },
            TokenKind::Eof,
        ]
    );
}

#[test]
fn at_template() {
    assert_eq!(
        kinds("@(./data/{name}.json)"),
        vec![
            TokenKind::AtTemplate {
                kind: AtKind::Path,
                raw: "./data/{name}.json".into()
            },
            TokenKind::Eof
        ]
    );
}

#[test]
fn bad_at_literal_is_illegal() {
    let tokens = lex("@nope x");
    assert!(matches!(
        tokens[0].kind,
        TokenKind::Illegal {
            kind: quill_ir::LexErrorKind::InvalidAtLiteral,
            ..
        }
    ));
    assert_eq!(tokens[1].kind, ident("x"));
}

#[test]
fn regex_rescan() {
    let mut lexer = Lexer::new(r"/a[/]b\/c/i + 1");
    let slash = lexer.next_token();
    assert_eq!(slash.kind, TokenKind::Slash);
    let regex = lexer.rescan_regex(&slash);
    assert_eq!(
        regex.kind,
        TokenKind::Regex {
            pattern: r"a[/]b\/c".into(),
            flags: "i".into()
        }
    );
    assert_eq!(lexer.next_token().kind, TokenKind::Plus);
}

#[test]
fn regex_bad_flag() {
    let mut lexer = Lexer::new("/a/g");
    let slash = lexer.next_token();
    assert!(matches!(lexer.rescan_regex(&slash).kind, TokenKind::Illegal { .. }));
}

#[test]
fn sub_range_lexing_keeps_file_positions() {
    let source = "\"x {a + b} y\"";
    let index = Arc::new(LineIndex::new(source));
    let mut lexer = Lexer::with_range(index, 4, 9);
    let a = lexer.next_token();
    assert_eq!(a.kind, ident("a"));
    assert_eq!(a.span, Span::new(4, 5));
    assert_eq!(lexer.next_token().kind, TokenKind::Plus);
    assert_eq!(lexer.next_token().kind, ident("b"));
    assert_eq!(lexer.next_token().kind, TokenKind::Eof);
}

#[test]
fn invalid_character() {
    let tokens = lex("a $ b");
    assert!(matches!(tokens[1].kind, TokenKind::Illegal { .. }));
    assert_eq!(tokens[2].kind, ident("b"));
}

#[test]
fn huge_integer_is_illegal() {
    assert!(matches!(
        kinds("99999999999999999999")[0],
        TokenKind::Illegal {
            kind: quill_ir::LexErrorKind::InvalidNumber,
            ..
        }
    ));
}

proptest! {
    #[test]
    fn lexing_terminates_with_ordered_spans(source in "\\PC{0,64}") {
        let tokens = lex(&source);
        prop_assert!(tokens.last().is_some_and(Token::is_eof));
        let mut last_end = 0;
        for token in &tokens {
            prop_assert!(token.span.start >= last_end);
            prop_assert!(token.span.end >= token.span.start);
            last_end = token.span.end;
        }
    }

    #[test]
    fn tag_content_always_advances(source in "[a-z<>{}/@ \n!-]{0,40}") {
        let mut lexer = Lexer::new(&source);
        let mut pos = 0;
        for _ in 0..200 {
            let token = lexer.scan_tag_content(pos, None);
            if token.is_eof() {
                break;
            }
            let next = token.span.end as usize;
            prop_assert!(next > pos || matches!(token.kind, TokenKind::TagText(_)));
            pos = next.max(pos + 1).min(source.len());
        }
    }
}
