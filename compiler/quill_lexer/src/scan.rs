//! Byte-level scanning helpers shared by the lexer and the splitters.
//!
//! All functions take the bytes of the range being lexed and return
//! absolute indices into that slice.

/// Index of the quote closing a string body that starts at `i` (just past
/// the opening quote), skipping escapes and nested strings inside `{}`
/// interpolations.
pub(crate) fn quoted_end(bytes: &[u8], mut i: usize, quote: u8, allow_newline: bool) -> Option<usize> {
    let mut depth = 0usize;
    while let Some(&c) = bytes.get(i) {
        match c {
            b'\\' => {
                i += 2;
                continue;
            }
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'"' | b'`' if depth > 0 => i = quoted_end(bytes, i + 1, c, true)?,
            _ if c == quote => return Some(i),
            b'\n' if depth == 0 && !allow_newline => return None,
            _ => {}
        }
        i += 1;
    }
    None
}

/// Index of the `}` matching an opening brace; `i` is just past the `{`.
pub(crate) fn brace_end(bytes: &[u8], mut i: usize) -> Option<usize> {
    let mut depth = 1usize;
    while let Some(&c) = bytes.get(i) {
        match c {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            b'"' | b'`' => i = quoted_end(bytes, i + 1, c, true)?,
            _ => {}
        }
        i += 1;
    }
    None
}

/// Index of the `)` matching an opening paren; `i` is just past the `(`.
/// Parens inside `{}` interpolations and strings do not count.
pub(crate) fn paren_end(bytes: &[u8], mut i: usize) -> Option<usize> {
    let mut depth = 1usize;
    while let Some(&c) = bytes.get(i) {
        match c {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            b'{' => i = brace_end(bytes, i + 1)?,
            b'\n' => return None,
            _ => {}
        }
        i += 1;
    }
    None
}

/// Bytes that end an unquoted `@` literal.
#[inline]
pub(crate) fn is_literal_end(b: u8) -> bool {
    b.is_ascii_whitespace()
        || matches!(
            b,
            b')' | b']' | b'}' | b'{' | b',' | b';' | b'"' | b'`' | b'<' | b'>'
        )
}

/// Length of the run of literal bytes at the start of `bytes`.
#[inline]
pub(crate) fn literal_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|&&b| !is_literal_end(b)).count()
}

#[inline]
pub(crate) fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_end_skips_nested_strings() {
        let src = br#"a {b["x"]} c" tail"#;
        assert_eq!(quoted_end(src, 0, b'"', false), Some(12));
    }

    #[test]
    fn quoted_end_rejects_newline_outside_interpolation() {
        assert_eq!(quoted_end(b"ab\ncd\"", 0, b'"', false), None);
        assert_eq!(quoted_end(b"ab\ncd`", 0, b'`', true), Some(5));
    }

    #[test]
    fn escaped_quote_does_not_close() {
        assert_eq!(quoted_end(br#"a\"b""#, 0, b'"', false), Some(4));
    }

    #[test]
    fn brace_and_paren_matching() {
        assert_eq!(brace_end(b"a {b} \"}\" c}", 0), Some(11));
        assert_eq!(paren_end(b"./x/{f(1)}.json)", 0), Some(15));
        assert_eq!(brace_end(b"unclosed", 0), None);
    }
}
