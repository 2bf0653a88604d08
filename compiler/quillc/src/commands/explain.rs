//! The `explain` command: describe an error code.

use quill_diagnostic::{ErrorCode, Phase};

/// Print what `code_str` means. Returns false for unknown codes.
pub fn explain_error(code_str: &str) -> bool {
    let Ok(code) = code_str.parse::<ErrorCode>() else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Codes have the format EXXXX where X is a digit.");
        eprintln!("Examples: E0001, E1001, E6004");
        return false;
    };
    let phase = match code.phase() {
        Phase::Lexer => "lexer",
        Phase::Parser => "parser",
        Phase::Runtime => "runtime",
        Phase::Module => "module loading",
    };
    println!("{code}: {}", code.description());
    println!("Reported during {phase}.");
    if code.is_syntax_error() {
        println!("Syntax errors are reported for the whole file before anything runs.");
    }
    true
}
