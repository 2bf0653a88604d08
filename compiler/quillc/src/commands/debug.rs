//! Debug commands: `lex` and `parse` for inspecting the front end.

use std::path::Path;

use quill_parse::dump::dump_program;
use quill_parse::Parser;

use super::read_file;

/// Lex a file and display the token stream.
pub fn lex_file(path: &Path) {
    let source = read_file(path);
    let tokens = quill_lexer::lex(&source);

    println!("Tokens for '{}' ({} tokens):", path.display(), tokens.len());
    for token in &tokens {
        println!("  {:?} @ {}", token.kind, token.position);
    }
}

/// Parse a file and display its syntax tree.
pub fn parse_file(path: &Path) {
    let source = read_file(path);
    let output = Parser::new(&source).parse_program();

    println!("Parse result for '{}':", path.display());
    println!("  Statements: {}", output.program.stmts.len());
    println!("  Errors: {}", output.errors.len());
    println!();
    println!("{}", dump_program(&output.program, &output.arena));

    if !output.errors.is_empty() {
        println!();
        println!("Errors:");
        for error in &output.errors {
            println!("  {error}");
        }
    }
}
