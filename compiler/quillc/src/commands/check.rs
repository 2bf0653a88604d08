//! The `check` command: parse a script without running it.

use std::path::Path;

use quill_parse::Parser;

use super::{read_file, report_syntax_errors, stderr_emitter};

/// Report every syntax error in the file. Returns whether there were none.
pub fn check_file(path: &Path) -> bool {
    let source = read_file(path);
    let output = Parser::new(&source).parse_program();
    if output.has_errors() {
        let name = path.display().to_string();
        report_syntax_errors(&mut stderr_emitter(), &name, &source, &output.errors);
        return false;
    }
    println!("OK: {} ({} statements)", path.display(), output.program.stmts.len());
    true
}
