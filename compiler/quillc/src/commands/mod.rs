//! Command handlers for the `quill` binary.
//!
//! Each submodule implements one command. Shared helpers for reading
//! sources and rendering diagnostics live here.

use std::io::IsTerminal;
use std::path::Path;

use quill_diagnostic::emitter::{ColorMode, DiagnosticEmitter, SourceFile, TerminalEmitter};
use quill_diagnostic::Diagnostic;
use quill_eval::EvalError;
use quill_ir::LineIndex;
use quill_parse::ParseError;

mod check;
mod debug;
mod explain;
mod run;

pub use check::check_file;
pub use debug::{lex_file, parse_file};
pub use explain::explain_error;
pub use run::{execute, run_file};

/// Read a file from disk, exiting with a user-friendly error message on failure.
pub(crate) fn read_file(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let shown = path.display();
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{shown}'"),
                std::io::ErrorKind::PermissionDenied => format!("permission denied reading '{shown}'"),
                std::io::ErrorKind::InvalidData => format!("'{shown}' contains invalid UTF-8 data"),
                _ => format!("error reading '{shown}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

pub(crate) fn stderr_emitter() -> TerminalEmitter<std::io::Stderr> {
    TerminalEmitter::stderr(ColorMode::Auto, std::io::stderr().is_terminal())
}

/// Emit every syntax error of one file, followed by a summary line.
pub(crate) fn report_syntax_errors(
    emitter: &mut impl DiagnosticEmitter,
    name: &str,
    source: &str,
    errors: &[ParseError],
) {
    let index = LineIndex::new(source);
    let diagnostics: Vec<Diagnostic> = errors.iter().map(ParseError::to_diagnostic).collect();
    emitter.emit_all(&diagnostics, Some(SourceFile { name, index: &index }));
    emitter.emit_summary(diagnostics.len());
    emitter.flush();
}

/// Emit a runtime error with a snippet from the file it happened in.
///
/// `entry` is the script as named on the command line with its text; errors
/// raised inside an imported module re-read that module for the snippet.
pub(crate) fn report_runtime_error(
    emitter: &mut impl DiagnosticEmitter,
    error: &EvalError,
    entry: (&Path, &str),
    entry_canonical: Option<&Path>,
) {
    let diagnostic = error.to_diagnostic();
    match error.module.as_deref() {
        Some(module) if Some(module) != entry_canonical => {
            let name = module.display().to_string();
            match std::fs::read_to_string(module) {
                Ok(text) => {
                    let index = LineIndex::new(&text);
                    emitter.emit(&diagnostic, Some(SourceFile { name: &name, index: &index }));
                }
                Err(_) => emitter.emit(&diagnostic, None),
            }
        }
        _ => {
            let name = entry.0.display().to_string();
            let index = LineIndex::new(entry.1);
            emitter.emit(&diagnostic, Some(SourceFile { name: &name, index: &index }));
        }
    }
    emitter.flush();
}
