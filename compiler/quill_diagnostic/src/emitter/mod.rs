//! Diagnostic emitters.
//!
//! Emitters turn structured [`Diagnostic`]s into output. The terminal
//! emitter renders source snippets when given the source text.

mod terminal;

pub use terminal::{ColorMode, TerminalEmitter};

use quill_ir::LineIndex;

use crate::Diagnostic;

/// The file a batch of diagnostics refers to.
#[derive(Copy, Clone, Debug)]
pub struct SourceFile<'a> {
    /// Display name (usually the path as given by the user).
    pub name: &'a str,
    pub index: &'a LineIndex,
}

/// Trait for emitting diagnostics.
pub trait DiagnosticEmitter {
    /// Emit a single diagnostic, with source context when available.
    fn emit(&mut self, diagnostic: &Diagnostic, source: Option<SourceFile<'_>>);

    /// Emit multiple diagnostics against the same source.
    fn emit_all(&mut self, diagnostics: &[Diagnostic], source: Option<SourceFile<'_>>) {
        for diag in diagnostics {
            self.emit(diag, source);
        }
    }

    /// Flush any buffered output.
    fn flush(&mut self);

    /// Closing `aborting due to ...` line; silent for zero.
    fn emit_summary(&mut self, error_count: usize);
}
