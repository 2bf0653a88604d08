//! A parsed source file ready for evaluation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use quill_ir::{ExprArena, LineIndex, Program, Span};
use quill_parse::{ParseError, ParseOutput, Parser};

/// One parsed file: its AST arena, statements, and line index.
///
/// Functions and lazy dictionary fields keep an `Arc<Unit>` so their
/// expression ids stay valid after the file that defined them has finished
/// running.
#[derive(Debug)]
pub struct Unit {
    pub program: Program,
    pub arena: ExprArena,
    pub line_index: Arc<LineIndex>,
    /// Canonical path for files; `None` for sources evaluated from a string.
    pub path: Option<PathBuf>,
}

impl Unit {
    /// Parse `source`, returning every syntax error if there are any.
    pub fn parse(source: &str, path: Option<PathBuf>, max_nesting: usize) -> Result<Unit, Vec<ParseError>> {
        let ParseOutput {
            program,
            arena,
            errors,
            line_index,
        } = Parser::new(source).with_max_nesting(max_nesting).parse_program();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Unit {
            program,
            arena,
            line_index,
            path,
        })
    }

    /// A unit with no statements, for calls made from host code.
    pub fn empty(path: Option<PathBuf>) -> Unit {
        Unit {
            program: Program::default(),
            arena: ExprArena::new(),
            line_index: Arc::new(LineIndex::new("")),
            path,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Directory relative paths in this unit resolve against.
    pub fn base_dir(&self) -> PathBuf {
        match self.path.as_deref().and_then(Path::parent) {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Attach this unit's location for `span` to an error.
    pub(crate) fn locate(&self, error: crate::EvalError, span: Span) -> crate::EvalError {
        error.located(span, &self.line_index, self.path())
    }
}
