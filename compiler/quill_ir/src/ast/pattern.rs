//! Destructuring patterns.
//!
//! Patterns appear on the binding side of `let`, assignment, `<==`, `for`
//! and function parameters. Whether a value fits the pattern is a runtime
//! question; the parser only checks shape.

use crate::{ExprId, PatternId, Span};

#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

impl Pattern {
    #[inline]
    pub fn new(kind: PatternKind, span: Span) -> Self {
        Pattern { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PatternKind {
    /// `x`
    Ident(String),
    /// `[a, b, ...rest]` (also the bare `a, b` form on the left of `=`)
    Array {
        elements: Vec<PatternId>,
        rest: Option<String>,
    },
    /// `{a, b as c, d: {e}, f = 1, ...rest}`
    Dict {
        fields: Vec<DictPatternField>,
        rest: Option<String>,
    },
}

/// One key in a dictionary pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct DictPatternField {
    pub key: String,
    /// `key as alias`
    pub alias: Option<String>,
    /// `key: {subpattern}` / `key: [subpattern]`
    pub nested: Option<PatternId>,
    /// `key = default`
    pub default: Option<ExprId>,
}

impl DictPatternField {
    /// Name the field binds when it has no nested pattern.
    pub fn binding_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.key)
    }
}
