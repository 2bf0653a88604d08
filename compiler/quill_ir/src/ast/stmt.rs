//! Statements.

use crate::{ExprId, PatternId, Span, StmtId};

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    #[inline]
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// `[export] let pattern = value`
    Let {
        pattern: PatternId,
        value: ExprId,
        export: bool,
    },
    /// `target = value`, `export name = value`
    Assign {
        target: AssignTarget,
        value: ExprId,
        export: bool,
    },
    /// `[let] pattern <== source`
    Read {
        pattern: PatternId,
        source: ExprId,
        declare: bool,
    },
    /// `value ==> target` / `value ==>> target`
    Write {
        value: ExprId,
        target: ExprId,
        append: bool,
    },
    Return(Option<ExprId>),
    Break,
    Continue,
    Expr(ExprId),
}

/// Left-hand side of an assignment.
#[derive(Clone, Debug, PartialEq)]
pub enum AssignTarget {
    /// Identifier or destructuring pattern
    Pattern(PatternId),
    /// `a[i]` or `a.b`, assigned in place
    Place(ExprId),
}

/// A parsed source file: its top-level statements in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub stmts: Vec<StmtId>,
}
