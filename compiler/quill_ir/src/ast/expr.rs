//! Expression nodes.

use crate::{ExprId, PatternId, Span, StmtId};

use super::{BinaryOp, TagNode, UnaryOp};

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[inline]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Expression variants.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal without interpolation
    Str(String),
    /// String literal with `{expr}` interpolation
    Template(Vec<TemplatePart>),
    /// `true` / `false`
    Bool(bool),
    /// `null`
    Null,
    /// `/pattern/flags`
    Regex { pattern: String, flags: String },
    /// `@2024-01-15`, `@1h30m`, `@./a.txt`, `@https://x`
    At { kind: AtKind, text: String },
    /// `@(./data/{name}.json)`
    AtTemplate { kind: AtKind, parts: Vec<TemplatePart> },

    /// Variable reference
    Ident(String),

    /// `[a, b]` or a bare `a, b` comma list
    Array(Vec<ExprId>),
    /// `{k: v, "k": v, [expr]: v, shorthand, ...spread}`
    Dict(Vec<DictEntry>),

    /// `fn(params) { body }`
    Function { params: Vec<Param>, body: ExprId },
    /// `{ stmts }` in block position
    Block(Vec<StmtId>),

    /// `f(args)`
    Call { func: ExprId, args: Vec<ExprId> },
    /// `a[i]`
    Index { target: ExprId, index: ExprId },
    /// `a[i:j]`, either bound optional
    Slice {
        target: ExprId,
        start: Option<ExprId>,
        end: Option<ExprId>,
    },
    /// `a.name`
    Dot { target: ExprId, name: String },

    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary { op: UnaryOp, operand: ExprId },

    /// `if (cond) a else b`
    If {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: Option<ExprId>,
    },
    /// `for (x in xs) body` / `for (i, x in xs) body`
    For {
        bindings: ForBindings,
        iterable: ExprId,
        body: ExprId,
    },

    /// Markup tag or component call
    Tag(TagNode),

    /// `import <expr>`
    Import(ExprId),

    /// Placeholder left behind by parse recovery.
    Error,
}

impl ExprKind {
    /// Literal values that need no environment to evaluate.
    ///
    /// Dictionary entries holding a constant are stored evaluated; everything
    /// else is deferred until first access.
    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            ExprKind::Int(_)
                | ExprKind::Float(_)
                | ExprKind::Str(_)
                | ExprKind::Bool(_)
                | ExprKind::Null
        )
    }
}

/// A segment of an interpolated string, `@(...)` template or tag body.
#[derive(Clone, Debug, PartialEq)]
pub enum TemplatePart {
    Text(String),
    Expr(ExprId),
}

/// Which family an `@`-literal belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AtKind {
    DateTime,
    Duration,
    Path,
    Url,
}

impl AtKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            AtKind::DateTime => "datetime",
            AtKind::Duration => "duration",
            AtKind::Path => "path",
            AtKind::Url => "url",
        }
    }
}

/// Dictionary literal entry.
#[derive(Clone, Debug, PartialEq)]
pub enum DictEntry {
    /// `key: value`, `"key": value`, or shorthand `key`
    Field { key: String, value: ExprId },
    /// `[expr]: value`
    Computed { key: ExprId, value: ExprId },
    /// `...expr`
    Spread(ExprId),
}

/// Function parameter: a binding pattern with an optional default.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub pattern: PatternId,
    pub default: Option<ExprId>,
}

/// Bindings of a `for` loop.
///
/// With one binding it receives the element (or key, character, index);
/// with two, the first receives the index/key and the second the element/value.
#[derive(Clone, Debug, PartialEq)]
pub struct ForBindings {
    pub first: PatternId,
    pub second: Option<PatternId>,
}
