//! Flat AST types using arena allocation.
//!
//! - No `Box<Expr>`: children are `ExprId`/`StmtId`/`PatternId` indices
//! - Every node carries its [`Span`](crate::Span)
//!
//! # Module Structure
//!
//! - `expr`: expressions, dictionary entries, function parameters
//! - `stmt`: statements and the top-level [`Program`]
//! - `pattern`: destructuring patterns
//! - `operators`: binary and unary operators
//! - `tag`: markup tags

mod expr;
mod operators;
mod pattern;
mod stmt;
mod tag;

pub use expr::{AtKind, DictEntry, Expr, ExprKind, ForBindings, Param, TemplatePart};
pub use operators::{BinaryOp, UnaryOp};
pub use pattern::{DictPatternField, Pattern, PatternKind};
pub use stmt::{AssignTarget, Program, Stmt, StmtKind};
pub use tag::{TagAttr, TagAttrValue, TagKind, TagNode};

#[cfg(test)]
mod tests;
