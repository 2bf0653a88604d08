//! Quill IR - shared data structures for the Quill engine.
//!
//! This crate contains the types every later stage agrees on:
//! - Spans and line/column positions for source locations
//! - Tokens produced by the lexer
//! - AST nodes (statements, expressions, patterns, tags)
//! - Arena allocation for AST nodes
//!
//! # Design Philosophy
//!
//! - **Flatten Everything**: No `Box<Expr>`, children are `ExprId(u32)` indices
//!   into an [`ExprArena`] owned by the parsed program.
//! - **Position Everywhere**: every token and node carries a byte [`Span`];
//!   [`LineIndex`] turns spans into 1-based [`Position`]s on demand.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod ids;
mod position;
mod span;
mod token;

pub use arena::ExprArena;
pub use ast::{
    AssignTarget, AtKind, BinaryOp, DictEntry, DictPatternField, Expr, ExprKind, ForBindings, Param, Pattern,
    PatternKind, Program, Stmt, StmtKind, TagAttr, TagAttrValue, TagKind, TagNode, TemplatePart,
    UnaryOp,
};
pub use ids::{ExprId, PatternId, StmtId};
pub use position::{LineIndex, Position};
pub use span::Span;
pub use token::{LexErrorKind, Token, TokenKind};
