//! Arena allocation for the flat AST.
//!
//! All nodes of one source file live in contiguous vectors; child
//! references are indices. The arena is built once by the parser and then
//! shared read-only by the evaluator (closures keep the arena of the file
//! they were defined in alive).

use std::fmt;

use crate::{Expr, ExprId, Pattern, PatternId, Stmt, StmtId};

/// Node storage for one source file.
#[derive(Clone, Default, PartialEq)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    patterns: Vec<Pattern>,
}

/// `alloc_*`, `get_*` and `*_count` for one node vector.
///
/// `get_*` indexes directly: ids only come from this arena's `alloc_*`, so
/// an out-of-range id is a bug and panics.
macro_rules! node_store {
    ($field:ident: $node:ty, $id:ident, $alloc:ident, $get:ident, $count:ident) => {
        #[inline]
        pub fn $alloc(&mut self, node: $node) -> $id {
            let id = $id::new(next_index(self.$field.len()));
            self.$field.push(node);
            id
        }

        #[inline]
        #[track_caller]
        pub fn $get(&self, id: $id) -> &$node {
            &self.$field[id.index()]
        }

        #[inline]
        pub fn $count(&self) -> usize {
            self.$field.len()
        }
    };
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size for a source of `source_len` bytes; roughly one expression
    /// per 16 bytes.
    pub fn with_capacity(source_len: usize) -> Self {
        let exprs = source_len / 16;
        ExprArena {
            exprs: Vec::with_capacity(exprs),
            stmts: Vec::with_capacity(exprs / 4),
            patterns: Vec::with_capacity(exprs / 8),
        }
    }

    node_store!(exprs: Expr, ExprId, alloc_expr, get_expr, expr_count);
    node_store!(stmts: Stmt, StmtId, alloc_stmt, get_stmt, stmt_count);
    node_store!(patterns: Pattern, PatternId, alloc_pattern, get_pattern, pattern_count);
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
fn next_index(len: usize) -> u32 {
    // u32::MAX is the INVALID sentinel.
    debug_assert!(len < u32::MAX as usize, "AST arena overflow");
    len as u32
}

impl fmt::Debug for ExprArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExprArena({} exprs, {} stmts, {} patterns)",
            self.exprs.len(),
            self.stmts.len(),
            self.patterns.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExprKind, PatternKind, Span, StmtKind};

    #[test]
    fn ids_are_dense_per_node_kind() {
        let mut arena = ExprArena::with_capacity(64);
        let one = arena.alloc_expr(Expr::new(ExprKind::Int(1), Span::new(0, 1)));
        let two = arena.alloc_expr(Expr::new(ExprKind::Int(2), Span::new(2, 3)));
        let stmt = arena.alloc_stmt(Stmt::new(StmtKind::Expr(one), Span::new(0, 1)));
        let pat = arena.alloc_pattern(Pattern::new(PatternKind::Ident("x".into()), Span::DUMMY));

        assert_eq!((one.index(), two.index()), (0, 1));
        assert_eq!((stmt.index(), pat.index()), (0, 0));
        assert_eq!(arena.get_expr(two).kind, ExprKind::Int(2));
        assert_eq!(arena.get_stmt(stmt).kind, StmtKind::Expr(one));
        assert_eq!(arena.get_pattern(pat).kind, PatternKind::Ident("x".into()));
        assert_eq!(format!("{arena:?}"), "ExprArena(2 exprs, 1 stmts, 1 patterns)");
    }
}
