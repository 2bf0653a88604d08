//! Grammar productions, one module per syntactic category.

mod expr;
mod pattern;
mod stmt;
mod tag;

pub(crate) use expr::can_start_expression;
