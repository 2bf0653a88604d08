//! Operator matching helpers.

use quill_ir::{BinaryOp, TokenKind, UnaryOp};

use crate::Parser;

impl Parser {
    pub(crate) fn match_binary_op(&self) -> Option<BinaryOp> {
        Some(match self.cursor.current_kind() {
            TokenKind::Question2 => BinaryOp::Coalesce,
            TokenKind::Or => BinaryOp::Or,
            TokenKind::And => BinaryOp::And,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::In => BinaryOp::In,
            TokenKind::Tilde => BinaryOp::Match,
            TokenKind::BangTilde => BinaryOp::NotMatch,
            TokenKind::DotDot => BinaryOp::Range,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::PipePipe => BinaryOp::Union,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            TokenKind::AmpAmp => BinaryOp::Intersect,
            TokenKind::PlusPlus => BinaryOp::Concat,
            _ => return None,
        })
    }

    pub(crate) fn match_unary_op(&self) -> Option<UnaryOp> {
        match self.cursor.current_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang | TokenKind::Not => Some(UnaryOp::Not),
            _ => None,
        }
    }
}
