//! Binary and unary operators.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// `++`
    Concat,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    In,

    // Logical
    And,
    Or,

    // Set operations (logical on two booleans)
    /// `||`
    Union,
    /// `&&`
    Intersect,

    // Regex
    Match,
    NotMatch,

    // Other
    Range,
    Coalesce,
}

impl BinaryOp {
    /// Returns the source-level symbol for this operator.
    ///
    /// Used in error messages to show the exact operator that failed.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Concat => "++",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::In => "in",
            Self::And => "and",
            Self::Or => "or",
            Self::Union => "||",
            Self::Intersect => "&&",
            Self::Match => "~",
            Self::NotMatch => "!~",
            Self::Range => "..",
            Self::Coalesce => "??",
        }
    }

    /// Binding power of this operator.
    ///
    /// Higher number = binds more tightly.
    /// - 1: `??`
    /// - 2: `or`
    /// - 3: `and`
    /// - 4: `==` `!=`
    /// - 5: `<` `<=` `>` `>=` `in`
    /// - 6: `~` `!~`
    /// - 7: `..`
    /// - 8: `+` `-` `||`
    /// - 9: `*` `/` `%` `&&`
    /// - 10: `++`
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Coalesce => 1,
            Self::Or => 2,
            Self::And => 3,
            Self::Eq | Self::NotEq => 4,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq | Self::In => 5,
            Self::Match | Self::NotMatch => 6,
            Self::Range => 7,
            Self::Add | Self::Sub | Self::Union => 8,
            Self::Mul | Self::Div | Self::Mod | Self::Intersect => 9,
            Self::Concat => 10,
        }
    }

    /// Operators whose right operand is evaluated only on demand.
    pub const fn is_short_circuit(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Coalesce)
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `!x` / `not x`
    Not,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}
