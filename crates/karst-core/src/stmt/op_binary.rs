use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
}

impl BinaryOp {
    pub fn is_eq(self) -> bool {
        matches!(self, Self::Eq)
    }

    pub fn is_ne(self) -> bool {
        matches!(self, Self::Ne)
    }

    /// True for the ordering comparisons, which are never true against NULL.
    pub fn is_ordering(self) -> bool {
        matches!(self, Self::Lt | Self::Le | Self::Gt | Self::Ge)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOp::*;

        match self {
            Eq => "=".fmt(f),
            Ne => "!=".fmt(f),
            Lt => "<".fmt(f),
            Le => "<=".fmt(f),
            Gt => ">".fmt(f),
            Ge => ">=".fmt(f),
            And => "and".fmt(f),
            Or => "or".fmt(f),
            BitAnd => "&".fmt(f),
            BitOr => "|".fmt(f),
        }
    }
}
