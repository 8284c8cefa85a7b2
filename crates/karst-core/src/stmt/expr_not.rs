use super::Expr;

/// Logical negation of an operand expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprNot {
    pub operand: Box<Expr>,
}
