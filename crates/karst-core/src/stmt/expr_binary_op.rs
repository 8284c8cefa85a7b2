use super::{BinaryOp, Expr};

/// A binary operation between two expressions.
///
/// Applies a comparison, logical, or bitwise operator to a left-hand side
/// and right-hand side expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprBinaryOp {
    /// The left-hand side expression.
    pub lhs: Box<Expr>,

    /// The operator to apply.
    pub op: BinaryOp,

    /// The right-hand side expression.
    pub rhs: Box<Expr>,
}
