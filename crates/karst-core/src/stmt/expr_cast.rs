use super::{Expr, Type};

/// Re-converts the operand's resolved value to a target type.
///
/// The emitted SQL is the operand's; the conversion only affects the
/// resolved constant carried alongside it (supporting nullable unwrap).
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCast {
    pub expr: Box<Expr>,
    pub ty: Type,
}
