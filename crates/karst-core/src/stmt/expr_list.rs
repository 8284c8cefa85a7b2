use super::{Expr, Value};

/// A pre-evaluated collection of values.
///
/// Expands to a parenthesized, comma-joined placeholder list; used as the
/// right-hand side of a membership test against a fixed-size collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprList {
    pub items: Vec<Value>,
}

impl Expr {
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
}
