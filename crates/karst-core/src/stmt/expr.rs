use super::{
    BinaryOp, Comparison, ExprBinaryOp, ExprCall, ExprCast, ExprColumn, ExprList, ExprNot, Type,
    Value,
};

/// A node of a predicate or order-key expression tree over a single entity
/// type.
///
/// The node set is closed: the compiler translates exactly these shapes and
/// nothing else. Trees are built with the constructor helpers below,
/// compiled once, and discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A binary comparison or logical combination
    BinaryOp(ExprBinaryOp),

    /// Logical negation
    Not(ExprNot),

    /// One of the recognized call forms
    Call(ExprCall),

    /// A constant leaf, bound as a positional parameter
    Value(Value),

    /// Re-conversion of the operand's value to another type
    Cast(ExprCast),

    /// A reference to a record field, resolved to a column name
    Column(ExprColumn),

    /// A pre-evaluated collection, expanded to a placeholder list
    List(ExprList),
}

impl Expr {
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// References a record field of the queried entity; the compiler
    /// resolves it to a quoted column name through the table mapping.
    pub fn column(field: impl Into<String>) -> Self {
        ExprColumn {
            field: field.into(),
        }
        .into()
    }

    pub fn list(items: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        ExprList {
            items: items.into_iter().map(Into::into).collect(),
        }
        .into()
    }

    pub fn binary_op(lhs: impl Into<Self>, op: BinaryOp, rhs: impl Into<Self>) -> Self {
        ExprBinaryOp {
            lhs: Box::new(lhs.into()),
            op,
            rhs: Box::new(rhs.into()),
        }
        .into()
    }

    pub fn eq(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Self::binary_op(lhs, BinaryOp::Eq, rhs)
    }

    pub fn ne(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Self::binary_op(lhs, BinaryOp::Ne, rhs)
    }

    pub fn lt(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Self::binary_op(lhs, BinaryOp::Lt, rhs)
    }

    pub fn le(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Self::binary_op(lhs, BinaryOp::Le, rhs)
    }

    pub fn gt(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Self::binary_op(lhs, BinaryOp::Gt, rhs)
    }

    pub fn ge(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Self::binary_op(lhs, BinaryOp::Ge, rhs)
    }

    pub fn and(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Self::binary_op(lhs, BinaryOp::And, rhs)
    }

    pub fn or(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Self::binary_op(lhs, BinaryOp::Or, rhs)
    }

    pub fn not(operand: impl Into<Self>) -> Self {
        ExprNot {
            operand: Box::new(operand.into()),
        }
        .into()
    }

    pub fn like(expr: impl Into<Self>, pattern: impl Into<Self>) -> Self {
        ExprCall::Like {
            expr: Box::new(expr.into()),
            pattern: Box::new(pattern.into()),
        }
        .into()
    }

    /// Membership test against a collection or another column.
    pub fn in_list(needle: impl Into<Self>, haystack: impl Into<Self>) -> Self {
        ExprCall::In {
            needle: Box::new(needle.into()),
            haystack: Box::new(haystack.into()),
        }
        .into()
    }

    /// Substring containment, rendered with `instr`.
    pub fn contains(expr: impl Into<Self>, substring: impl Into<Self>) -> Self {
        ExprCall::Contains {
            expr: Box::new(expr.into()),
            substring: Box::new(substring.into()),
        }
        .into()
    }

    pub fn starts_with(expr: impl Into<Self>, pattern: impl Into<Self>) -> Self {
        Self::starts_with_mode(expr, pattern, Comparison::default())
    }

    pub fn starts_with_mode(
        expr: impl Into<Self>,
        pattern: impl Into<Self>,
        comparison: Comparison,
    ) -> Self {
        ExprCall::StartsWith {
            expr: Box::new(expr.into()),
            pattern: Box::new(pattern.into()),
            comparison,
        }
        .into()
    }

    pub fn ends_with(expr: impl Into<Self>, pattern: impl Into<Self>) -> Self {
        Self::ends_with_mode(expr, pattern, Comparison::default())
    }

    pub fn ends_with_mode(
        expr: impl Into<Self>,
        pattern: impl Into<Self>,
        comparison: Comparison,
    ) -> Self {
        ExprCall::EndsWith {
            expr: Box::new(expr.into()),
            pattern: Box::new(pattern.into()),
            comparison,
        }
        .into()
    }

    pub fn equals(expr: impl Into<Self>, other: impl Into<Self>) -> Self {
        ExprCall::Equals {
            expr: Box::new(expr.into()),
            other: Box::new(other.into()),
        }
        .into()
    }

    pub fn lower(expr: impl Into<Self>) -> Self {
        ExprCall::Lower(Box::new(expr.into())).into()
    }

    pub fn upper(expr: impl Into<Self>) -> Self {
        ExprCall::Upper(Box::new(expr.into())).into()
    }

    pub fn replace(expr: impl Into<Self>, from: impl Into<Self>, to: impl Into<Self>) -> Self {
        ExprCall::Replace {
            expr: Box::new(expr.into()),
            from: Box::new(from.into()),
            to: Box::new(to.into()),
        }
        .into()
    }

    pub fn is_null_or_empty(expr: impl Into<Self>) -> Self {
        ExprCall::IsNullOrEmpty(Box::new(expr.into())).into()
    }

    /// Escape hatch: emits the lowercased name as a literal SQL function
    /// call with compiled arguments, without validating the name against
    /// the engine's function set.
    pub fn call_unchecked(name: impl Into<String>, args: Vec<Self>) -> Self {
        ExprCall::Unchecked {
            name: name.into(),
            args,
        }
        .into()
    }

    pub fn cast(expr: impl Into<Self>, ty: Type) -> Self {
        ExprCast {
            expr: Box::new(expr.into()),
            ty,
        }
        .into()
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl From<ExprBinaryOp> for Expr {
    fn from(src: ExprBinaryOp) -> Self {
        Self::BinaryOp(src)
    }
}

impl From<ExprNot> for Expr {
    fn from(src: ExprNot) -> Self {
        Self::Not(src)
    }
}

impl From<ExprCall> for Expr {
    fn from(src: ExprCall) -> Self {
        Self::Call(src)
    }
}

impl From<ExprCast> for Expr {
    fn from(src: ExprCast) -> Self {
        Self::Cast(src)
    }
}

impl From<ExprColumn> for Expr {
    fn from(src: ExprColumn) -> Self {
        Self::Column(src)
    }
}

impl From<ExprList> for Expr {
    fn from(src: ExprList) -> Self {
        Self::List(src)
    }
}

impl From<Value> for Expr {
    fn from(src: Value) -> Self {
        Self::Value(src)
    }
}

macro_rules! expr_from_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Expr {
                fn from(src: $ty) -> Self {
                    Self::Value(src.into())
                }
            }
        )+
    };
}

expr_from_value!(
    bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, &str, String,
    rust_decimal::Decimal, uuid::Uuid
);

impl<T> From<Option<T>> for Expr
where
    Value: From<T>,
{
    fn from(src: Option<T>) -> Self {
        Self::Value(src.into())
    }
}
