mod direction;
pub use direction::Direction;

mod expr;
pub use expr::Expr;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_call;
pub use expr_call::{Comparison, ExprCall};

mod expr_cast;
pub use expr_cast::ExprCast;

mod expr_column;
pub use expr_column::ExprColumn;

mod expr_list;
pub use expr_list::ExprList;

mod expr_not;
pub use expr_not::ExprNot;

mod from_value;
pub use from_value::FromValue;

mod op_binary;
pub use op_binary::BinaryOp;

pub mod ticks;

mod ty;
pub use ty::Type;

mod value;
pub use value::{Value, ValueEnum};
