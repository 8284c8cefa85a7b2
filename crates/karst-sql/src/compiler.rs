//! Recursive translation of a predicate/order-key tree into a parenthesized
//! SQL fragment plus an ordered argument list.

use karst_core::{
    schema::TableInfo,
    stmt::{BinaryOp, Comparison, Direction, Expr, ExprCall, Value},
    Error, Result,
};

/// The compiled output of one tree node.
///
/// `value` carries the node's resolved constant when one exists; it feeds
/// the NULL rewriting of binary comparisons, boolean inversion under NOT,
/// cast re-conversion, and the length arithmetic of ordinal prefix/suffix
/// matching.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub value: Option<Value>,
}

impl Fragment {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: None,
        }
    }

    /// True when this fragment is a bound placeholder whose resolved value
    /// is NULL; equality against it must rewrite to the `is` form.
    fn is_null_parameter(&self) -> bool {
        self.text == "?" && matches!(self.value, Some(Value::Null))
    }
}

/// Compiles an expression tree for `table`, appending bound values to
/// `args` in placeholder order.
pub fn compile(expr: &Expr, table: &TableInfo, args: &mut Vec<Value>) -> Result<Fragment> {
    match expr {
        Expr::BinaryOp(node) => {
            let lhs = compile(&node.lhs, table, args)?;
            let rhs = compile(&node.rhs, table, args)?;

            // NULL is not comparable with `=`; rewrite around the non-null
            // side.
            let text = if lhs.is_null_parameter() {
                null_binary(node.op, &rhs)?
            } else if rhs.is_null_parameter() {
                null_binary(node.op, &lhs)?
            } else {
                format!("({} {} {})", lhs.text, node.op, rhs.text)
            };

            Ok(Fragment { text, value: None })
        }
        Expr::Not(node) => {
            let operand = compile(&node.operand, table, args)?;
            let value = match operand.value {
                Some(Value::Bool(b)) => Some(Value::Bool(!b)),
                other => other,
            };
            Ok(Fragment {
                text: format!("NOT({})", operand.text),
                value,
            })
        }
        Expr::Call(call) => compile_call(call, table, args),
        Expr::Value(value) => {
            args.push(value.clone());
            Ok(Fragment {
                text: "?".to_string(),
                value: Some(value.clone()),
            })
        }
        Expr::Cast(node) => {
            let operand = compile(&node.expr, table, args)?;
            let value = operand
                .value
                .map(|value| value.convert(&node.ty))
                .transpose()?;
            Ok(Fragment {
                text: operand.text,
                value,
            })
        }
        Expr::Column(node) => {
            let column = table.column_name_for_field(&node.field).ok_or_else(|| {
                Error::unsupported_expression(format!(
                    "no column of \"{}\" is mapped to field `{}`",
                    table.name, node.field
                ))
            })?;
            Ok(Fragment::text(format!("\"{column}\"")))
        }
        Expr::List(node) => {
            let mut text = String::from("(");
            for (i, item) in node.items.iter().enumerate() {
                if i > 0 {
                    text.push(',');
                }
                text.push('?');
                args.push(item.clone());
            }
            text.push(')');
            Ok(Fragment::text(text))
        }
    }
}

fn compile_call(call: &ExprCall, table: &TableInfo, args: &mut Vec<Value>) -> Result<Fragment> {
    let text = match call {
        ExprCall::Like { expr, pattern } => {
            let expr = compile(expr, table, args)?;
            let pattern = compile(pattern, table, args)?;
            format!("({} like {})", expr.text, pattern.text)
        }
        ExprCall::In { needle, haystack } => {
            let needle = compile(needle, table, args)?;
            let haystack = compile(haystack, table, args)?;
            format!("({} in {})", needle.text, haystack.text)
        }
        ExprCall::Contains { expr, substring } => {
            let expr = compile(expr, table, args)?;
            let substring = compile(substring, table, args)?;
            format!("( instr({},{}) >0 )", expr.text, substring.text)
        }
        ExprCall::StartsWith {
            expr,
            pattern,
            comparison,
        } => {
            let expr = compile(expr, table, args)?;
            let pattern = compile(pattern, table, args)?;
            match comparison {
                Comparison::Ordinal => {
                    let len = pattern_length(&pattern)?;
                    format!("( substr({}, 1, {}) =  {})", expr.text, len, pattern.text)
                }
                Comparison::IgnoreCase => {
                    format!("({} like ({} || '%'))", expr.text, pattern.text)
                }
            }
        }
        ExprCall::EndsWith {
            expr,
            pattern,
            comparison,
        } => {
            let expr = compile(expr, table, args)?;
            let pattern = compile(pattern, table, args)?;
            match comparison {
                Comparison::Ordinal => {
                    let len = pattern_length(&pattern)?;
                    format!(
                        "( substr({}, length({}) - {}+1, {}) =  {})",
                        expr.text, expr.text, len, len, pattern.text
                    )
                }
                Comparison::IgnoreCase => {
                    format!("({} like ('%' || {}))", expr.text, pattern.text)
                }
            }
        }
        ExprCall::Equals { expr, other } => {
            let expr = compile(expr, table, args)?;
            let other = compile(other, table, args)?;
            format!("({} = ({}))", expr.text, other.text)
        }
        ExprCall::Lower(expr) => {
            let expr = compile(expr, table, args)?;
            format!("(lower({}))", expr.text)
        }
        ExprCall::Upper(expr) => {
            let expr = compile(expr, table, args)?;
            format!("(upper({}))", expr.text)
        }
        ExprCall::Replace { expr, from, to } => {
            let expr = compile(expr, table, args)?;
            let from = compile(from, table, args)?;
            let to = compile(to, table, args)?;
            format!("(replace({},{},{}))", expr.text, from.text, to.text)
        }
        ExprCall::IsNullOrEmpty(expr) => {
            let expr = compile(expr, table, args)?;
            format!("({} is null or{} ='' )", expr.text, expr.text)
        }
        ExprCall::Unchecked { name, args: call_args } => {
            let mut compiled = Vec::with_capacity(call_args.len());
            for arg in call_args {
                compiled.push(compile(arg, table, args)?.text);
            }
            format!("{}({})", name.to_lowercase(), compiled.join(","))
        }
    };

    Ok(Fragment::text(text))
}

/// Character length of an ordinal prefix/suffix pattern, which must have
/// resolved to a text constant.
fn pattern_length(pattern: &Fragment) -> Result<usize> {
    match &pattern.value {
        Some(Value::String(s)) => Ok(s.chars().count()),
        _ => Err(Error::unsupported_expression(
            "ordinal prefix/suffix matching requires a constant text pattern",
        )),
    }
}

/// Rewrites a comparison against a NULL parameter. Equality forms use
/// `is` / `is not`; ordering forms are never true against NULL and keep the
/// original's always-false `<` emission.
fn null_binary(op: BinaryOp, other: &Fragment) -> Result<String> {
    if op.is_eq() {
        Ok(format!("({} is ?)", other.text))
    } else if op.is_ne() {
        Ok(format!("({} is not ?)", other.text))
    } else if op.is_ordering() {
        Ok(format!("({} < ?)", other.text))
    } else {
        Err(Error::unsupported_expression(format!(
            "cannot compile a NULL comparison with operator `{op}`"
        )))
    }
}

/// Renders an order-by list: quoted column names, `desc` suffix where
/// requested, comma-joined.
pub fn order_by(entries: &[(String, Direction)]) -> String {
    entries
        .iter()
        .map(|(column, direction)| {
            format!(
                "\"{}\"{}",
                column,
                if direction.is_desc() { " desc" } else { "" }
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}
