//! Per-entity command shapes and select/delete assembly.

use crate::compiler::{compile, order_by};
use karst_core::{
    schema::TableInfo,
    stmt::{Direction, Expr, Value},
    Result,
};

/// Caller-visible sentinel rendered in place of an update command when the
/// table has no primary key. The runtime refuses to execute it and reports
/// `InvalidOperation` instead.
pub const NO_PRIMARY_KEY_UPDATE: &str = "CANNOT UPDATE DUE TO NO PK";

/// Sentinel for the delete-by-key command of a table with no primary key.
pub const NO_PRIMARY_KEY_DELETE: &str = "CANNOT DELETE DUE TO NO PK";

/// Projection of a generated select.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The table's explicit column list, in declared order. A `*` request
    /// is expanded to this so row decoding can rely on column positions.
    Columns,

    /// A `count(*)` projection
    Count,
}

pub fn insert(table: &TableInfo) -> String {
    let columns: Vec<_> = table.insert_columns().collect();

    // A table whose only column is the auto-increment key has nothing to
    // bind.
    if columns.is_empty() {
        return format!("insert into \"{}\" default values", table.name);
    }

    format!(
        "insert into \"{}\"({}) values ({})",
        table.name,
        columns
            .iter()
            .map(|column| format!("\"{}\"", column.name))
            .collect::<Vec<_>>()
            .join(","),
        columns.iter().map(|_| "?").collect::<Vec<_>>().join(",")
    )
}

/// Insert-or-replace binds every column, the primary key included.
pub fn insert_or_replace(table: &TableInfo) -> String {
    format!(
        "insert or replace into \"{}\"({}) values ({})",
        table.name,
        table
            .columns
            .iter()
            .map(|column| format!("\"{}\"", column.name))
            .collect::<Vec<_>>()
            .join(","),
        table.columns.iter().map(|_| "?").collect::<Vec<_>>().join(",")
    )
}

/// The primary key is excluded from the SET list; its value binds last.
pub fn update(table: &TableInfo) -> String {
    let Some(pk) = table.primary_key() else {
        return NO_PRIMARY_KEY_UPDATE.to_string();
    };

    let assignments = table
        .columns
        .iter()
        .filter(|column| !column.primary_key)
        .map(|column| format!("\"{}\" = ? ", column.name))
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "update \"{}\" set {} where {} = ? ",
        table.name, assignments, pk.name
    )
}

pub fn delete_by_key(table: &TableInfo) -> String {
    let Some(pk) = table.primary_key() else {
        return NO_PRIMARY_KEY_DELETE.to_string();
    };

    format!("delete from \"{}\" where \"{}\" = ?", table.name, pk.name)
}

/// Assembles a select; bound values are appended to `args` in placeholder
/// order.
///
/// An offset without a limit still emits a limit clause with the engine's
/// no-limit sentinel, because the engine requires a limit token
/// syntactically before offset.
pub fn select(
    table: &TableInfo,
    selection: Selection,
    filter: Option<&Expr>,
    order: &[(String, Direction)],
    limit: Option<i64>,
    offset: Option<i64>,
    args: &mut Vec<Value>,
) -> Result<String> {
    let selection_list = match selection {
        Selection::Columns => table
            .columns
            .iter()
            .map(|column| column.name.clone())
            .collect::<Vec<_>>()
            .join(","),
        Selection::Count => "count(*)".to_string(),
    };

    let mut text = format!("select {} from \"{}\"", selection_list, table.name);

    if let Some(filter) = filter {
        let fragment = compile(filter, table, args)?;
        text.push_str(" where ");
        text.push_str(&fragment.text);
    }

    if !order.is_empty() {
        text.push_str(" order by ");
        text.push_str(&order_by(order));
    }

    if let Some(limit) = limit {
        text.push_str(&format!(" limit {limit}"));
    }

    if let Some(offset) = offset {
        if limit.is_none() {
            text.push_str(" limit -1 ");
        }
        text.push_str(&format!(" offset {offset}"));
    }

    Ok(text)
}

/// Assembles a filtered delete. The caller enforces the non-empty-predicate
/// guard; this renderer always expects a filter.
pub fn delete(table: &TableInfo, filter: &Expr, args: &mut Vec<Value>) -> Result<String> {
    let fragment = compile(filter, table, args)?;
    Ok(format!(
        "delete from \"{}\" where {}",
        table.name, fragment.text
    ))
}
