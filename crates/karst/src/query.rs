//! Fluent, value-immutable query accumulation.

use crate::connection::Connection;
use crate::model::Model;
use karst_core::{
    stmt::{Direction, Expr, Value},
    Error, Result,
};
use karst_sql::Selection;
use std::marker::PhantomData;

/// A filtered, ordered view of a mapped table.
///
/// Every fluent call clones the accumulated state and returns a new query;
/// the receiver is never mutated, so a query can safely serve as the base
/// for several derived queries. Materialization re-executes the underlying
/// select on every call.
pub struct Query<'a, T: Model> {
    conn: &'a Connection,
    filter: Option<Expr>,
    order_by: Vec<(String, Direction)>,
    limit: Option<i64>,
    offset: Option<i64>,
    _model: PhantomData<fn() -> T>,
}

impl<T: Model> Clone for Query<'_, T> {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn,
            filter: self.filter.clone(),
            order_by: self.order_by.clone(),
            limit: self.limit,
            offset: self.offset,
            _model: PhantomData,
        }
    }
}

impl<'a, T: Model> Query<'a, T> {
    pub(crate) fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            filter: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
            _model: PhantomData,
        }
    }

    /// Adds a predicate, AND-combined with any existing one.
    pub fn filter(&self, predicate: impl Into<Expr>) -> Self {
        let mut next = self.clone();
        next.filter = Some(match next.filter.take() {
            Some(existing) => Expr::and(existing, predicate.into()),
            None => predicate.into(),
        });
        next
    }

    /// Appends an ascending sort key; the first call establishes the
    /// primary key of the sort.
    pub fn order_by(&self, field: impl Into<String>) -> Self {
        self.push_order(field.into(), Direction::Asc)
    }

    pub fn order_by_desc(&self, field: impl Into<String>) -> Self {
        self.push_order(field.into(), Direction::Desc)
    }

    pub fn then_by(&self, field: impl Into<String>) -> Self {
        self.push_order(field.into(), Direction::Asc)
    }

    pub fn then_by_desc(&self, field: impl Into<String>) -> Self {
        self.push_order(field.into(), Direction::Desc)
    }

    fn push_order(&self, field: String, direction: Direction) -> Self {
        let mut next = self.clone();
        next.order_by.push((field, direction));
        next
    }

    /// Limits the number of produced rows.
    pub fn take(&self, count: i64) -> Self {
        let mut next = self.clone();
        next.limit = Some(count);
        next
    }

    /// Skips rows before producing any.
    pub fn skip(&self, count: i64) -> Self {
        let mut next = self.clone();
        next.offset = Some(count);
        next
    }

    /// Renders the accumulated state into a select. Order-by fields
    /// resolve to column names here, through the same lookup the compiler
    /// uses.
    fn generate(&self, selection: Selection) -> Result<(String, Vec<Value>)> {
        let table = &T::mapping().table;

        let mut order = Vec::with_capacity(self.order_by.len());
        for (field, direction) in &self.order_by {
            let column = table.column_name_for_field(field).ok_or_else(|| {
                Error::unsupported_expression(format!(
                    "no column of \"{}\" is mapped to field `{}`",
                    table.name, field
                ))
            })?;
            order.push((column.to_string(), *direction));
        }

        let mut args = Vec::new();
        let sql = karst_sql::select(
            table,
            selection,
            self.filter.as_ref(),
            &order,
            self.limit,
            self.offset,
            &mut args,
        )?;

        Ok((sql, args))
    }

    /// Materializes every matching row, in a fresh execution.
    pub fn all(&self) -> Result<Vec<T>> {
        let (sql, args) = self.generate(Selection::Columns)?;
        let mut cmd = self.conn.command(&sql)?.set_params(args);
        let rows = cmd.rows_mapped::<T>()?;
        rows.collect()
    }

    /// Materializes the first matching row, if any.
    pub fn first(&self) -> Result<Option<T>> {
        Ok(self.take(1).all()?.into_iter().next())
    }

    /// Executes a `count(*)` projection of this query.
    pub fn count(&self) -> Result<i64> {
        let (sql, args) = self.generate(Selection::Count)?;
        let mut cmd = self.conn.command(&sql)?.set_params(args);
        Ok(cmd.scalar::<i64>(0)?.unwrap_or(0))
    }

    /// Deletes every matching row. Requires a predicate; an intentional
    /// full-table delete goes through [`Connection::truncate`] instead.
    pub fn delete(&self) -> Result<usize> {
        if self.limit.is_some() || self.offset.is_some() {
            return Err(Error::invalid_operation(
                "cannot delete with a limit or offset",
            ));
        }

        let Some(filter) = &self.filter else {
            return Err(Error::invalid_operation(
                "no condition specified; use truncate to delete every row",
            ));
        };

        let table = &T::mapping().table;
        let mut args = Vec::new();
        let sql = karst_sql::delete(table, filter, &mut args)?;
        self.conn.command(&sql)?.set_params(args).execute()
    }
}
