//! The statement handle: owns one native prepared statement for the
//! lifetime of the command.
//!
//! One-shot commands finalize their statement when the command drops;
//! cached commands borrow theirs from the connection's prepared-statement
//! cache and reset-and-return it instead, since re-preparing identical SQL
//! (bulk insert, generated CRUD) is measurably more expensive than
//! reset-and-rebind.

use crate::codec::{self, sqlite_error};
use crate::connection::Connection;
use crate::model::Model;
use karst_core::{
    stmt::{FromValue, Value},
    Error, Result,
};
use rusqlite::{CachedStatement, Row, Rows, Statement};
use std::ops::{Deref, DerefMut};

enum Prepared<'a> {
    Once(Statement<'a>),
    Cached(CachedStatement<'a>),
}

impl<'a> Deref for Prepared<'a> {
    type Target = Statement<'a>;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Once(stmt) => stmt,
            Self::Cached(stmt) => stmt,
        }
    }
}

impl DerefMut for Prepared<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            Self::Once(stmt) => stmt,
            Self::Cached(stmt) => stmt,
        }
    }
}

enum Params {
    None,
    Positional(Vec<Value>),
    Named(Vec<(String, Value)>),
}

type Binder<'a> = Box<dyn Fn(&mut Statement<'_>) -> Result<()> + 'a>;

/// A prepared, parameterized SQL command.
///
/// Preparation happens at construction, so malformed SQL fails immediately
/// with the native error message. Binding is positional, named, or by a
/// caller-supplied binder that knows its own field order statically.
pub struct Command<'a> {
    sql: String,
    enum_as_text: bool,
    params: Params,
    binder: Option<Binder<'a>>,
    stmt: Prepared<'a>,
}

impl<'a> Command<'a> {
    pub(crate) fn new(conn: &'a Connection, sql: String, cached: bool) -> Result<Self> {
        let stmt = if cached {
            Prepared::Cached(conn.raw().prepare_cached(&sql).map_err(sqlite_error)?)
        } else {
            Prepared::Once(conn.raw().prepare(&sql).map_err(sqlite_error)?)
        };

        Ok(Self {
            sql,
            enum_as_text: false,
            params: Params::None,
            binder: None,
            stmt,
        })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Replaces the parameter list with positional values, bound in
    /// declaration order.
    pub fn set_params(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.params = Params::Positional(values.into_iter().collect());
        self
    }

    /// Replaces the parameter list with named values (`:name`, `@name`,
    /// and `$name` placeholders all resolve).
    pub fn set_named_params(
        mut self,
        values: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        self.params = Params::Named(values.into_iter().collect());
        self
    }

    /// Installs a custom binder that bypasses list-based binding entirely.
    pub fn set_binder(mut self, binder: impl Fn(&mut Statement<'_>) -> Result<()> + 'a) -> Self {
        self.binder = Some(Box::new(binder));
        self
    }

    /// Selects whether enumerated values bind as variant names instead of
    /// ordinals.
    pub fn enum_as_text(mut self, enabled: bool) -> Self {
        self.enum_as_text = enabled;
        self
    }

    fn bind(&mut self) -> Result<()> {
        if let Some(binder) = &self.binder {
            return binder(&mut self.stmt);
        }

        match &self.params {
            Params::None => Ok(()),
            Params::Positional(values) => {
                for (i, value) in values.iter().enumerate() {
                    codec::bind_value(&mut self.stmt, i + 1, value, self.enum_as_text)?;
                }
                Ok(())
            }
            Params::Named(values) => {
                for (name, value) in values {
                    let index = self
                        .stmt
                        .parameter_index(name)
                        .map_err(sqlite_error)?
                        .ok_or_else(|| {
                            Error::invalid_operation(format!("no parameter named `{name}`"))
                        })?;
                    codec::bind_value(&mut self.stmt, index, value, self.enum_as_text)?;
                }
                Ok(())
            }
        }
    }

    /// Steps the statement once, expecting it to finish without producing
    /// rows, and returns the changed-row count. A not-null constraint
    /// violation surfaces as its own error kind.
    pub fn execute(mut self) -> Result<usize> {
        tracing::debug!(sql = %self.sql, "executing");
        self.bind()?;
        self.stmt.raw_execute().map_err(sqlite_error)
    }

    /// Steps repeatedly, handing each row to `decode`. The sequence is
    /// lazy, forward-only, and single-pass; calling again re-executes the
    /// query. The statement stays alive for as long as the command does.
    pub fn rows<T, F>(&mut self, decode: F) -> Result<RowIter<'_, F>>
    where
        F: FnMut(&Row<'_>) -> Result<T>,
    {
        tracing::debug!(sql = %self.sql, "querying");
        self.bind()?;
        Ok(RowIter {
            rows: self.stmt.raw_query(),
            decode,
        })
    }

    /// Steps repeatedly, materializing each row through the mapping's
    /// positional fast path; column order must match the mapping's
    /// declared order.
    pub fn rows_mapped<T: Model>(
        &mut self,
    ) -> Result<RowIter<'_, impl FnMut(&Row<'_>) -> Result<T>>> {
        let mapping = T::mapping();
        self.rows(move |row| mapping.materialize_row(row))
    }

    /// Decodes a single projected column per row.
    pub fn scalars<T: FromValue>(
        &mut self,
        column: usize,
    ) -> Result<RowIter<'_, impl FnMut(&Row<'_>) -> Result<T>>> {
        let columns = self.stmt.column_count();
        if columns < 1 {
            return Err(Error::invalid_operation(
                "scalar query must return at least one column",
            ));
        }
        if column >= columns {
            return Err(Error::invalid_operation(format!(
                "column index {column} is out of range for a statement returning {columns} columns"
            )));
        }

        self.rows(move |row| codec::read::<T>(row, column))
    }

    /// First row's scalar at the given column, if any row exists.
    pub fn scalar<T: FromValue>(&mut self, column: usize) -> Result<Option<T>> {
        self.scalars(column)?.next().transpose()
    }
}

/// Lazy row sequence over an executing statement.
///
/// Advancing the iterator steps the native statement; dropping it stops
/// the query, and the statement is released when the owning command drops.
pub struct RowIter<'a, F> {
    rows: Rows<'a>,
    decode: F,
}

impl<T, F> Iterator for RowIter<'_, F>
where
    F: FnMut(&Row<'_>) -> Result<T>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.rows.next() {
            Ok(Some(row)) => Some((self.decode)(row)),
            Ok(None) => None,
            Err(err) => Some(Err(sqlite_error(err))),
        }
    }
}
