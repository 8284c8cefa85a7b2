//! An open connection to a SQLite database.

use crate::codec::sqlite_error;
use crate::command::Command;
use crate::model::Model;
use crate::query::Query;
use karst_core::{
    stmt::{FromValue, Value},
    Error, Result,
};
use rusqlite::{Connection as RusqliteConnection, OpenFlags, Row};
use std::path::Path;
use std::sync::atomic::AtomicI32;
use std::time::Duration;

/// Connection configuration, applied up front by [`Connection::open_with`].
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// How long the engine retries when a table is locked.
    pub busy_timeout: Duration,

    /// Whether to switch a newly created database file to write-ahead
    /// logging. Applied once, at creation.
    pub wal: bool,

    pub read_only: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(1),
            wal: true,
            read_only: false,
        }
    }
}

/// An open database connection.
///
/// Owns the native database handle and the transaction depth counter. A
/// connection is intended for one thread at a time; the type is `Send` but
/// not `Sync`, so concurrent sharing requires external synchronization by
/// construction.
#[derive(Debug)]
pub struct Connection {
    raw: RusqliteConnection,
    pub(crate) depth: AtomicI32,
}

impl Connection {
    /// Opens (creating if needed) the database file at `path` with default
    /// options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, ConnectOptions::default())
    }

    pub fn open_with<P: AsRef<Path>>(path: P, options: ConnectOptions) -> Result<Self> {
        let path = path.as_ref();
        let new_file = !path.exists();

        let flags = if options.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::default()
        };

        let raw = RusqliteConnection::open_with_flags(path, flags).map_err(|err| {
            Error::resource(format!(
                "could not open database file {}: {err}",
                path.display()
            ))
        })?;

        let conn = Self {
            raw,
            depth: AtomicI32::new(0),
        };

        conn.set_busy_timeout(options.busy_timeout)?;

        if new_file && options.wal && !options.read_only {
            tracing::debug!(path = %path.display(), "enabling write-ahead logging");
            conn.raw
                .pragma_update(None, "journal_mode", "WAL")
                .map_err(sqlite_error)?;
        }

        Ok(conn)
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let raw = RusqliteConnection::open_in_memory()
            .map_err(|err| Error::resource(format!("could not open in-memory database: {err}")))?;

        let conn = Self {
            raw,
            depth: AtomicI32::new(0),
        };
        conn.set_busy_timeout(ConnectOptions::default().busy_timeout)?;

        Ok(conn)
    }

    pub(crate) fn raw(&self) -> &RusqliteConnection {
        &self.raw
    }

    pub fn set_busy_timeout(&self, timeout: Duration) -> Result<()> {
        self.raw.busy_timeout(timeout).map_err(sqlite_error)
    }

    /// Prepares a one-shot command; the statement finalizes when the
    /// command drops. Malformed SQL fails here with the native message.
    pub fn command(&self, sql: impl Into<String>) -> Result<Command<'_>> {
        Command::new(self, sql.into(), false)
    }

    /// Prepares a command backed by the connection's statement cache; the
    /// statement resets and returns to the cache when the command drops.
    pub fn cached_command(&self, sql: impl Into<String>) -> Result<Command<'_>> {
        Command::new(self, sql.into(), true)
    }

    /// Executes a non-query statement with positional parameters and
    /// returns the changed-row count.
    pub fn execute(&self, sql: &str, params: impl IntoIterator<Item = Value>) -> Result<usize> {
        self.command(sql)?.set_params(params).execute()
    }

    pub(crate) fn execute_raw(&self, sql: &str) -> Result<usize> {
        self.command(sql)?.execute()
    }

    /// Runs a query and collects one projected column of every row.
    pub fn query_scalars<T: FromValue>(
        &self,
        sql: &str,
        column: usize,
        params: impl IntoIterator<Item = Value>,
    ) -> Result<Vec<T>> {
        let mut cmd = self.command(sql)?.set_params(params);
        cmd.scalars(column)?.collect()
    }

    /// Runs a query and decodes every row with the supplied decoder. Use
    /// [`Connection::command`] and [`Command::rows`] directly when lazy
    /// iteration matters.
    pub fn query_rows<T>(
        &self,
        sql: &str,
        params: impl IntoIterator<Item = Value>,
        decode: impl FnMut(&Row<'_>) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut cmd = self.command(sql)?.set_params(params);
        let rows = cmd.rows(decode)?;
        rows.collect()
    }

    /// Runs a query whose column order matches the mapping's declared
    /// order and materializes typed records.
    pub fn query_as<T: Model>(
        &self,
        sql: &str,
        params: impl IntoIterator<Item = Value>,
    ) -> Result<Vec<T>> {
        let mapping = T::mapping();
        self.query_rows(sql, params, |row| mapping.materialize_row(row))
    }

    /// Starts a fluent query over the mapped table of `T`.
    pub fn query<T: Model>(&self) -> Query<'_, T> {
        Query::new(self)
    }

    /// Rowid generated by the most recent successful insert.
    pub fn last_insert_rowid(&self) -> i64 {
        self.raw.last_insert_rowid()
    }
}
