//! An object-relational mapping runtime over SQLite.
//!
//! Typed records map to rows through a [`TableMapping`], predicates build
//! as expression trees and compile to parameterized SQL, values cross the
//! native boundary through a type-keyed codec, and writes can nest inside
//! savepoint transactions.
//!
//! A connection is meant for one thread at a time; `Connection` is `Send`
//! but not `Sync`, which makes that obligation a compile-time fact rather
//! than a documentation note.

pub mod codec;

mod command;
pub use command::{Command, RowIter};

mod connection;
pub use connection::{ConnectOptions, Connection};

mod model;
pub use model::{ColumnMapping, Model, TableMapping, TableMappingBuilder};

mod ops;

mod query;
pub use query::Query;

mod transaction;

pub use karst_core::{enum_value, schema, stmt, Error, Result};
