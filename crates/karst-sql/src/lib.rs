//! SQL text generation for karst.
//!
//! Everything that renders SQL lives here: the expression compiler, the
//! per-entity command shapes, the DDL statements, and select/delete
//! assembly. The emitted text is byte-stable; tests assert it verbatim.

mod compiler;
pub use compiler::{compile, order_by, Fragment};

mod ddl;
pub use ddl::{add_column, create_index, create_table, drop_table, sql_decl, sql_type, table_info};

mod dml;
pub use dml::{
    delete, delete_by_key, insert, insert_or_replace, select, update, Selection,
    NO_PRIMARY_KEY_DELETE, NO_PRIMARY_KEY_UPDATE,
};
