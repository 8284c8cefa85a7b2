use super::{ColumnInfo, VirtualTable};
use crate::{Error, Result};

/// Metadata describing how one record type corresponds to one table.
///
/// Pure metadata: SQL text generation lives in the SQL crate, and the
/// per-record accessors live with the runtime's table mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    pub name: String,

    /// Ordered column list; never empty
    pub columns: Vec<ColumnInfo>,

    pub virtual_table: VirtualTable,
}

impl TableInfo {
    pub fn new(
        name: impl Into<String>,
        columns: Vec<ColumnInfo>,
        virtual_table: VirtualTable,
    ) -> Result<Self> {
        let name = name.into();

        if columns.is_empty() {
            return Err(Error::invalid_operation(format!(
                "cannot create table \"{name}\" without columns"
            )));
        }

        Ok(Self {
            name,
            columns,
            virtual_table,
        })
    }

    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_for_field(&self, field: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|column| column.field == field)
    }

    /// Maps a record-field name to its column name; the compiler's column
    /// lookup.
    pub fn column_name_for_field(&self, field: &str) -> Option<&str> {
        self.column_for_field(field).map(|column| &*column.name)
    }

    pub fn primary_key(&self) -> Option<&ColumnInfo> {
        self.columns.iter().find(|column| column.primary_key)
    }

    /// The columns bound by an insert: everything except an auto-increment
    /// primary key.
    pub fn insert_columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns
            .iter()
            .filter(|column| !(column.primary_key && column.auto_increment))
    }
}
