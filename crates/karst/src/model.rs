//! Table mappings: the per-entity bundle of metadata, accessors, and
//! pre-rendered command text.

use crate::codec;
use karst_core::{
    schema::{ColumnInfo, TableInfo, VirtualTable},
    stmt::Value,
    Result,
};
use rusqlite::{Row, Statement};

/// A record type mapped to one table.
///
/// Implementations hand out a `'static` mapping, typically built once in a
/// `once_cell::sync::Lazy`:
///
/// ```ignore
/// impl Model for Stock {
///     fn mapping() -> &'static TableMapping<Self> {
///         static MAPPING: Lazy<TableMapping<Stock>> = Lazy::new(|| {
///             TableMapping::builder("Stock")
///                 .column(
///                     ColumnInfo::new("Id", Type::I32).primary_key().auto_increment(),
///                     |s: &Stock| s.id.into(),
///                     |s, v| {
///                         s.id = FromValue::from_value(v)?;
///                         Ok(())
///                     },
///                 )
///                 .finish()
///                 .expect("valid Stock mapping")
///         });
///         &MAPPING
///     }
/// }
/// ```
pub trait Model: Default + Sized + 'static {
    fn mapping() -> &'static TableMapping<Self>;
}

type Getter<T> = Box<dyn Fn(&T) -> Value + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, Value) -> Result<()> + Send + Sync>;

/// Accessor pair for one column: extract a value for binding, write a
/// decoded value back into a record.
pub struct ColumnMapping<T> {
    get: Getter<T>,
    set: Setter<T>,
}

/// Metadata and accessors describing how `T` corresponds to its table,
/// plus the pre-rendered insert/replace/update/delete command text.
/// Immutable after construction and safe to share by reference.
pub struct TableMapping<T> {
    pub table: TableInfo,
    accessors: Vec<ColumnMapping<T>>,
    pub insert_sql: String,
    pub replace_sql: String,
    pub update_sql: String,
    pub delete_sql: String,
}

impl<T> TableMapping<T> {
    pub fn builder(table_name: impl Into<String>) -> TableMappingBuilder<T> {
        TableMappingBuilder {
            name: table_name.into(),
            virtual_table: VirtualTable::None,
            columns: Vec::new(),
        }
    }

    pub fn auto_increment_pk(&self) -> Option<&ColumnInfo> {
        self.table
            .columns
            .iter()
            .find(|column| column.primary_key && column.auto_increment)
    }

    /// Extracts the bind value of the column at `index` from a record.
    pub fn value_at(&self, record: &T, index: usize) -> Value {
        (self.accessors[index].get)(record)
    }

    /// Writes a decoded value into the record field of the column at
    /// `index`.
    pub fn set_value(&self, record: &mut T, index: usize, value: Value) -> Result<()> {
        (self.accessors[index].set)(record, value)
    }

    fn columns(&self) -> impl Iterator<Item = (&ColumnInfo, &ColumnMapping<T>)> {
        self.table.columns.iter().zip(&self.accessors)
    }

    /// Binder for the insert command: every column except an
    /// auto-increment primary key, in declared order.
    pub(crate) fn bind_insert(&self, stmt: &mut Statement<'_>, record: &T) -> Result<()> {
        let mut index = 1;
        for (column, accessor) in self.columns() {
            if column.primary_key && column.auto_increment {
                continue;
            }
            let value = (accessor.get)(record);
            codec::bind_value(stmt, index, &value, column.enum_as_text)?;
            index += 1;
        }
        Ok(())
    }

    /// Binder for insert-or-replace: every column, primary key included.
    pub(crate) fn bind_replace(&self, stmt: &mut Statement<'_>, record: &T) -> Result<()> {
        for (index, (column, accessor)) in self.columns().enumerate() {
            let value = (accessor.get)(record);
            codec::bind_value(stmt, index + 1, &value, column.enum_as_text)?;
        }
        Ok(())
    }

    /// Binder for the update command: non-key columns in declared order,
    /// then the primary key value last.
    pub(crate) fn bind_update(&self, stmt: &mut Statement<'_>, record: &T) -> Result<()> {
        let mut index = 1;
        for (column, accessor) in self.columns() {
            if column.primary_key {
                continue;
            }
            let value = (accessor.get)(record);
            codec::bind_value(stmt, index, &value, column.enum_as_text)?;
            index += 1;
        }
        for (column, accessor) in self.columns() {
            if column.primary_key {
                let value = (accessor.get)(record);
                codec::bind_value(stmt, index, &value, column.enum_as_text)?;
                break;
            }
        }
        Ok(())
    }

    /// Binder for the delete command: the primary key value alone.
    pub(crate) fn bind_delete(&self, stmt: &mut Statement<'_>, record: &T) -> Result<()> {
        for (column, accessor) in self.columns() {
            if column.primary_key {
                let value = (accessor.get)(record);
                return codec::bind_value(stmt, 1, &value, column.enum_as_text);
            }
        }
        Ok(())
    }
}

impl<T: Default> TableMapping<T> {
    /// Fast-path row materialization: columns are assumed to appear in
    /// declared order.
    pub fn materialize_row(&self, row: &Row<'_>) -> Result<T> {
        let mut record = T::default();
        for (index, (column, accessor)) in self.columns().enumerate() {
            let value = codec::column_value(row, index, &column.ty)?;
            (accessor.set)(&mut record, value)?;
        }
        Ok(record)
    }

    /// Materialization against an explicit column-name list; names that
    /// don't belong to the mapping are skipped.
    pub fn materialize_row_named(&self, row: &Row<'_>, column_names: &[String]) -> Result<T> {
        let mut record = T::default();
        for (index, name) in column_names.iter().enumerate() {
            let Some(position) = self
                .table
                .columns
                .iter()
                .position(|column| &column.name == name)
            else {
                continue;
            };
            let column = &self.table.columns[position];
            let value = codec::column_value(row, index, &column.ty)?;
            (self.accessors[position].set)(&mut record, value)?;
        }
        Ok(record)
    }
}

/// Collects column metadata and accessors, then renders the four command
/// texts.
pub struct TableMappingBuilder<T> {
    name: String,
    virtual_table: VirtualTable,
    columns: Vec<(ColumnInfo, ColumnMapping<T>)>,
}

impl<T> TableMappingBuilder<T> {
    pub fn virtual_table(mut self, virtual_table: VirtualTable) -> Self {
        self.virtual_table = virtual_table;
        self
    }

    pub fn column(
        mut self,
        info: ColumnInfo,
        get: impl Fn(&T) -> Value + Send + Sync + 'static,
        set: impl Fn(&mut T, Value) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.columns.push((
            info,
            ColumnMapping {
                get: Box::new(get),
                set: Box::new(set),
            },
        ));
        self
    }

    /// Validates the column list and pre-renders the command text. Tables
    /// with no primary key get the caller-visible sentinel strings; the
    /// corresponding operations refuse to run before reaching the engine.
    pub fn finish(self) -> Result<TableMapping<T>> {
        let (infos, accessors): (Vec<_>, Vec<_>) = self.columns.into_iter().unzip();
        let table = TableInfo::new(self.name, infos, self.virtual_table)?;

        Ok(TableMapping {
            insert_sql: karst_sql::insert(&table),
            replace_sql: karst_sql::insert_or_replace(&table),
            update_sql: karst_sql::update(&table),
            delete_sql: karst_sql::delete_by_key(&table),
            table,
            accessors,
        })
    }
}
