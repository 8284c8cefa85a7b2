//! Mapping-driven table operations on a connection.

use crate::connection::Connection;
use crate::model::Model;
use karst_core::{
    stmt::{Expr, Value},
    Error, Result,
};
use karst_sql::Selection;

impl Connection {
    /// Creates the mapped table of `T` if it does not exist, otherwise
    /// adds any columns the mapping declares that the table lacks, then
    /// creates requested indexes.
    pub fn ensure_table<T: Model>(&self) -> Result<()> {
        let mapping = T::mapping();
        let table = &mapping.table;

        let existing: Vec<String> =
            self.query_scalars(&karst_sql::table_info(&table.name), 1, [])?;

        if existing.is_empty() {
            tracing::debug!(table = %table.name, "creating table");
            self.execute_raw(&karst_sql::create_table(table))?;
        } else {
            for column in &table.columns {
                if existing.iter().any(|name| name == &column.name) {
                    continue;
                }
                tracing::debug!(table = %table.name, column = %column.name, "adding missing column");
                self.execute_raw(&karst_sql::add_column(table, column))?;
            }
        }

        // Indexes grouped by name so multiple columns can share one index.
        let mut indexes: Vec<(String, Vec<&str>, bool)> = Vec::new();
        for column in &table.columns {
            let Some(request) = &column.index else { continue };
            let name = request
                .name
                .clone()
                .unwrap_or_else(|| format!("{}_{}", table.name, column.name));

            match indexes.iter_mut().find(|(existing, _, _)| existing == &name) {
                Some((_, columns, unique)) => {
                    if *unique != request.unique {
                        return Err(Error::invalid_operation(format!(
                            "all columns of index \"{name}\" must agree on uniqueness"
                        )));
                    }
                    columns.push(column.name.as_str());
                }
                None => indexes.push((name, vec![column.name.as_str()], request.unique)),
            }
        }

        for (name, columns, unique) in indexes {
            self.execute_raw(&karst_sql::create_index(&table.name, &name, &columns, unique))?;
        }

        Ok(())
    }

    /// Inserts a record. When the mapping has an auto-increment primary
    /// key, the generated rowid is written back into the record.
    pub fn insert<T: Model>(&self, record: &mut T) -> Result<usize> {
        let mapping = T::mapping();

        let count = {
            let row: &T = record;
            self.cached_command(&mapping.insert_sql)?
                .set_binder(|stmt| mapping.bind_insert(stmt, row))
                .execute()?
        };

        let auto_pk = mapping
            .table
            .columns
            .iter()
            .position(|column| column.primary_key && column.auto_increment);
        if let Some(position) = auto_pk {
            let id = self.last_insert_rowid();
            mapping.set_value(record, position, Value::I64(id))?;
        }

        Ok(count)
    }

    /// Inserts every record, or none: the batch runs inside a savepoint
    /// and any failure rolls the whole batch back.
    pub fn insert_all<T: Model>(&self, records: &mut [T]) -> Result<usize> {
        self.run_in_transaction(|conn| {
            let mut count = 0;
            for record in records.iter_mut() {
                count += conn.insert(record)?;
            }
            Ok(count)
        })
    }

    /// Inserts the record, replacing an existing row with the same primary
    /// key.
    pub fn upsert<T: Model>(&self, record: &T) -> Result<usize> {
        let mapping = T::mapping();
        self.cached_command(&mapping.replace_sql)?
            .set_binder(|stmt| mapping.bind_replace(stmt, record))
            .execute()
    }

    /// Updates every column of the record's row except the primary key.
    pub fn update<T: Model>(&self, record: &T) -> Result<usize> {
        let mapping = T::mapping();
        if mapping.table.primary_key().is_none() {
            return Err(Error::invalid_operation(format!(
                "cannot update \"{}\": the mapping has no primary key",
                mapping.table.name
            )));
        }

        self.cached_command(&mapping.update_sql)?
            .set_binder(|stmt| mapping.bind_update(stmt, record))
            .execute()
    }

    /// Deletes the record's row by its primary key.
    pub fn delete<T: Model>(&self, record: &T) -> Result<usize> {
        let mapping = T::mapping();
        if mapping.table.primary_key().is_none() {
            return Err(Error::invalid_operation(format!(
                "cannot delete from \"{}\": the mapping has no primary key",
                mapping.table.name
            )));
        }

        self.cached_command(&mapping.delete_sql)?
            .set_binder(|stmt| mapping.bind_delete(stmt, record))
            .execute()
    }

    /// Deletes the row with the given primary key value.
    pub fn delete_by_key<T: Model>(&self, key: impl Into<Value>) -> Result<usize> {
        let mapping = T::mapping();
        if mapping.table.primary_key().is_none() {
            return Err(Error::invalid_operation(format!(
                "cannot delete from \"{}\": the mapping has no primary key",
                mapping.table.name
            )));
        }

        self.cached_command(&mapping.delete_sql)?
            .set_params([key.into()])
            .execute()
    }

    /// Fetches the record with the given primary key value, if present.
    pub fn find_by_key<T: Model>(&self, key: impl Into<Value>) -> Result<Option<T>> {
        let mapping = T::mapping();
        let table = &mapping.table;
        let Some(pk) = table.primary_key() else {
            return Err(Error::invalid_operation(format!(
                "cannot look up \"{}\" by key: the mapping has no primary key",
                table.name
            )));
        };

        let filter = Expr::eq(Expr::column(pk.field.clone()), Expr::value(key.into()));
        let mut args = Vec::new();
        let sql = karst_sql::select(
            table,
            Selection::Columns,
            Some(&filter),
            &[],
            Some(1),
            None,
            &mut args,
        )?;

        let mut cmd = self.command(&sql)?.set_params(args);
        cmd.rows_mapped::<T>()?.next().transpose()
    }

    /// Fetches the record with the given primary key value, failing when
    /// no row matches.
    pub fn get_by_key<T: Model>(&self, key: impl Into<Value>) -> Result<T> {
        let mapping = T::mapping();
        self.find_by_key(key)?.ok_or_else(|| {
            Error::invalid_operation(format!(
                "no \"{}\" row with the given primary key",
                mapping.table.name
            ))
        })
    }

    /// Deletes every row of the mapped table. The explicit opt-in
    /// counterpart of the predicate-guarded `Query::delete`.
    pub fn truncate<T: Model>(&self) -> Result<usize> {
        let mapping = T::mapping();
        self.execute_raw(&format!("delete from \"{}\"", mapping.table.name))
    }

    /// Drops the mapped table. Non-recoverable.
    pub fn drop_table<T: Model>(&self) -> Result<usize> {
        let mapping = T::mapping();
        self.execute_raw(&karst_sql::drop_table(&mapping.table.name))
    }
}
