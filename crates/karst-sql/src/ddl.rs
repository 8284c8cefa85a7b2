//! Table and index definition statements.

use karst_core::{
    schema::{ColumnInfo, TableInfo, VirtualTable},
    stmt::Type,
};

/// Storage type name in a column declaration.
pub fn sql_type(column: &ColumnInfo) -> String {
    match column.ty {
        Type::Bool | Type::I8 | Type::I16 | Type::I32 | Type::U8 | Type::U16 => {
            "integer".to_string()
        }
        Type::U32 | Type::U64 | Type::I64 => "bigint".to_string(),
        Type::F32 | Type::F64 | Type::Decimal => "float".to_string(),
        Type::String => match column.max_length {
            Some(len) => format!("varchar({len})"),
            None => "varchar".to_string(),
        },
        Type::Bytes => "blob".to_string(),
        Type::Uuid => "varchar(36)".to_string(),
        Type::Duration | Type::DateTime | Type::DateTimeUtc => "bigint".to_string(),
        Type::Enum => {
            if column.enum_as_text {
                "varchar".to_string()
            } else {
                "integer".to_string()
            }
        }
    }
}

/// One column declaration; every clause carries a trailing space.
pub fn sql_decl(column: &ColumnInfo) -> String {
    let mut decl = format!("\"{}\" {} ", column.name, sql_type(column));

    if column.primary_key {
        decl.push_str("primary key ");
    }
    if column.auto_increment {
        decl.push_str("autoincrement ");
    }
    if column.not_null {
        decl.push_str("not null ");
    }
    if let Some(collation) = &column.collation {
        decl.push_str("collate ");
        decl.push_str(collation);
        decl.push(' ');
    }

    decl
}

pub fn create_table(table: &TableInfo) -> String {
    let (virtual_kw, using) = match table.virtual_table {
        VirtualTable::None => ("", ""),
        VirtualTable::Fts3 => ("virtual", "using fts3"),
        VirtualTable::Fts4 => ("virtual", "using fts4"),
    };

    let decls = table
        .columns
        .iter()
        .map(sql_decl)
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "create {} table if not exists \"{}\" {} ({})",
        virtual_kw, table.name, using, decls
    )
}

pub fn create_index(table_name: &str, index_name: &str, columns: &[&str], unique: bool) -> String {
    format!(
        "create {} index if not exists \"{}\" on \"{}\"(\"{}\")",
        if unique { "unique" } else { "" },
        index_name,
        table_name,
        columns.join("\", \"")
    )
}

pub fn add_column(table: &TableInfo, column: &ColumnInfo) -> String {
    format!(
        "alter table \"{}\" add column {}",
        table.name,
        sql_decl(column)
    )
}

pub fn drop_table(table_name: &str) -> String {
    format!("drop table if exists \"{table_name}\"")
}

/// The migration probe; column names are read from result index 1.
pub fn table_info(table_name: &str) -> String {
    format!("pragma table_info(\"{table_name}\")")
}
