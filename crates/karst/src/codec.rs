//! The native value codec: binds transit values into a prepared statement
//! and decodes columns of the current row back into transit values.
//!
//! Both directions are keyed by the host type descriptor, not the storage
//! class, because many host types share a storage class. Decimal values hop
//! through a lossy `f64` in both directions; downstream rounding behavior
//! depends on it, so it is preserved rather than fixed.

use karst_core::{
    stmt::{FromValue, Type, Value},
    Error, Result,
};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Row, Statement};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Converts a native failure into the karst error taxonomy.
///
/// A constraint violation whose extended code marks a not-null column
/// becomes [`Error::NotNullViolation`]; every other engine failure carries
/// the extended result code and message verbatim.
pub(crate) fn sqlite_error(err: rusqlite::Error) -> Error {
    match err {
        rusqlite::Error::SqliteFailure(cause, message) => {
            let message = message.unwrap_or_else(|| cause.to_string());
            if cause.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_NOTNULL {
                Error::NotNullViolation { message }
            } else {
                Error::sqlite(cause.extended_code, message)
            }
        }
        rusqlite::Error::ExecuteReturnedResults => {
            Error::invalid_operation("statement returned rows where none were expected")
        }
        rusqlite::Error::InvalidParameterName(name) => {
            Error::invalid_operation(format!("no parameter named `{name}`"))
        }
        rusqlite::Error::InvalidColumnIndex(index) => {
            Error::invalid_operation(format!("column index {index} is out of range"))
        }
        rusqlite::Error::InvalidColumnName(name) => {
            Error::invalid_operation(format!("no column named `{name}`"))
        }
        other => Error::resource(other.to_string()),
    }
}

/// Binds one value at a 1-based parameter index, selecting the storage
/// class per variant. `enum_as_text` picks the representation of
/// enumerated values for this statement.
pub(crate) fn bind_value(
    stmt: &mut Statement<'_>,
    index: usize,
    value: &Value,
    enum_as_text: bool,
) -> Result<()> {
    let result = match value {
        // The 32-bit integer family widens through i64; the engine only
        // exposes 64-bit integer binds.
        Value::Bool(v) => stmt.raw_bind_parameter(index, *v as i64),
        Value::I8(v) => stmt.raw_bind_parameter(index, *v as i64),
        Value::I16(v) => stmt.raw_bind_parameter(index, *v as i64),
        Value::I32(v) => stmt.raw_bind_parameter(index, *v as i64),
        Value::I64(v) => stmt.raw_bind_parameter(index, *v),
        Value::U8(v) => stmt.raw_bind_parameter(index, *v as i64),
        Value::U16(v) => stmt.raw_bind_parameter(index, *v as i64),
        Value::U32(v) => stmt.raw_bind_parameter(index, *v as i64),
        Value::U64(v) => stmt.raw_bind_parameter(index, *v as i64),
        Value::F32(v) => stmt.raw_bind_parameter(index, *v as f64),
        Value::F64(v) => stmt.raw_bind_parameter(index, *v),
        // Known precision-loss point, carried over deliberately.
        Value::Decimal(v) => stmt.raw_bind_parameter(index, v.to_f64().unwrap_or_default()),
        Value::String(v) => stmt.raw_bind_parameter(index, v.as_str()),
        Value::Bytes(v) => stmt.raw_bind_parameter(index, v.as_slice()),
        Value::Uuid(v) => stmt.raw_bind_parameter(index, v.hyphenated().to_string()),
        Value::Duration(v) | Value::DateTime(v) | Value::DateTimeUtc(v) => {
            stmt.raw_bind_parameter(index, *v)
        }
        Value::Enum(v) => {
            if enum_as_text {
                stmt.raw_bind_parameter(index, v.name)
            } else {
                stmt.raw_bind_parameter(index, v.ordinal as i64)
            }
        }
        Value::Null => stmt.raw_bind_parameter(index, rusqlite::types::Null),
    };

    result.map_err(sqlite_error)
}

/// Decodes the column at `index` of the current row under the given type
/// descriptor.
pub(crate) fn column_value(row: &Row<'_>, index: usize, ty: &Type) -> Result<Value> {
    let raw: Option<SqlValue> = row.get(index).map_err(sqlite_error)?;

    let value = match raw {
        None | Some(SqlValue::Null) => Value::Null,
        Some(SqlValue::Integer(v)) => match ty {
            Type::Bool => Value::Bool(v != 0),
            Type::I8 => Value::I8(v as i8),
            Type::I16 => Value::I16(v as i16),
            Type::I32 => Value::I32(v as i32),
            Type::I64 => Value::I64(v),
            Type::U8 => Value::U8(v as u8),
            Type::U16 => Value::U16(v as u16),
            Type::U32 => Value::U32(v as u32),
            Type::U64 => Value::U64(v as u64),
            Type::F32 => Value::F32(v as f32),
            Type::F64 => Value::F64(v as f64),
            Type::Decimal => Value::Decimal(Decimal::from(v)),
            Type::Duration => Value::Duration(v),
            Type::DateTime => Value::DateTime(v),
            Type::DateTimeUtc => Value::DateTimeUtc(v),
            // Integer storage of an enum is its ordinal; the host type's
            // decode handles the rest.
            Type::Enum => Value::I64(v),
            _ => {
                return Err(Error::unsupported_type(format!(
                    "cannot decode integer storage as {ty:?}"
                )))
            }
        },
        Some(SqlValue::Real(v)) => match ty {
            Type::F32 => Value::F32(v as f32),
            Type::F64 => Value::F64(v),
            Type::Decimal => Value::Decimal(Decimal::from_f64_retain(v).unwrap_or_default()),
            _ => {
                return Err(Error::unsupported_type(format!(
                    "cannot decode float storage as {ty:?}"
                )))
            }
        },
        Some(SqlValue::Text(v)) => match ty {
            Type::Uuid => Value::Uuid(v.parse().map_err(|_| {
                Error::unsupported_type("Uuid: stored text is not a canonical UUID")
            })?),
            // Text storage of an enum parses by variant name downstream;
            // other text-like host types rebuild from the string.
            _ => Value::String(v),
        },
        Some(SqlValue::Blob(v)) => match ty {
            Type::Bytes => Value::Bytes(v),
            _ => {
                return Err(Error::unsupported_type(format!(
                    "cannot decode blob storage as {ty:?}"
                )))
            }
        },
    };

    Ok(value)
}

/// Decodes one column of the current row into a host type.
pub fn read<T: FromValue>(row: &Row<'_>, index: usize) -> Result<T> {
    T::from_value(column_value(row, index, &T::TYPE)?)
}

/// Decodes a column of the current row by name.
pub fn read_named<T: FromValue>(row: &Row<'_>, column: &str) -> Result<T> {
    let index = row.as_ref().column_index(column).map_err(sqlite_error)?;
    read(row, index)
}
