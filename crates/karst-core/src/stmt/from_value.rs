use super::{ticks, Type, Value};
use crate::{Error, Result};

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use url::Url;
use uuid::Uuid;

/// Read-side dispatch: decodes a transit [`Value`] back into a host type.
///
/// Keyed by the target host type, not the storage class, because many host
/// types share a storage class. NULL decodes to the type's default value
/// rather than failing; use `Option<T>` to observe NULL directly.
pub trait FromValue: Sized {
    /// The type descriptor the codec reads the native column under.
    const TYPE: Type;

    fn from_value(value: Value) -> Result<Self>;
}

macro_rules! unsupported {
    ($name:literal, $value:expr) => {
        Err(Error::unsupported_type(format!(
            concat!("cannot decode {:?} as ", $name),
            $value
        )))
    };
}

impl FromValue for bool {
    const TYPE: Type = Type::Bool;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(false),
            Value::Bool(v) => Ok(v),
            other => match other.as_i64() {
                Some(v) => Ok(v != 0),
                None => unsupported!("bool", other),
            },
        }
    }
}

macro_rules! integer_from_value {
    ($($host:ty => ($name:literal, $ty:expr)),+ $(,)?) => {
        $(
            impl FromValue for $host {
                const TYPE: Type = $ty;

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::Null => Ok(0),
                        other => match other.as_i64() {
                            Some(v) => Ok(v as $host),
                            None => unsupported!($name, other),
                        },
                    }
                }
            }
        )+
    };
}

integer_from_value! {
    i8 => ("i8", Type::I8),
    i16 => ("i16", Type::I16),
    i32 => ("i32", Type::I32),
    i64 => ("i64", Type::I64),
    u8 => ("u8", Type::U8),
    u16 => ("u16", Type::U16),
    u32 => ("u32", Type::U32),
    u64 => ("u64", Type::U64),
}

impl FromValue for f32 {
    const TYPE: Type = Type::F32;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(0.0),
            other => match other.as_f64() {
                Some(v) => Ok(v as f32),
                None => unsupported!("f32", other),
            },
        }
    }
}

impl FromValue for f64 {
    const TYPE: Type = Type::F64;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(0.0),
            other => match other.as_f64() {
                Some(v) => Ok(v),
                None => unsupported!("f64", other),
            },
        }
    }
}

impl FromValue for Decimal {
    const TYPE: Type = Type::Decimal;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Decimal::ZERO),
            Value::Decimal(v) => Ok(v),
            other => match other.as_f64().and_then(Decimal::from_f64_retain) {
                Some(v) => Ok(v),
                None => unsupported!("Decimal", other),
            },
        }
    }
}

impl FromValue for String {
    const TYPE: Type = Type::String;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(String::new()),
            Value::String(v) => Ok(v),
            other => unsupported!("String", other),
        }
    }
}

impl FromValue for Vec<u8> {
    const TYPE: Type = Type::Bytes;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Bytes(v) => Ok(v),
            other => unsupported!("Vec<u8>", other),
        }
    }
}

impl FromValue for Uuid {
    const TYPE: Type = Type::Uuid;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Uuid::nil()),
            Value::Uuid(v) => Ok(v),
            Value::String(v) => v
                .parse()
                .map_err(|_| Error::unsupported_type("Uuid: stored text is not a canonical UUID")),
            other => unsupported!("Uuid", other),
        }
    }
}

impl FromValue for Url {
    const TYPE: Type = Type::String;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Url::parse(&v)
                .map_err(|_| Error::unsupported_type("Url: stored text is not a valid URL")),
            // A URL has no zero value; nullable columns should use
            // Option<Url>.
            other => unsupported!("Url", other),
        }
    }
}

impl FromValue for chrono::Duration {
    const TYPE: Type = Type::Duration;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(chrono::Duration::zero()),
            Value::Duration(v) | Value::I64(v) => Ok(ticks::duration_from_ticks(v)),
            other => unsupported!("Duration", other),
        }
    }
}

impl FromValue for NaiveDateTime {
    const TYPE: Type = Type::DateTime;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(ticks::datetime_from_ticks(0)),
            Value::DateTime(v) | Value::DateTimeUtc(v) | Value::I64(v) => {
                Ok(ticks::datetime_from_ticks(v))
            }
            other => unsupported!("NaiveDateTime", other),
        }
    }
}

impl FromValue for DateTime<Utc> {
    const TYPE: Type = Type::DateTimeUtc;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(DateTime::default()),
            Value::DateTime(v) | Value::DateTimeUtc(v) | Value::I64(v) => {
                Ok(ticks::datetime_utc_from_ticks(v))
            }
            other => unsupported!("DateTime<Utc>", other),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const TYPE: Type = T::TYPE;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
