use super::{ticks, Type};
use crate::{Error, Result};

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use url::Url;
use uuid::Uuid;

/// The transit representation of a value crossing the native boundary.
///
/// Each variant remembers the host type it came from, not just the storage
/// class it will land in, so the reader can reconstruct the original
/// representation.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Signed 8-bit integer
    I8(i8),

    /// Signed 16-bit integer
    I16(i16),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// Unsigned 8-bit integer
    U8(u8),

    /// Unsigned 16-bit integer
    U16(u16),

    /// Unsigned 32-bit integer
    U32(u32),

    /// Unsigned 64-bit integer
    U64(u64),

    /// 32-bit floating point value
    F32(f32),

    /// 64-bit floating point value
    F64(f64),

    /// Arbitrary-precision decimal. Binds through a lossy `f64`
    /// conversion; see the codec documentation.
    Decimal(Decimal),

    /// String value
    String(String),

    /// Byte sequence
    Bytes(Vec<u8>),

    /// A unique identifier, bound as 36-character canonical text
    Uuid(Uuid),

    /// A time span as a 100 ns tick count
    Duration(i64),

    /// A local instant as a 100 ns tick count
    DateTime(i64),

    /// A UTC-normalized instant as a 100 ns tick count
    DateTimeUtc(i64),

    /// Value of an enumerated type
    Enum(ValueEnum),

    /// Null value
    #[default]
    Null,
}

/// Both representations of an enumerated value; the command's enum-as-text
/// flag picks which one binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueEnum {
    pub name: &'static str,
    pub ordinal: i32,
}

impl Value {
    /// Returns a `Value` representing null
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(&**v),
            _ => None,
        }
    }

    /// The widest signed integer view of this value, if it is integral.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Bool(v) => Some(v as i64),
            Self::I8(v) => Some(v as i64),
            Self::I16(v) => Some(v as i64),
            Self::I32(v) => Some(v as i64),
            Self::I64(v) => Some(v),
            Self::U8(v) => Some(v as i64),
            Self::U16(v) => Some(v as i64),
            Self::U32(v) => Some(v as i64),
            Self::U64(v) => Some(v as i64),
            Self::Duration(v) | Self::DateTime(v) | Self::DateTimeUtc(v) => Some(v),
            Self::Enum(v) => Some(v.ordinal as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        use rust_decimal::prelude::ToPrimitive;

        match *self {
            Self::F32(v) => Some(v as f64),
            Self::F64(v) => Some(v),
            Self::Decimal(v) => v.to_f64(),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    /// Re-converts this value to the given target type, as a cast node in a
    /// compiled expression requires. Null passes through, covering the
    /// nullable-unwrap case.
    pub fn convert(self, ty: &Type) -> Result<Self> {
        if self.is_null() {
            return Ok(Self::Null);
        }

        let converted = match ty {
            Type::Bool => self.as_i64().map(|v| Self::Bool(v != 0)),
            Type::I8 => self.as_i64().map(|v| Self::I8(v as i8)),
            Type::I16 => self.as_i64().map(|v| Self::I16(v as i16)),
            Type::I32 => self.as_i64().map(|v| Self::I32(v as i32)),
            Type::I64 => self.as_i64().map(Self::I64),
            Type::U8 => self.as_i64().map(|v| Self::U8(v as u8)),
            Type::U16 => self.as_i64().map(|v| Self::U16(v as u16)),
            Type::U32 => self.as_i64().map(|v| Self::U32(v as u32)),
            Type::U64 => self.as_i64().map(|v| Self::U64(v as u64)),
            Type::F32 => self.as_f64().map(|v| Self::F32(v as f32)),
            Type::F64 => self.as_f64().map(Self::F64),
            Type::Decimal => self
                .as_f64()
                .and_then(Decimal::from_f64_retain)
                .map(Self::Decimal),
            Type::Duration => self.as_i64().map(Self::Duration),
            Type::DateTime => self.as_i64().map(Self::DateTime),
            Type::DateTimeUtc => self.as_i64().map(Self::DateTimeUtc),
            Type::String => match self {
                Self::String(v) => Some(Self::String(v)),
                _ => None,
            },
            _ => None,
        };

        converted.ok_or_else(|| Error::unsupported_type(format!("cannot convert value to {ty:?}")))
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl AsRef<Self> for Value {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i8> for Value {
    fn from(src: i8) -> Self {
        Self::I8(src)
    }
}

impl From<i16> for Value {
    fn from(src: i16) -> Self {
        Self::I16(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I32(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<u8> for Value {
    fn from(src: u8) -> Self {
        Self::U8(src)
    }
}

impl From<u16> for Value {
    fn from(src: u16) -> Self {
        Self::U16(src)
    }
}

impl From<u32> for Value {
    fn from(src: u32) -> Self {
        Self::U32(src)
    }
}

impl From<u64> for Value {
    fn from(src: u64) -> Self {
        Self::U64(src)
    }
}

impl From<f32> for Value {
    fn from(src: f32) -> Self {
        Self::F32(src)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<Decimal> for Value {
    fn from(src: Decimal) -> Self {
        Self::Decimal(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(src: Vec<u8>) -> Self {
        Self::Bytes(src)
    }
}

impl From<&[u8]> for Value {
    fn from(src: &[u8]) -> Self {
        Self::Bytes(src.to_vec())
    }
}

impl From<Uuid> for Value {
    fn from(src: Uuid) -> Self {
        Self::Uuid(src)
    }
}

impl From<Url> for Value {
    fn from(src: Url) -> Self {
        Self::String(src.to_string())
    }
}

impl From<chrono::Duration> for Value {
    fn from(src: chrono::Duration) -> Self {
        Self::Duration(ticks::duration_to_ticks(&src))
    }
}

impl From<NaiveDateTime> for Value {
    fn from(src: NaiveDateTime) -> Self {
        Self::DateTime(ticks::datetime_to_ticks(&src))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(src: DateTime<Utc>) -> Self {
        Self::DateTimeUtc(ticks::datetime_utc_to_ticks(&src))
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(src: DateTime<FixedOffset>) -> Self {
        Self::DateTimeUtc(ticks::datetime_utc_to_ticks(&src.with_timezone(&Utc)))
    }
}

impl<T> From<Option<T>> for Value
where
    Self: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::from(value),
            None => Self::Null,
        }
    }
}
