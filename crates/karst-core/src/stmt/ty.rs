/// Describes the host type backing a column or bound value.
///
/// The native engine only distinguishes four storage classes; this
/// descriptor is what lets the codec reconstruct the original host
/// representation on the way back out (many host types share the integer
/// storage class).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
    String,
    Bytes,
    Uuid,
    /// A time span, stored as a 100 ns tick count.
    Duration,
    /// A local instant, stored as a 100 ns tick count.
    DateTime,
    /// A UTC-normalized instant, stored as a 100 ns tick count.
    DateTimeUtc,
    /// An enumerated type; storage is text or integer per column.
    Enum,
}

impl Type {
    /// True for types stored as the integer storage class widened to 32
    /// bits.
    pub fn is_small_integer(self) -> bool {
        matches!(
            self,
            Self::Bool | Self::I8 | Self::I16 | Self::U8 | Self::U16 | Self::I32
        )
    }

    /// True for types stored as a full 64-bit integer, tick-encoded time
    /// types included.
    pub fn is_big_integer(self) -> bool {
        matches!(
            self,
            Self::U32 | Self::U64 | Self::I64 | Self::Duration | Self::DateTime | Self::DateTimeUtc
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64 | Self::Decimal)
    }
}
