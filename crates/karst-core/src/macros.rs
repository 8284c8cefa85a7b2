/// Declares a unit enum as a storable column value.
///
/// Generates the bind-side conversion (`From<$ty> for Value`, carrying both
/// the variant name and the ordinal so the command can pick either
/// representation) and the read-side [`FromValue`](crate::stmt::FromValue)
/// dispatch: text parses the variant name case-insensitively, integers are
/// treated as ordinals, and NULL yields the first listed variant.
///
/// ```
/// use karst_core::enum_value;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Color {
///     Red,
///     Green,
///     Blue,
/// }
///
/// enum_value!(Color { Red = 0, Green = 1, Blue = 2 });
/// ```
#[macro_export]
macro_rules! enum_value {
    ($ty:ident { $($variant:ident = $ordinal:literal),+ $(,)? }) => {
        impl ::core::convert::From<$ty> for $crate::stmt::Value {
            fn from(src: $ty) -> Self {
                match src {
                    $(
                        $ty::$variant => $crate::stmt::Value::Enum($crate::stmt::ValueEnum {
                            name: stringify!($variant),
                            ordinal: $ordinal,
                        }),
                    )+
                }
            }
        }

        impl $crate::stmt::FromValue for $ty {
            const TYPE: $crate::stmt::Type = $crate::stmt::Type::Enum;

            fn from_value(value: $crate::stmt::Value) -> $crate::Result<Self> {
                match value {
                    $crate::stmt::Value::Null => Ok($crate::enum_value!(@first $ty; $($variant)+)),
                    $crate::stmt::Value::String(name) => {
                        $(
                            if name.eq_ignore_ascii_case(stringify!($variant)) {
                                return Ok($ty::$variant);
                            }
                        )+
                        Err($crate::Error::unsupported_type(concat!(
                            stringify!($ty), " has no variant matching the stored text"
                        )))
                    }
                    $crate::stmt::Value::Enum(repr) => {
                        Self::from_value($crate::stmt::Value::I32(repr.ordinal))
                    }
                    $crate::stmt::Value::I64(ordinal) => {
                        Self::from_value($crate::stmt::Value::I32(ordinal as i32))
                    }
                    $crate::stmt::Value::I32(ordinal) => match ordinal {
                        $( $ordinal => Ok($ty::$variant), )+
                        _ => Err($crate::Error::unsupported_type(concat!(
                            stringify!($ty), " has no variant with the stored ordinal"
                        ))),
                    },
                    _ => Err($crate::Error::unsupported_type(stringify!($ty))),
                }
            }
        }
    };

    (@first $ty:ident; $head:ident $($rest:ident)*) => { $ty::$head };
}
