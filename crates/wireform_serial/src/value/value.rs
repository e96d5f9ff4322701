use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::value::StructValue;

/// A dynamic value: one node of an instance tree.
///
/// Equality is structural, which makes the round-trip law directly testable:
/// decoding an encoded value yields an equal `Value`.
///
/// # Examples
///
/// ```
/// use wireform_serial::value::{StructValue, Value};
///
/// let point = Value::Struct(
///     StructValue::of("demo::Point")
///         .with("x", Value::I32(3))
///         .with("y", Value::I32(0)),
/// );
/// assert_eq!(point.kind_name(), "struct");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),
    Unit,
    /// An enum value, by entry identifier.
    Enum(Box<str>),
    Struct(StructValue),
    List(Vec<Value>),
    /// Map entries in insertion order. An ordered pair list keeps equality
    /// well-defined for arbitrary key values.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Whether this value is `Null`.
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// A short name for the value's kind, for diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Char(_) => "char",
            Self::String(_) => "string",
            Self::Unit => "unit",
            Self::Enum(_) => "enum",
            Self::Struct(_) => "struct",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// The struct payload, if this is a struct value.
    #[inline]
    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Self::Struct(value) => Some(value),
            _ => None,
        }
    }

    /// The list payload, if this is a list value.
    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// The map payload, if this is a map value.
    #[inline]
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// The enum entry identifier, if this is an enum value.
    #[inline]
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            Self::Enum(identifier) => Some(identifier),
            _ => None,
        }
    }
}

impl Default for Value {
    #[inline]
    fn default() -> Self {
        Self::Null
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        })*
    };
}

impl_value_from! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => String,
    StructValue => Struct,
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}
