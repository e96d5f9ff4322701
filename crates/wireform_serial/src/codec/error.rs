use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::error;
use core::fmt::{self, Display};

use crate::codec::trace;

/// An enumeration of all error outcomes that might happen while encoding or
/// decoding a value.
///
/// Decode-time errors are recoverable by the caller; nothing here poisons the
/// serializer or the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// Required fields were absent when the structure scope ended. Carries
    /// every missing field, not just the first.
    MissingFields {
        serial_name: Box<str>,
        fields: Vec<Box<str>>,
    },
    /// The format saw a field the descriptor does not recognize and was
    /// configured to reject it. (By default unknown fields are skipped.)
    UnknownField {
        serial_name: Box<str>,
        field: Box<str>,
    },
    /// An enum or tagged-union value named an unknown entry.
    UnknownVariant {
        serial_name: Box<str>,
        variant: Box<str>,
    },
    /// The format returned an element index outside the descriptor.
    InvalidElementIndex {
        serial_name: Box<str>,
        index: usize,
    },
    /// A value (or encoded node) did not have the expected kind.
    ValueMismatch {
        expected: &'static str,
        found: Box<str>,
    },
    /// A value represented a different type than the serializer's.
    TypeMismatch {
        expected: Box<str>,
        found: Box<str>,
    },
    /// Anything else; see the message.
    Custom(Box<str>),
}

impl CodecError {
    /// Creates a [`CodecError::Custom`].
    ///
    /// Prefer this over constructing the variant directly: in debug builds
    /// the message is extended with the serial-name trace of the enclosing
    /// structure scopes.
    pub fn custom(message: impl Display) -> Self {
        Self::Custom(trace::decorate(message.to_string()).into_boxed_str())
    }

    /// Creates a [`CodecError::ValueMismatch`] for an unexpected value kind.
    pub fn mismatch(expected: &'static str, found: &crate::value::Value) -> Self {
        Self::ValueMismatch {
            expected,
            found: found.kind_name().into(),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields {
                serial_name,
                fields,
            } => {
                write!(f, "missing required field(s) ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "`{field}`")?;
                }
                write!(f, " of `{serial_name}`")
            }
            Self::UnknownField { serial_name, field } => {
                write!(f, "unknown field `{field}` for `{serial_name}`")
            }
            Self::UnknownVariant {
                serial_name,
                variant,
            } => write!(f, "unknown variant `{variant}` of `{serial_name}`"),
            Self::InvalidElementIndex { serial_name, index } => {
                write!(f, "element index {index} is out of range for `{serial_name}`")
            }
            Self::ValueMismatch { expected, found } => {
                write!(f, "expected a {expected} value, found {found}")
            }
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected a value of `{expected}`, found `{found}`")
            }
            Self::Custom(message) => f.write_str(message),
        }
    }
}

impl error::Error for CodecError {}
