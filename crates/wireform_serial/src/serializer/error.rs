use alloc::boxed::Box;
use core::{error, fmt};

use crate::property::DeriveError;

// -----------------------------------------------------------------------------
// ResolveError

/// An enumeration of all error outcomes of resolving a type reference to a
/// serializer.
///
/// Resolution errors are setup-time conditions: they surface while a type is
/// being registered (or looked up), never while a value is being encoded or
/// decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveError {
    /// No built-in serializer and no registered shape matches the type.
    NoSerializerFound { type_name: Box<str> },
    /// The reference is a bare type parameter.
    TypeParameterUnsupported { index: usize },
    /// The reference is an array over a type parameter.
    GenericArrayElementUnsupported { type_name: Box<str> },
    /// An inline field's type is not a single-property class.
    InlineUnsupported { type_name: Box<str> },
    /// A tuple arity without a built-in serializer.
    TupleArityUnsupported { arity: usize },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSerializerFound { type_name } => {
                write!(f, "no serializer found for type `{type_name}`")
            }
            Self::TypeParameterUnsupported { index } => {
                write!(f, "type parameter #{index} cannot be resolved to a serializer")
            }
            Self::GenericArrayElementUnsupported { type_name } => write!(
                f,
                "array type `{type_name}` has a generic element type, whose serializer cannot be known",
            ),
            Self::InlineUnsupported { type_name } => write!(
                f,
                "inline fields require a single-property class, but `{type_name}` is not one",
            ),
            Self::TupleArityUnsupported { arity } => {
                write!(f, "tuples of arity {arity} have no built-in serializer")
            }
        }
    }
}

impl error::Error for ResolveError {}

// -----------------------------------------------------------------------------
// RegistryError

/// Any setup-time failure surfaced by the registry: a derivation (or
/// declaration check) failure, or a resolution failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    Derive(DeriveError),
    Resolve(ResolveError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Derive(err) => err.fmt(f),
            Self::Resolve(err) => err.fmt(f),
        }
    }
}

impl error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Derive(err) => Some(err),
            Self::Resolve(err) => Some(err),
        }
    }
}

impl From<DeriveError> for RegistryError {
    #[inline]
    fn from(err: DeriveError) -> Self {
        Self::Derive(err)
    }
}

impl From<ResolveError> for RegistryError {
    #[inline]
    fn from(err: ResolveError) -> Self {
        Self::Resolve(err)
    }
}
