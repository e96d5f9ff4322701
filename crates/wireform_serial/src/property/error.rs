use alloc::boxed::Box;
use core::{error, fmt};

/// An enumeration of all error outcomes of deriving a type's serializable
/// properties (including the declaration checks that run first).
///
/// Every variant is fatal for the offending type: derivation produces no
/// partial result, and no serializer is synthesized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeriveError {
    /// Two retained properties map to the same wire name.
    DuplicatePropertyName {
        type_name: Box<str>,
        name: Box<str>,
    },
    /// Two enum entries map to the same wire name.
    DuplicateEnumEntryName {
        type_name: Box<str>,
        name: Box<str>,
        first_entry: Box<str>,
        second_entry: Box<str>,
    },
    /// The declaration has supertypes.
    SuperclassNotSupported {
        type_name: Box<str>,
        supertypes: Box<str>,
    },
    /// The declaration is a singleton object.
    ObjectNotSupported { type_name: Box<str> },
    /// The declaration is anonymous or nested in an anonymous declaration.
    AnonymousClassNotSupported { type_name: Box<str> },
    /// The declaration is an inner class.
    InnerClassNotSupported { type_name: Box<str> },
    /// The declaration is abstract.
    AbstractClassNotSupported { type_name: Box<str> },
    /// The declaration has type parameters.
    TypeParametersNotSupported {
        type_name: Box<str>,
        params: Box<str>,
    },
    /// The declaration has a companion object.
    CompanionNotSupported { type_name: Box<str> },
    /// A field is typed as a bare type parameter.
    PropertyTypeParameterUnsupported {
        type_name: Box<str>,
        property: Box<str>,
    },
    /// A field contains a reference array over a type parameter.
    GenericArrayElementUnsupported {
        type_name: Box<str>,
        property: Box<str>,
    },
    /// The declaration reuses a well-known standard-library type name.
    ReservedTypeName { type_name: Box<str> },
}

impl fmt::Display for DeriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePropertyName { type_name, name } => {
                write!(f, "type `{type_name}` has duplicate wire name `{name}`")
            }
            Self::DuplicateEnumEntryName {
                type_name,
                name,
                first_entry,
                second_entry,
            } => write!(
                f,
                "enum `{type_name}` has duplicate wire name `{name}` (entries `{first_entry}` and `{second_entry}`)",
            ),
            Self::SuperclassNotSupported {
                type_name,
                supertypes,
            } => write!(
                f,
                "type `{type_name}` has one or more supertypes `{supertypes}`, which is not supported",
            ),
            Self::ObjectNotSupported { type_name } => {
                write!(f, "object `{type_name}` cannot be made serializable")
            }
            Self::AnonymousClassNotSupported { type_name } => {
                write!(f, "anonymous type `{type_name}` cannot be made serializable")
            }
            Self::InnerClassNotSupported { type_name } => {
                write!(f, "inner type `{type_name}` cannot be made serializable")
            }
            Self::AbstractClassNotSupported { type_name } => {
                write!(f, "abstract type `{type_name}` cannot be made serializable")
            }
            Self::TypeParametersNotSupported { type_name, params } => write!(
                f,
                "type `{type_name}` has one or more type parameters `{params}`, which is not supported",
            ),
            Self::CompanionNotSupported { type_name } => {
                write!(f, "type `{type_name}` has a companion object, which is not supported")
            }
            Self::PropertyTypeParameterUnsupported {
                type_name,
                property,
            } => write!(
                f,
                "field `{property}` of `{type_name}` is typed as a type parameter, which is not supported",
            ),
            Self::GenericArrayElementUnsupported {
                type_name,
                property,
            } => write!(
                f,
                "field `{property}` of `{type_name}` uses an array with a generic element type, \
                 whose serializer cannot be known",
            ),
            Self::ReservedTypeName { type_name } => {
                write!(f, "type name `{type_name}` is reserved for a built-in serializer")
            }
        }
    }
}

impl error::Error for DeriveError {}
