//! The property model: which fields of a declared type are serialized, in
//! which order, under which wire names.
//!
//! [`derive_properties`] is the single entry point for class shapes;
//! [`derive_entries`] is its counterpart for enums. Both are pure functions
//! over a [`TypeShape`](crate::shape::TypeShape); the registry memoizes their
//! results per type.

// -----------------------------------------------------------------------------
// Modules

mod error;
mod mask;
mod properties;

// -----------------------------------------------------------------------------
// Exports

pub use error::DeriveError;
pub use mask::FieldMask;
pub use properties::{EnumEntry, SerializableProperties, SerializableProperty};
pub use properties::{derive_entries, derive_properties};
