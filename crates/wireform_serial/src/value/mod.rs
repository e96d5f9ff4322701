//! The dynamic instance model.
//!
//! Serializers move [`Value`] trees rather than concrete host types: the
//! shape layer describes types as data, so instances are data too. A
//! [`StructValue`] keys its fields by *source identifier*; wire names only
//! appear in encoded output.
//!
//! `Value` implements [`serde_core::Serialize`], so any value tree can be
//! exported through serde formats for debugging or interop.

// -----------------------------------------------------------------------------
// Modules

mod serde;
mod struct_value;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use struct_value::StructValue;
pub use value::Value;
