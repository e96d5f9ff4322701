//! The codec protocol: the abstract transport contract between synthesized
//! serializers and concrete formats.
//!
//! A format implements [`Encoder`]/[`Decoder`] (and their composite
//! counterparts); serializers drive those traits against a
//! [`SerialDescriptor`](crate::descriptor::SerialDescriptor). The traits are
//! object-safe on purpose: the registry hands out `Arc<dyn Serializer>`, and
//! serializers receive `&mut dyn Encoder`.
//!
//! Structure scopes are begin/end delimited. [`encode_structure`] and
//! [`decode_structure`] wrap a scope around a closure and close it on the
//! error path too; `end_structure` consumes the composite, so a scope cannot
//! be closed twice.
//!
//! The in-memory [`tree`] codec is the reference implementation of the whole
//! contract.

// -----------------------------------------------------------------------------
// Modules

mod decoder;
mod encoder;
mod error;
mod structure;

pub mod tree;

pub(crate) mod trace;

// -----------------------------------------------------------------------------
// Exports

pub use decoder::{CompositeDecoder, Decoder, ElementIndex};
pub use encoder::{CompositeEncoder, Encoder};
pub use error::CodecError;
pub use structure::{decode_structure, encode_collection, encode_structure};
pub use structure::{
    decode_nullable_serializable_value, decode_serializable_value,
    encode_nullable_serializable_value, encode_serializable_value,
};
