#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod codec;
pub mod descriptor;
pub mod property;
pub mod serializer;
pub mod shape;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use codec::CodecError;
pub use descriptor::SerialDescriptor;
pub use serializer::{Serializer, SerializerRef, SerializerRegistry};
pub use value::Value;
