//! Serializer synthesis: from a derived property model and descriptor to
//! working serialize/deserialize logic.
//!
//! Every serializable type resolves to exactly one [`Serializer`] instance,
//! shared through [`SerializerRef`] and cached by the
//! [`SerializerRegistry`]. Synthesis is pure and happens once per type, on
//! first request; encoding and decoding are fully synchronous.

// -----------------------------------------------------------------------------
// Modules

mod builtins;
mod collections;
mod enums;
mod error;
mod generated;
mod nullable;
mod registry;
mod sealed;

#[cfg(feature = "std")]
mod shared;

// -----------------------------------------------------------------------------
// Exports

pub use builtins::{
    BoolSerializer, CharSerializer, DurationSerializer, F32Serializer, F64Serializer,
    I8Serializer, I16Serializer, I32Serializer, I64Serializer, StringSerializer, U8Serializer,
    U16Serializer, U32Serializer, U64Serializer, UnitSerializer, UuidSerializer,
};
pub use collections::{ArraySerializer, ListSerializer, MapSerializer, PairSerializer, TripleSerializer};
pub use enums::EnumSerializer;
pub use error::{RegistryError, ResolveError};
pub use generated::GeneratedSerializer;
pub use nullable::{InlineSerializer, NullableSerializer};
pub use registry::SerializerRegistry;
pub use sealed::SealedSerializer;

#[cfg(feature = "std")]
pub use shared::SharedRegistry;

use wireform_utils::sync::Arc;

use crate::codec::{CodecError, Decoder, Encoder};
use crate::descriptor::SerialDescriptor;
use crate::value::Value;

// -----------------------------------------------------------------------------
// Serializer

/// Serialize/deserialize logic for one type, paired with its descriptor.
///
/// Implementations are stateless beyond their descriptor and child handles;
/// one instance serves the type for the registry's whole lifetime and may be
/// shared freely across threads.
pub trait Serializer: Send + Sync {
    /// The descriptor of the type this serializer handles.
    fn descriptor(&self) -> &Arc<SerialDescriptor>;

    /// Encodes `value` into `encoder`.
    fn serialize(&self, encoder: &mut dyn Encoder, value: &Value) -> Result<(), CodecError>;

    /// Decodes one value from `decoder`.
    fn deserialize(&self, decoder: &mut dyn Decoder) -> Result<Value, CodecError>;
}

/// A shared serializer handle, as stored in and handed out by the registry.
pub type SerializerRef = Arc<dyn Serializer>;
