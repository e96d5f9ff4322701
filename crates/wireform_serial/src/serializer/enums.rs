//! The generic enum serializer, parameterized by an enum's descriptor.

use alloc::boxed::Box;

use wireform_utils::sync::Arc;

use crate::codec::{CodecError, Decoder, Encoder};
use crate::descriptor::{SerialDescriptor, enum_descriptor};
use crate::property::EnumEntry;
use crate::serializer::Serializer;
use crate::value::Value;

/// Serializer for enum shapes.
///
/// Values carry the entry *identifier*; the wire representation uses the
/// entry's ordinal index (rendered by the format, e.g. as the wire-name
/// string in the tree codec).
///
/// # Examples
///
/// ```
/// use wireform_serial::shape::{EntryShape, TypeShape};
/// use wireform_serial::serializer::{Serializer, SerializerRegistry};
/// use wireform_serial::codec::tree::{TreeDecoder, TreeEncoder};
/// use wireform_serial::value::Value;
///
/// let shape = TypeShape::enumeration("demo::Color")
///     .with_entry(EntryShape::new("RED"))
///     .with_entry(EntryShape::new("GREEN"));
///
/// let mut registry = SerializerRegistry::new();
/// let serializer = registry.register(shape).unwrap();
/// assert_eq!(serializer.descriptor().element_len(), 2);
///
/// let mut encoder = TreeEncoder::new();
/// serializer.serialize(&mut encoder, &Value::Enum("GREEN".into())).unwrap();
/// let encoded = encoder.into_value().unwrap();
/// assert_eq!(encoded, Value::String("GREEN".into()));
///
/// let mut decoder = TreeDecoder::new(encoded);
/// assert_eq!(serializer.deserialize(&mut decoder).unwrap(), Value::Enum("GREEN".into()));
/// ```
pub struct EnumSerializer {
    descriptor: Arc<SerialDescriptor>,
    entries: Box<[EnumEntry]>,
}

impl EnumSerializer {
    /// Creates the serializer for an enum with the given derived entries.
    pub fn new(serial_name: &str, entries: Box<[EnumEntry]>) -> Self {
        Self {
            descriptor: Arc::new(enum_descriptor(serial_name, &entries)),
            entries,
        }
    }

    /// The derived entries, in declaration order.
    pub fn entries(&self) -> &[EnumEntry] {
        &self.entries
    }
}

impl Serializer for EnumSerializer {
    fn descriptor(&self) -> &Arc<SerialDescriptor> {
        &self.descriptor
    }

    fn serialize(&self, encoder: &mut dyn Encoder, value: &Value) -> Result<(), CodecError> {
        let identifier = value
            .as_enum()
            .ok_or_else(|| CodecError::mismatch("enum", value))?;
        let index = self
            .entries
            .iter()
            .position(|entry| entry.identifier() == identifier)
            .ok_or_else(|| CodecError::UnknownVariant {
                serial_name: self.descriptor.serial_name().into(),
                variant: identifier.into(),
            })?;
        encoder.encode_enum(&self.descriptor, index)
    }

    fn deserialize(&self, decoder: &mut dyn Decoder) -> Result<Value, CodecError> {
        let index = decoder.decode_enum(&self.descriptor)?;
        let entry = self
            .entries
            .get(index)
            .ok_or(CodecError::InvalidElementIndex {
                serial_name: self.descriptor.serial_name().into(),
                index,
            })?;
        Ok(Value::Enum(entry.identifier().into()))
    }
}
