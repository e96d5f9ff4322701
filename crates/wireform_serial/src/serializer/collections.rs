//! Serializers for collection and tuple shapes.
//!
//! Collection descriptors follow the structure-kind conventions: lists use
//! positional element indexes, maps alternate key/value indexes, and tuples
//! are small class-kinded structures with `first`/`second`/`third` elements.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use wireform_utils::sync::Arc;

use crate::codec::{
    CodecError, Decoder, ElementIndex, Encoder, decode_structure, encode_collection,
    encode_structure,
};
use crate::descriptor::{
    DescriptorCell, ElementInfo, SerialDescriptor, SerialKind, StructureKind,
};
use crate::serializer::{Serializer, SerializerRef};
use crate::value::{StructValue, Value};

// -----------------------------------------------------------------------------
// ListSerializer

/// Serializer for list-kinded collections (lists and sets).
pub struct ListSerializer {
    descriptor: Arc<SerialDescriptor>,
    element: SerializerRef,
}

impl ListSerializer {
    /// Creates a list serializer under the given serial name.
    pub fn new(serial_name: &str, element: SerializerRef) -> Self {
        let elements = vec![ElementInfo::new(
            "0",
            DescriptorCell::resolved(element.descriptor().clone()),
            false,
        )];
        Self {
            descriptor: Arc::new(SerialDescriptor::new(
                serial_name,
                SerialKind::Structure(StructureKind::List),
                elements,
            )),
            element,
        }
    }
}

impl Serializer for ListSerializer {
    fn descriptor(&self) -> &Arc<SerialDescriptor> {
        &self.descriptor
    }

    fn serialize(&self, encoder: &mut dyn Encoder, value: &Value) -> Result<(), CodecError> {
        let items = value
            .as_list()
            .ok_or_else(|| CodecError::mismatch("list", value))?;
        let descriptor = &self.descriptor;
        encode_collection(encoder, descriptor, items.len(), |composite| {
            for (index, item) in items.iter().enumerate() {
                composite.encode_serializable_element(
                    descriptor,
                    index,
                    self.element.as_ref(),
                    item,
                )?;
            }
            Ok(())
        })
    }

    fn deserialize(&self, decoder: &mut dyn Decoder) -> Result<Value, CodecError> {
        let descriptor = &self.descriptor;
        decode_structure(decoder, descriptor, |composite| {
            let size = composite.decode_collection_size(descriptor)?;
            let mut items = Vec::with_capacity(size.unwrap_or(0));
            if composite.decode_sequentially() {
                let size = size.ok_or_else(|| {
                    CodecError::custom("sequential decoding requires a known collection size")
                })?;
                for index in 0..size {
                    items.push(composite.decode_serializable_element(
                        descriptor,
                        index,
                        self.element.as_ref(),
                    )?);
                }
            } else {
                loop {
                    match composite.decode_element_index(descriptor)? {
                        ElementIndex::Element(index) => {
                            // Lists are positional; holes are a format defect.
                            if index != items.len() {
                                return Err(CodecError::InvalidElementIndex {
                                    serial_name: descriptor.serial_name().into(),
                                    index,
                                });
                            }
                            items.push(composite.decode_serializable_element(
                                descriptor,
                                index,
                                self.element.as_ref(),
                            )?);
                        }
                        ElementIndex::UnknownName => continue,
                        ElementIndex::Done => break,
                    }
                }
            }
            Ok(Value::List(items))
        })
    }
}

// -----------------------------------------------------------------------------
// ArraySerializer

/// The reference-array wrapper: array-typed fields encode through this, with
/// list semantics under the `Array` serial name.
pub struct ArraySerializer {
    inner: ListSerializer,
}

impl ArraySerializer {
    /// Creates an array serializer over the element serializer.
    pub fn new(element: SerializerRef) -> Self {
        Self {
            inner: ListSerializer::new("Array", element),
        }
    }
}

impl Serializer for ArraySerializer {
    fn descriptor(&self) -> &Arc<SerialDescriptor> {
        self.inner.descriptor()
    }

    fn serialize(&self, encoder: &mut dyn Encoder, value: &Value) -> Result<(), CodecError> {
        self.inner.serialize(encoder, value)
    }

    fn deserialize(&self, decoder: &mut dyn Decoder) -> Result<Value, CodecError> {
        self.inner.deserialize(decoder)
    }
}

// -----------------------------------------------------------------------------
// MapSerializer

/// Serializer for map-kinded collections.
///
/// Entry `i` occupies element indexes `2 * i` (key) and `2 * i + 1` (value).
pub struct MapSerializer {
    descriptor: Arc<SerialDescriptor>,
    key: SerializerRef,
    value: SerializerRef,
}

impl MapSerializer {
    /// Creates a map serializer under the given serial name.
    pub fn new(serial_name: &str, key: SerializerRef, value: SerializerRef) -> Self {
        let elements = vec![
            ElementInfo::new("key", DescriptorCell::resolved(key.descriptor().clone()), false),
            ElementInfo::new(
                "value",
                DescriptorCell::resolved(value.descriptor().clone()),
                false,
            ),
        ];
        Self {
            descriptor: Arc::new(SerialDescriptor::new(
                serial_name,
                SerialKind::Structure(StructureKind::Map),
                elements,
            )),
            key,
            value,
        }
    }

    fn entry_serializer(&self, index: usize) -> &SerializerRef {
        if index % 2 == 0 { &self.key } else { &self.value }
    }
}

impl Serializer for MapSerializer {
    fn descriptor(&self) -> &Arc<SerialDescriptor> {
        &self.descriptor
    }

    fn serialize(&self, encoder: &mut dyn Encoder, value: &Value) -> Result<(), CodecError> {
        let entries = value
            .as_map()
            .ok_or_else(|| CodecError::mismatch("map", value))?;
        let descriptor = &self.descriptor;
        encode_collection(encoder, descriptor, entries.len() * 2, |composite| {
            for (index, (key, entry)) in entries.iter().enumerate() {
                composite.encode_serializable_element(
                    descriptor,
                    2 * index,
                    self.key.as_ref(),
                    key,
                )?;
                composite.encode_serializable_element(
                    descriptor,
                    2 * index + 1,
                    self.value.as_ref(),
                    entry,
                )?;
            }
            Ok(())
        })
    }

    fn deserialize(&self, decoder: &mut dyn Decoder) -> Result<Value, CodecError> {
        let descriptor = &self.descriptor;
        decode_structure(decoder, descriptor, |composite| {
            let size = composite.decode_collection_size(descriptor)?;
            let mut entries = Vec::with_capacity(size.unwrap_or(0) / 2);
            let mut pending_key: Option<Value> = None;
            if composite.decode_sequentially() {
                let size = size.ok_or_else(|| {
                    CodecError::custom("sequential decoding requires a known collection size")
                })?;
                for index in 0..size {
                    let decoded = composite.decode_serializable_element(
                        descriptor,
                        index,
                        self.entry_serializer(index).as_ref(),
                    )?;
                    match pending_key.take() {
                        None => pending_key = Some(decoded),
                        Some(key) => entries.push((key, decoded)),
                    }
                }
            } else {
                loop {
                    match composite.decode_element_index(descriptor)? {
                        ElementIndex::Element(index) => {
                            let decoded = composite.decode_serializable_element(
                                descriptor,
                                index,
                                self.entry_serializer(index).as_ref(),
                            )?;
                            match pending_key.take() {
                                None => pending_key = Some(decoded),
                                Some(key) => entries.push((key, decoded)),
                            }
                        }
                        ElementIndex::UnknownName => continue,
                        ElementIndex::Done => break,
                    }
                }
            }
            if pending_key.is_some() {
                return Err(CodecError::custom("map scope ended with a dangling key"));
            }
            Ok(Value::Map(entries))
        })
    }
}

// -----------------------------------------------------------------------------
// tuples

/// Serializer for pairs, as the class-kinded structure `{first, second}`.
pub struct PairSerializer {
    descriptor: Arc<SerialDescriptor>,
    parts: [SerializerRef; 2],
}

impl PairSerializer {
    /// Creates a pair serializer over its part serializers.
    pub fn new(first: SerializerRef, second: SerializerRef) -> Self {
        let elements = vec![
            ElementInfo::new("first", DescriptorCell::resolved(first.descriptor().clone()), false),
            ElementInfo::new(
                "second",
                DescriptorCell::resolved(second.descriptor().clone()),
                false,
            ),
        ];
        Self {
            descriptor: Arc::new(SerialDescriptor::new(
                "Pair",
                SerialKind::Structure(StructureKind::Class),
                elements,
            )),
            parts: [first, second],
        }
    }
}

impl Serializer for PairSerializer {
    fn descriptor(&self) -> &Arc<SerialDescriptor> {
        &self.descriptor
    }

    fn serialize(&self, encoder: &mut dyn Encoder, value: &Value) -> Result<(), CodecError> {
        serialize_tuple(encoder, &self.descriptor, &self.parts, value)
    }

    fn deserialize(&self, decoder: &mut dyn Decoder) -> Result<Value, CodecError> {
        deserialize_tuple(decoder, &self.descriptor, &self.parts)
    }
}

/// Serializer for triples, as the class-kinded structure
/// `{first, second, third}`.
pub struct TripleSerializer {
    descriptor: Arc<SerialDescriptor>,
    parts: [SerializerRef; 3],
}

impl TripleSerializer {
    /// Creates a triple serializer over its part serializers.
    pub fn new(first: SerializerRef, second: SerializerRef, third: SerializerRef) -> Self {
        let elements = vec![
            ElementInfo::new("first", DescriptorCell::resolved(first.descriptor().clone()), false),
            ElementInfo::new(
                "second",
                DescriptorCell::resolved(second.descriptor().clone()),
                false,
            ),
            ElementInfo::new("third", DescriptorCell::resolved(third.descriptor().clone()), false),
        ];
        Self {
            descriptor: Arc::new(SerialDescriptor::new(
                "Triple",
                SerialKind::Structure(StructureKind::Class),
                elements,
            )),
            parts: [first, second, third],
        }
    }
}

impl Serializer for TripleSerializer {
    fn descriptor(&self) -> &Arc<SerialDescriptor> {
        &self.descriptor
    }

    fn serialize(&self, encoder: &mut dyn Encoder, value: &Value) -> Result<(), CodecError> {
        serialize_tuple(encoder, &self.descriptor, &self.parts, value)
    }

    fn deserialize(&self, decoder: &mut dyn Decoder) -> Result<Value, CodecError> {
        deserialize_tuple(decoder, &self.descriptor, &self.parts)
    }
}

fn serialize_tuple(
    encoder: &mut dyn Encoder,
    descriptor: &Arc<SerialDescriptor>,
    parts: &[SerializerRef],
    value: &Value,
) -> Result<(), CodecError> {
    let fields = value
        .as_struct()
        .ok_or_else(|| CodecError::mismatch("struct", value))?;
    encode_structure(encoder, descriptor, |composite| {
        for (index, part) in parts.iter().enumerate() {
            let name = descriptor
                .element_name(index)
                .ok_or(CodecError::InvalidElementIndex {
                    serial_name: descriptor.serial_name().into(),
                    index,
                })?;
            let field = fields.field(name).ok_or(CodecError::MissingFields {
                serial_name: descriptor.serial_name().into(),
                fields: vec![name.into()],
            })?;
            composite.encode_serializable_element(descriptor, index, part.as_ref(), field)?;
        }
        Ok(())
    })
}

fn deserialize_tuple(
    decoder: &mut dyn Decoder,
    descriptor: &Arc<SerialDescriptor>,
    parts: &[SerializerRef],
) -> Result<Value, CodecError> {
    decode_structure(decoder, descriptor, |composite| {
        let mut slots: Vec<Option<Value>> = vec![None; parts.len()];
        if composite.decode_sequentially() {
            for (index, part) in parts.iter().enumerate() {
                slots[index] =
                    Some(composite.decode_serializable_element(descriptor, index, part.as_ref())?);
            }
        } else {
            loop {
                match composite.decode_element_index(descriptor)? {
                    ElementIndex::Element(index) => {
                        let part =
                            parts
                                .get(index)
                                .ok_or(CodecError::InvalidElementIndex {
                                    serial_name: descriptor.serial_name().into(),
                                    index,
                                })?;
                        slots[index] = Some(composite.decode_serializable_element(
                            descriptor,
                            index,
                            part.as_ref(),
                        )?);
                    }
                    ElementIndex::UnknownName => continue,
                    ElementIndex::Done => break,
                }
            }
        }

        let missing: Vec<Box<str>> = slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .filter_map(|(index, _)| descriptor.element_name(index).map(Into::into))
            .collect();
        if !missing.is_empty() {
            return Err(CodecError::MissingFields {
                serial_name: descriptor.serial_name().into(),
                fields: missing,
            });
        }

        let mut out = StructValue::of(descriptor.serial_name());
        for (index, slot) in slots.into_iter().enumerate() {
            let name = descriptor
                .element_name(index)
                .ok_or(CodecError::InvalidElementIndex {
                    serial_name: descriptor.serial_name().into(),
                    index,
                })?;
            out.insert(name, slot.unwrap_or_default());
        }
        Ok(Value::Struct(out))
    })
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;

    use crate::codec::CodecError;
    use crate::codec::tree::{TreeDecoder, TreeEncoder};
    use crate::serializer::{Serializer, SerializerRegistry};
    use crate::shape::TypeRef;
    use crate::value::{StructValue, Value};

    fn round_trip(serializer: &dyn Serializer, value: &Value) -> Value {
        let mut encoder = TreeEncoder::new();
        serializer.serialize(&mut encoder, value).unwrap();
        let mut decoder = TreeDecoder::new(encoder.into_value().unwrap());
        serializer.deserialize(&mut decoder).unwrap()
    }

    #[test]
    fn list_round_trip() {
        let mut registry = SerializerRegistry::new();
        let serializer = registry.resolve(&TypeRef::list(TypeRef::I32)).unwrap();
        let value = Value::List(vec![Value::I32(1), Value::I32(2), Value::I32(3)]);
        assert_eq!(round_trip(serializer.as_ref(), &value), value);
        assert_eq!(round_trip(serializer.as_ref(), &Value::List(vec![])), Value::List(vec![]));
    }

    #[test]
    fn list_round_trip_sequentially() {
        let mut registry = SerializerRegistry::new();
        let serializer = registry.resolve(&TypeRef::list(TypeRef::U8)).unwrap();
        let value = Value::List(vec![Value::U8(9), Value::U8(8)]);

        let mut encoder = TreeEncoder::new();
        serializer.serialize(&mut encoder, &value).unwrap();
        let mut decoder = TreeDecoder::new(encoder.into_value().unwrap()).sequential();
        assert_eq!(serializer.deserialize(&mut decoder).unwrap(), value);
    }

    #[test]
    fn nested_list_round_trip() {
        let mut registry = SerializerRegistry::new();
        let serializer = registry
            .resolve(&TypeRef::list(TypeRef::list(TypeRef::Bool)))
            .unwrap();
        let value = Value::List(vec![
            Value::List(vec![Value::Bool(true)]),
            Value::List(vec![]),
        ]);
        assert_eq!(round_trip(serializer.as_ref(), &value), value);
    }

    #[test]
    fn map_round_trip_preserves_entry_order() {
        let mut registry = SerializerRegistry::new();
        let serializer = registry
            .resolve(&TypeRef::map(TypeRef::String, TypeRef::I64))
            .unwrap();
        let value = Value::Map(vec![
            (Value::from("b"), Value::I64(2)),
            (Value::from("a"), Value::I64(1)),
        ]);
        assert_eq!(round_trip(serializer.as_ref(), &value), value);
    }

    #[test]
    fn map_keys_are_not_restricted_to_strings() {
        let mut registry = SerializerRegistry::new();
        let serializer = registry
            .resolve(&TypeRef::map(
                TypeRef::Tuple(vec![TypeRef::I32, TypeRef::I32]),
                TypeRef::Bool,
            ))
            .unwrap();
        let key = Value::Struct(
            StructValue::of("Pair")
                .with("first", Value::I32(1))
                .with("second", Value::I32(2)),
        );
        let value = Value::Map(vec![(key, Value::Bool(true))]);
        assert_eq!(round_trip(serializer.as_ref(), &value), value);
    }

    #[test]
    fn array_uses_list_semantics() {
        let mut registry = SerializerRegistry::new();
        let serializer = registry.resolve(&TypeRef::array(TypeRef::U8)).unwrap();
        assert_eq!(serializer.descriptor().serial_name(), "Array");

        let value = Value::List(vec![Value::U8(0), Value::U8(255)]);
        assert_eq!(round_trip(serializer.as_ref(), &value), value);
    }

    #[test]
    fn pair_round_trip() {
        let mut registry = SerializerRegistry::new();
        let serializer = registry
            .resolve(&TypeRef::Tuple(vec![TypeRef::I32, TypeRef::String]))
            .unwrap();
        let value = Value::Struct(
            StructValue::of("Pair")
                .with("first", Value::I32(3))
                .with("second", Value::from("three")),
        );
        assert_eq!(round_trip(serializer.as_ref(), &value), value);
    }

    #[test]
    fn triple_missing_part_is_reported() {
        let mut registry = SerializerRegistry::new();
        let serializer = registry
            .resolve(&TypeRef::Tuple(vec![TypeRef::I32, TypeRef::I32, TypeRef::I32]))
            .unwrap();

        let incomplete = Value::Struct(StructValue::new().with("first", Value::I32(1)));
        let mut decoder = TreeDecoder::new(incomplete);
        match serializer.deserialize(&mut decoder).unwrap_err() {
            CodecError::MissingFields { fields, .. } => {
                assert_eq!(fields, ["second", "third"].map(Into::into).to_vec());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn oversized_tuples_are_rejected() {
        let mut registry = SerializerRegistry::new();
        let err = registry
            .resolve(&TypeRef::Tuple(vec![
                TypeRef::I32,
                TypeRef::I32,
                TypeRef::I32,
                TypeRef::I32,
            ]))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            crate::serializer::RegistryError::Resolve(
                crate::serializer::ResolveError::TupleArityUnsupported { arity: 4 },
            ),
        ));
    }
}
