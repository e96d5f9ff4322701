//! The in-memory tree codec: the reference implementation of the codec
//! protocol.
//!
//! [`TreeEncoder`] renders a serializer's output as an encoded [`Value`]
//! tree: structures become structs keyed by *wire* names, collections become
//! lists, maps become entry lists, enums become their wire-name string.
//! [`TreeDecoder`] is the dual, driving a serializer from such a tree.
//!
//! The codec doubles as the protocol's conformance vehicle, so its policies
//! are configurable where the protocol leaves formats a choice:
//!
//! - [`TreeEncoder::skip_defaults`] makes `should_encode_element_default`
//!   answer `false`, eliding values equal to their declared default;
//! - [`TreeDecoder::sequential`] declares strict descriptor-order delivery
//!   (`decode_sequentially` = `true`);
//! - [`TreeDecoder::deny_unknown_fields`] turns the skip-and-continue default
//!   for unrecognized fields into a hard [`CodecError::UnknownField`].

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use crate::codec::{
    CodecError, CompositeDecoder, CompositeEncoder, Decoder, ElementIndex, Encoder,
};
use crate::descriptor::{SerialDescriptor, SerialKind, StructureKind};
use crate::serializer::Serializer;
use crate::value::{StructValue, Value};

// -----------------------------------------------------------------------------
// TreeEncoder

/// Encodes values into an in-memory [`Value`] tree.
///
/// One encoder produces one tree; take it with
/// [`into_value`](TreeEncoder::into_value).
///
/// # Examples
///
/// ```
/// use wireform_serial::codec::tree::TreeEncoder;
/// use wireform_serial::shape::{FieldShape, TypeRef, TypeShape};
/// use wireform_serial::serializer::{Serializer, SerializerRegistry};
/// use wireform_serial::value::{StructValue, Value};
///
/// let mut registry = SerializerRegistry::new();
/// let serializer = registry
///     .register(TypeShape::class("demo::Id").with_field(FieldShape::parameter("id", TypeRef::U64)))
///     .unwrap();
///
/// let value = Value::Struct(StructValue::of("demo::Id").with("id", Value::U64(7)));
/// let mut encoder = TreeEncoder::new();
/// serializer.serialize(&mut encoder, &value).unwrap();
///
/// let encoded = encoder.into_value().unwrap();
/// assert_eq!(encoded.as_struct().unwrap().field("id"), Some(&Value::U64(7)));
/// ```
#[derive(Default)]
pub struct TreeEncoder {
    skip_defaults: bool,
    output: Option<Value>,
}

impl TreeEncoder {
    /// Creates an encoder with the default policies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Elides element values equal to their declared default.
    pub fn skip_defaults(mut self) -> Self {
        self.skip_defaults = true;
        self
    }

    /// The encoded tree, if a value has been encoded.
    pub fn into_value(self) -> Option<Value> {
        self.output
    }

    fn put(&mut self, value: Value) {
        self.output = Some(value);
    }
}

macro_rules! impl_tree_encode_primitive {
    ($($method:ident: $ty:ty => $variant:ident),* $(,)?) => {
        $(fn $method(&mut self, value: $ty) -> Result<(), CodecError> {
            self.put(Value::$variant(value));
            Ok(())
        })*
    };
}

impl Encoder for TreeEncoder {
    fn encode_null(&mut self) -> Result<(), CodecError> {
        self.put(Value::Null);
        Ok(())
    }

    impl_tree_encode_primitive! {
        encode_bool: bool => Bool,
        encode_i8: i8 => I8,
        encode_i16: i16 => I16,
        encode_i32: i32 => I32,
        encode_i64: i64 => I64,
        encode_u8: u8 => U8,
        encode_u16: u16 => U16,
        encode_u32: u32 => U32,
        encode_u64: u64 => U64,
        encode_f32: f32 => F32,
        encode_f64: f64 => F64,
        encode_char: char => Char,
    }

    fn encode_str(&mut self, value: &str) -> Result<(), CodecError> {
        self.put(Value::String(value.into()));
        Ok(())
    }

    fn encode_enum(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
    ) -> Result<(), CodecError> {
        let name = descriptor
            .element_name(index)
            .ok_or(CodecError::InvalidElementIndex {
                serial_name: descriptor.serial_name().into(),
                index,
            })?;
        self.put(Value::String(name.into()));
        Ok(())
    }

    fn begin_structure<'a>(
        &'a mut self,
        descriptor: &SerialDescriptor,
    ) -> Result<Box<dyn CompositeEncoder + 'a>, CodecError> {
        let target = match descriptor.kind() {
            SerialKind::Structure(StructureKind::List) => Target::List(Vec::new()),
            SerialKind::Structure(StructureKind::Map) => Target::Map {
                entries: Vec::new(),
                pending_key: None,
            },
            _ => Target::Struct(StructValue::with_capacity(descriptor.element_len())),
        };
        Ok(Box::new(TreeCompositeEncoder {
            encoder: self,
            target,
        }))
    }
}

enum Target {
    Struct(StructValue),
    List(Vec<Value>),
    Map {
        entries: Vec<(Value, Value)>,
        pending_key: Option<Value>,
    },
}

struct TreeCompositeEncoder<'a> {
    encoder: &'a mut TreeEncoder,
    target: Target,
}

impl TreeCompositeEncoder<'_> {
    fn write(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        value: Value,
    ) -> Result<(), CodecError> {
        match &mut self.target {
            Target::Struct(fields) => {
                let name =
                    descriptor
                        .element_name(index)
                        .ok_or(CodecError::InvalidElementIndex {
                            serial_name: descriptor.serial_name().into(),
                            index,
                        })?;
                fields.insert(name, value);
            }
            Target::List(items) => items.push(value),
            Target::Map {
                entries,
                pending_key,
            } => match pending_key.take() {
                None => *pending_key = Some(value),
                Some(key) => entries.push((key, value)),
            },
        }
        Ok(())
    }

    fn encode_child(
        &self,
        serializer: &dyn Serializer,
        value: &Value,
    ) -> Result<Value, CodecError> {
        let mut nested = TreeEncoder {
            skip_defaults: self.encoder.skip_defaults,
            output: None,
        };
        serializer.serialize(&mut nested, value)?;
        nested
            .output
            .ok_or_else(|| CodecError::custom("child serializer produced no output"))
    }
}

macro_rules! impl_tree_encode_element {
    ($($method:ident: $ty:ty => $variant:ident),* $(,)?) => {
        $(fn $method(
            &mut self,
            descriptor: &SerialDescriptor,
            index: usize,
            value: $ty,
        ) -> Result<(), CodecError> {
            self.write(descriptor, index, Value::$variant(value))
        })*
    };
}

impl CompositeEncoder for TreeCompositeEncoder<'_> {
    fn should_encode_element_default(&self, _descriptor: &SerialDescriptor, _index: usize) -> bool {
        !self.encoder.skip_defaults
    }

    impl_tree_encode_element! {
        encode_bool_element: bool => Bool,
        encode_i8_element: i8 => I8,
        encode_i16_element: i16 => I16,
        encode_i32_element: i32 => I32,
        encode_i64_element: i64 => I64,
        encode_u8_element: u8 => U8,
        encode_u16_element: u16 => U16,
        encode_u32_element: u32 => U32,
        encode_u64_element: u64 => U64,
        encode_f32_element: f32 => F32,
        encode_f64_element: f64 => F64,
        encode_char_element: char => Char,
    }

    fn encode_str_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        value: &str,
    ) -> Result<(), CodecError> {
        self.write(descriptor, index, Value::String(value.into()))
    }

    fn encode_serializable_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        serializer: &dyn Serializer,
        value: &Value,
    ) -> Result<(), CodecError> {
        let encoded = self.encode_child(serializer, value)?;
        self.write(descriptor, index, encoded)
    }

    fn encode_nullable_serializable_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        serializer: &dyn Serializer,
        value: &Value,
    ) -> Result<(), CodecError> {
        if value.is_null() && !serializer.descriptor().is_nullable() {
            return self.write(descriptor, index, Value::Null);
        }
        let encoded = self.encode_child(serializer, value)?;
        self.write(descriptor, index, encoded)
    }

    fn end_structure(self: Box<Self>, _descriptor: &SerialDescriptor) -> Result<(), CodecError> {
        let value = match self.target {
            Target::Struct(fields) => Value::Struct(fields),
            Target::List(items) => Value::List(items),
            Target::Map {
                entries,
                pending_key,
            } => {
                if pending_key.is_some() {
                    return Err(CodecError::custom("map scope closed with a dangling key"));
                }
                Value::Map(entries)
            }
        };
        self.encoder.put(value);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// TreeDecoder

/// Decodes values from an in-memory [`Value`] tree.
///
/// One decoder consumes one tree. Struct fields may arrive in any order; the
/// decoder negotiates indexes through `decode_element_index` unless
/// [`sequential`](TreeDecoder::sequential) is set.
pub struct TreeDecoder {
    input: Option<Value>,
    sequential: bool,
    deny_unknown_fields: bool,
}

impl TreeDecoder {
    /// Creates a decoder over an encoded tree with the default policies.
    pub fn new(value: Value) -> Self {
        Self {
            input: Some(value),
            sequential: false,
            deny_unknown_fields: false,
        }
    }

    /// Declares strict descriptor-order delivery. Every element must then be
    /// present; optional-field fallback never triggers.
    pub fn sequential(mut self) -> Self {
        self.sequential = true;
        self
    }

    /// Rejects fields the descriptor does not recognize instead of skipping
    /// them.
    pub fn deny_unknown_fields(mut self) -> Self {
        self.deny_unknown_fields = true;
        self
    }

    fn child(&self, value: Value) -> TreeDecoder {
        TreeDecoder {
            input: Some(value),
            sequential: self.sequential,
            deny_unknown_fields: self.deny_unknown_fields,
        }
    }

    fn take(&mut self) -> Result<Value, CodecError> {
        self.input
            .take()
            .ok_or_else(|| CodecError::custom("decoder input already consumed"))
    }

    fn peek(&self) -> Result<&Value, CodecError> {
        self.input
            .as_ref()
            .ok_or_else(|| CodecError::custom("decoder input already consumed"))
    }
}

macro_rules! impl_tree_decode_primitive {
    ($($method:ident: $ty:ty => $variant:ident / $expected:literal),* $(,)?) => {
        $(fn $method(&mut self) -> Result<$ty, CodecError> {
            match self.take()? {
                Value::$variant(value) => Ok(value),
                other => Err(CodecError::mismatch($expected, &other)),
            }
        })*
    };
}

impl Decoder for TreeDecoder {
    fn decode_not_null_mark(&mut self) -> Result<bool, CodecError> {
        Ok(!self.peek()?.is_null())
    }

    fn decode_null(&mut self) -> Result<(), CodecError> {
        match self.take()? {
            Value::Null => Ok(()),
            other => Err(CodecError::mismatch("null", &other)),
        }
    }

    impl_tree_decode_primitive! {
        decode_bool: bool => Bool / "bool",
        decode_i8: i8 => I8 / "i8",
        decode_i16: i16 => I16 / "i16",
        decode_i32: i32 => I32 / "i32",
        decode_i64: i64 => I64 / "i64",
        decode_u8: u8 => U8 / "u8",
        decode_u16: u16 => U16 / "u16",
        decode_u32: u32 => U32 / "u32",
        decode_u64: u64 => U64 / "u64",
        decode_f32: f32 => F32 / "f32",
        decode_f64: f64 => F64 / "f64",
        decode_char: char => Char / "char",
        decode_string: String => String / "string",
    }

    fn decode_enum(&mut self, descriptor: &SerialDescriptor) -> Result<usize, CodecError> {
        match self.take()? {
            Value::String(name) => {
                descriptor
                    .element_index(&name)
                    .ok_or(CodecError::UnknownVariant {
                        serial_name: descriptor.serial_name().into(),
                        variant: name.into(),
                    })
            }
            other => Err(CodecError::mismatch("string", &other)),
        }
    }

    fn begin_structure<'a>(
        &'a mut self,
        descriptor: &SerialDescriptor,
    ) -> Result<Box<dyn CompositeDecoder + 'a>, CodecError> {
        let state = match descriptor.kind() {
            SerialKind::Structure(StructureKind::List) => match self.take()? {
                Value::List(items) => State::Seq { items, cursor: 0 },
                other => return Err(CodecError::mismatch("list", &other)),
            },
            SerialKind::Structure(StructureKind::Map) => match self.take()? {
                Value::Map(entries) => {
                    let mut items = Vec::with_capacity(entries.len() * 2);
                    for (key, value) in entries {
                        items.push(key);
                        items.push(value);
                    }
                    State::Seq { items, cursor: 0 }
                }
                other => return Err(CodecError::mismatch("map", &other)),
            },
            _ => match self.take()? {
                Value::Struct(value) => State::Struct {
                    fields: value.into_fields(),
                    cursor: 0,
                    current: None,
                },
                other => return Err(CodecError::mismatch("struct", &other)),
            },
        };
        Ok(Box::new(TreeCompositeDecoder {
            decoder: self,
            state,
        }))
    }
}

enum State {
    Struct {
        fields: Vec<(Box<str>, Value)>,
        cursor: usize,
        current: Option<Value>,
    },
    // Lists directly; maps flattened into alternating key/value slots.
    Seq {
        items: Vec<Value>,
        cursor: usize,
    },
}

struct TreeCompositeDecoder<'a> {
    decoder: &'a mut TreeDecoder,
    state: State,
}

impl TreeCompositeDecoder<'_> {
    // Takes the value for the element that `decode_element_index` just
    // yielded; in sequential mode, fetches the element's field by wire name.
    fn next_value(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
    ) -> Result<Value, CodecError> {
        match &mut self.state {
            State::Struct {
                fields, current, ..
            } => {
                if let Some(value) = current.take() {
                    return Ok(value);
                }
                if !self.decoder.sequential {
                    return Err(CodecError::custom("element decoded without index negotiation"));
                }
                let name =
                    descriptor
                        .element_name(index)
                        .ok_or(CodecError::InvalidElementIndex {
                            serial_name: descriptor.serial_name().into(),
                            index,
                        })?;
                match fields.iter().position(|(n, _)| &**n == name) {
                    Some(position) => Ok(fields.remove(position).1),
                    None => Err(CodecError::MissingFields {
                        serial_name: descriptor.serial_name().into(),
                        fields: alloc::vec![name.into()],
                    }),
                }
            }
            State::Seq { items, cursor } => {
                let value = items
                    .get_mut(*cursor)
                    .map(mem::take)
                    .ok_or_else(|| CodecError::custom("collection scope exhausted"))?;
                *cursor += 1;
                Ok(value)
            }
        }
    }
}

macro_rules! impl_tree_decode_element {
    ($($method:ident: $ty:ty => $variant:ident / $expected:literal),* $(,)?) => {
        $(fn $method(
            &mut self,
            descriptor: &SerialDescriptor,
            index: usize,
        ) -> Result<$ty, CodecError> {
            match self.next_value(descriptor, index)? {
                Value::$variant(value) => Ok(value),
                other => Err(CodecError::mismatch($expected, &other)),
            }
        })*
    };
}

impl CompositeDecoder for TreeCompositeDecoder<'_> {
    fn decode_sequentially(&self) -> bool {
        self.decoder.sequential
    }

    fn decode_element_index(
        &mut self,
        descriptor: &SerialDescriptor,
    ) -> Result<ElementIndex, CodecError> {
        match &mut self.state {
            State::Struct {
                fields,
                cursor,
                current,
            } => {
                while *cursor < fields.len() {
                    let (name, value) = &mut fields[*cursor];
                    *cursor += 1;
                    match descriptor.element_index(name) {
                        Some(index) => {
                            *current = Some(mem::take(value));
                            return Ok(ElementIndex::Element(index));
                        }
                        None if self.decoder.deny_unknown_fields => {
                            return Err(CodecError::UnknownField {
                                serial_name: descriptor.serial_name().into(),
                                field: name.clone(),
                            });
                        }
                        // The unrecognized value is dropped with the scope.
                        None => return Ok(ElementIndex::UnknownName),
                    }
                }
                Ok(ElementIndex::Done)
            }
            State::Seq { items, cursor } => {
                if *cursor < items.len() {
                    Ok(ElementIndex::Element(*cursor))
                } else {
                    Ok(ElementIndex::Done)
                }
            }
        }
    }

    fn decode_collection_size(
        &mut self,
        _descriptor: &SerialDescriptor,
    ) -> Result<Option<usize>, CodecError> {
        match &self.state {
            State::Seq { items, .. } => Ok(Some(items.len())),
            State::Struct { .. } => Ok(None),
        }
    }

    impl_tree_decode_element! {
        decode_bool_element: bool => Bool / "bool",
        decode_i8_element: i8 => I8 / "i8",
        decode_i16_element: i16 => I16 / "i16",
        decode_i32_element: i32 => I32 / "i32",
        decode_i64_element: i64 => I64 / "i64",
        decode_u8_element: u8 => U8 / "u8",
        decode_u16_element: u16 => U16 / "u16",
        decode_u32_element: u32 => U32 / "u32",
        decode_u64_element: u64 => U64 / "u64",
        decode_f32_element: f32 => F32 / "f32",
        decode_f64_element: f64 => F64 / "f64",
        decode_char_element: char => Char / "char",
        decode_string_element: String => String / "string",
    }

    fn decode_serializable_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        deserializer: &dyn Serializer,
    ) -> Result<Value, CodecError> {
        let value = self.next_value(descriptor, index)?;
        let mut child = self.decoder.child(value);
        deserializer.deserialize(&mut child)
    }

    fn decode_nullable_serializable_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        deserializer: &dyn Serializer,
    ) -> Result<Value, CodecError> {
        let value = self.next_value(descriptor, index)?;
        if value.is_null() && !deserializer.descriptor().is_nullable() {
            return Ok(Value::Null);
        }
        let mut child = self.decoder.child(value);
        deserializer.deserialize(&mut child)
    }

    fn end_structure(self: Box<Self>, _descriptor: &SerialDescriptor) -> Result<(), CodecError> {
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::{TreeDecoder, TreeEncoder};
    use crate::codec::{
        CodecError, CompositeDecoder as _, CompositeEncoder as _, Decoder, Encoder, ElementIndex,
    };
    use crate::serializer::{Serializer, SerializerRegistry};
    use crate::shape::{EntryShape, TypeRef, TypeShape};
    use crate::value::Value;

    #[test]
    fn primitives_pass_through() {
        let mut encoder = TreeEncoder::new();
        encoder.encode_char('x').unwrap();
        assert_eq!(encoder.into_value(), Some(Value::Char('x')));

        let mut decoder = TreeDecoder::new(Value::U16(512));
        assert_eq!(decoder.decode_u16().unwrap(), 512);
    }

    #[test]
    fn kind_mismatch_is_reported() {
        let mut decoder = TreeDecoder::new(Value::I32(3));
        match decoder.decode_bool().unwrap_err() {
            CodecError::ValueMismatch { expected, found } => {
                assert_eq!(expected, "bool");
                assert_eq!(&*found, "i32");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn enum_values_encode_as_wire_names() {
        let mut registry = SerializerRegistry::new();
        let serializer = registry
            .register(
                TypeShape::enumeration("demo::Color")
                    .with_entry(EntryShape::new("RED"))
                    .with_entry(EntryShape::new("GREEN").with_wire_name("green")),
            )
            .unwrap();

        let mut encoder = TreeEncoder::new();
        serializer
            .serialize(&mut encoder, &Value::Enum("GREEN".into()))
            .unwrap();
        let encoded = encoder.into_value().unwrap();
        assert_eq!(encoded, Value::String("green".into()));

        let mut decoder = TreeDecoder::new(encoded);
        assert_eq!(
            serializer.deserialize(&mut decoder).unwrap(),
            Value::Enum("GREEN".into()),
        );
    }

    #[test]
    fn unknown_enum_wire_name_is_rejected() {
        let mut registry = SerializerRegistry::new();
        let serializer = registry
            .register(TypeShape::enumeration("demo::Color").with_entry(EntryShape::new("RED")))
            .unwrap();

        let mut decoder = TreeDecoder::new(Value::String("BLUE".into()));
        match serializer.deserialize(&mut decoder).unwrap_err() {
            CodecError::UnknownVariant { variant, .. } => assert_eq!(&*variant, "BLUE"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn map_scope_rejects_dangling_keys() {
        let mut registry = SerializerRegistry::new();
        let map = registry
            .resolve(&TypeRef::map(TypeRef::String, TypeRef::I32))
            .unwrap();
        let descriptor = map.descriptor().clone();

        let mut encoder = TreeEncoder::new();
        let mut composite = encoder.begin_structure(&descriptor).unwrap();
        composite.encode_str_element(&descriptor, 0, "orphan").unwrap();
        assert!(matches!(
            composite.end_structure(&descriptor).unwrap_err(),
            CodecError::Custom(_),
        ));
    }

    #[test]
    fn element_index_negotiation_over_lists() {
        let mut registry = SerializerRegistry::new();
        let list = registry.resolve(&TypeRef::list(TypeRef::Bool)).unwrap();
        let descriptor = list.descriptor().clone();

        let mut decoder = TreeDecoder::new(Value::List(vec![Value::Bool(true)]));
        let mut composite = decoder.begin_structure(&descriptor).unwrap();
        assert_eq!(
            composite.decode_element_index(&descriptor).unwrap(),
            ElementIndex::Element(0),
        );
        assert!(composite.decode_bool_element(&descriptor, 0).unwrap());
        assert_eq!(
            composite.decode_element_index(&descriptor).unwrap(),
            ElementIndex::Done,
        );
        composite.end_structure(&descriptor).unwrap();
    }
}
