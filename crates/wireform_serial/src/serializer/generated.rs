//! The synthesized serializer for class shapes.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use wireform_utils::sync::{Arc, OnceLock};

use crate::codec::{
    CodecError, CompositeDecoder, CompositeEncoder, Decoder, ElementIndex, Encoder,
    decode_structure, encode_structure,
};
use crate::descriptor::{PrimitiveKind, SerialDescriptor, class_descriptor};
use crate::property::{FieldMask, SerializableProperties};
use crate::serializer::{Serializer, SerializerRef};
use crate::value::{StructValue, Value};

// -----------------------------------------------------------------------------
// SerializerSlot

// Write-once child serializer handle; deferred for recursive references and
// backpatched by the registry, like descriptor cells.
pub(crate) struct SerializerSlot(OnceLock<SerializerRef>);

impl SerializerSlot {
    pub(crate) const fn deferred() -> Self {
        Self(OnceLock::new())
    }

    pub(crate) fn resolve(&self, serializer: SerializerRef) -> bool {
        self.0.set(serializer).is_ok()
    }

    pub(crate) fn get(&self) -> Option<&SerializerRef> {
        self.0.get()
    }
}

// -----------------------------------------------------------------------------
// GeneratedSerializer

/// The serializer synthesized for one class shape.
///
/// Exactly one instance exists per registered shape; it is stateless beyond
/// its descriptor, property table and child serializer handles.
///
/// Field iteration follows the canonical property order. Decoding tracks seen
/// fields in a [`FieldMask`], skips unknown fields, reports *all* missing
/// required fields together, and falls back to declared defaults for unseen
/// optional fields.
pub struct GeneratedSerializer {
    type_name: Box<str>,
    descriptor: Arc<SerialDescriptor>,
    properties: SerializableProperties,
    children: Box<[SerializerSlot]>,
}

impl GeneratedSerializer {
    /// Creates the serializer shell: descriptor and property table in place,
    /// child slots deferred.
    pub(crate) fn shell(type_name: &str, properties: SerializableProperties) -> Self {
        let descriptor = Arc::new(class_descriptor(type_name, &properties));
        let children = (0..properties.len())
            .map(|_| SerializerSlot::deferred())
            .collect();
        Self {
            type_name: type_name.into(),
            descriptor,
            properties,
            children,
        }
    }

    /// Resolves the child serializer (and the matching descriptor element)
    /// for the property at `index`.
    pub(crate) fn resolve_child(&self, index: usize, serializer: SerializerRef) {
        if let Some(element) = self.descriptor.element(index) {
            element.descriptor().resolve(serializer.descriptor().clone());
        }
        if let Some(slot) = self.children.get(index) {
            slot.resolve(serializer);
        }
    }

    /// The child serializer for the property at `index`.
    pub(crate) fn child(&self, index: usize) -> Result<&SerializerRef, CodecError> {
        self.children
            .get(index)
            .and_then(SerializerSlot::get)
            .ok_or_else(|| {
                CodecError::custom("child serializer is not resolved; registration did not finish")
            })
    }

    /// The shape's qualified type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The canonical property table.
    pub fn properties(&self) -> &SerializableProperties {
        &self.properties
    }

    /// Serializers for the declaration's type parameters.
    ///
    /// Always empty: generic declarations are rejected before synthesis. The
    /// accessor keeps the synthesis contract uniform for callers that treat
    /// generated serializers generically.
    pub fn type_param_serializers(&self) -> &[SerializerRef] {
        &[]
    }

    /// Encodes this type's declared fields into an already-open structure
    /// scope.
    ///
    /// This is the chaining point for wrapping serializers (see
    /// [`SealedSerializer`](crate::serializer::SealedSerializer)): several
    /// field groups can share one scope without this serializer knowing who
    /// opened it.
    pub fn write_own_fields(
        &self,
        value: &StructValue,
        composite: &mut dyn CompositeEncoder,
    ) -> Result<(), CodecError> {
        for (index, property) in self.properties.iter().enumerate() {
            let field = value.field(property.original_identifier()).ok_or_else(|| {
                CodecError::MissingFields {
                    serial_name: self.descriptor.serial_name().into(),
                    fields: vec![property.name().into()],
                }
            })?;

            // Only optional fields may be elided; a required field equal to
            // its declared default still has to appear, or decoding would
            // report it missing.
            if let Some(default) = property.default()
                && property.is_optional()
                && field == default
                && !composite.should_encode_element_default(&self.descriptor, index)
            {
                continue;
            }

            self.encode_element(composite, index, field)?;
        }
        Ok(())
    }

    // The per-kind element fast path applies only to fields *declared* as
    // primitives; named types with primitive-kinded descriptors still go
    // through their own serializer.
    fn element_fast_path(&self, index: usize) -> Option<PrimitiveKind> {
        declared_primitive_kind(self.properties.get(index)?.ty())
    }

    fn encode_element(
        &self,
        composite: &mut dyn CompositeEncoder,
        index: usize,
        field: &Value,
    ) -> Result<(), CodecError> {
        let child = self.child(index)?;
        if child.descriptor().is_nullable() {
            return composite.encode_nullable_serializable_element(
                &self.descriptor,
                index,
                child.as_ref(),
                field,
            );
        }
        match self.element_fast_path(index) {
            Some(kind) => {
                encode_primitive_element(composite, &self.descriptor, index, kind, field)
            }
            None => composite.encode_serializable_element(
                &self.descriptor,
                index,
                child.as_ref(),
                field,
            ),
        }
    }

    fn decode_element(
        &self,
        composite: &mut dyn CompositeDecoder,
        index: usize,
    ) -> Result<Value, CodecError> {
        let child = self.child(index)?;
        if child.descriptor().is_nullable() {
            return composite.decode_nullable_serializable_element(
                &self.descriptor,
                index,
                child.as_ref(),
            );
        }
        match self.element_fast_path(index) {
            Some(kind) => decode_primitive_element(composite, &self.descriptor, index, kind),
            None => composite.decode_serializable_element(&self.descriptor, index, child.as_ref()),
        }
    }

    fn check_represents(&self, value: &StructValue) -> Result<(), CodecError> {
        match value.type_name() {
            Some(name) if name != &*self.type_name => Err(CodecError::TypeMismatch {
                expected: self.type_name.clone(),
                found: name.into(),
            }),
            _ => Ok(()),
        }
    }
}

impl Serializer for GeneratedSerializer {
    fn descriptor(&self) -> &Arc<SerialDescriptor> {
        &self.descriptor
    }

    fn serialize(&self, encoder: &mut dyn Encoder, value: &Value) -> Result<(), CodecError> {
        let fields = value
            .as_struct()
            .ok_or_else(|| CodecError::mismatch("struct", value))?;
        self.check_represents(fields)?;
        encode_structure(encoder, &self.descriptor, |composite| {
            self.write_own_fields(fields, composite)
        })
    }

    fn deserialize(&self, decoder: &mut dyn Decoder) -> Result<Value, CodecError> {
        decode_structure(decoder, &self.descriptor, |composite| {
            let count = self.properties.len();
            let mut mask = FieldMask::new(count);
            let mut slots: Vec<Option<Value>> = vec![None; count];

            if composite.decode_sequentially() {
                for index in 0..count {
                    slots[index] = Some(self.decode_element(composite, index)?);
                    mask.set(index);
                }
            } else {
                loop {
                    match composite.decode_element_index(&self.descriptor)? {
                        ElementIndex::Element(index) => {
                            if index >= count {
                                return Err(CodecError::InvalidElementIndex {
                                    serial_name: self.descriptor.serial_name().into(),
                                    index,
                                });
                            }
                            slots[index] = Some(self.decode_element(composite, index)?);
                            mask.set(index);
                        }
                        ElementIndex::UnknownName => continue,
                        ElementIndex::Done => break,
                    }
                }
            }

            let mut missing: Vec<Box<str>> = Vec::new();
            for (index, property) in self.properties.iter().enumerate() {
                if mask.get(index) {
                    continue;
                }
                match property.default() {
                    Some(default) if property.is_optional() => {
                        slots[index] = Some(default.clone());
                    }
                    _ => missing.push(property.name().into()),
                }
            }
            if !missing.is_empty() {
                return Err(CodecError::MissingFields {
                    serial_name: self.descriptor.serial_name().into(),
                    fields: missing,
                });
            }

            let mut out = StructValue::of(&*self.type_name);
            for (property, slot) in self.properties.iter().zip(slots) {
                let value = slot.ok_or_else(|| {
                    CodecError::custom("decoded field slot is unexpectedly empty")
                })?;
                out.insert(property.original_identifier(), value);
            }
            Ok(Value::Struct(out))
        })
    }
}

// -----------------------------------------------------------------------------
// primitive element dispatch

fn declared_primitive_kind(ty: &crate::shape::TypeRef) -> Option<PrimitiveKind> {
    use crate::shape::TypeRef;
    Some(match ty {
        TypeRef::Bool => PrimitiveKind::Bool,
        TypeRef::I8 => PrimitiveKind::I8,
        TypeRef::I16 => PrimitiveKind::I16,
        TypeRef::I32 => PrimitiveKind::I32,
        TypeRef::I64 => PrimitiveKind::I64,
        TypeRef::U8 => PrimitiveKind::U8,
        TypeRef::U16 => PrimitiveKind::U16,
        TypeRef::U32 => PrimitiveKind::U32,
        TypeRef::U64 => PrimitiveKind::U64,
        TypeRef::F32 => PrimitiveKind::F32,
        TypeRef::F64 => PrimitiveKind::F64,
        TypeRef::Char => PrimitiveKind::Char,
        TypeRef::String => PrimitiveKind::Str,
        _ => return None,
    })
}

fn encode_primitive_element(
    composite: &mut dyn CompositeEncoder,
    descriptor: &SerialDescriptor,
    index: usize,
    kind: PrimitiveKind,
    field: &Value,
) -> Result<(), CodecError> {
    match (kind, field) {
        (PrimitiveKind::Bool, Value::Bool(v)) => composite.encode_bool_element(descriptor, index, *v),
        (PrimitiveKind::I8, Value::I8(v)) => composite.encode_i8_element(descriptor, index, *v),
        (PrimitiveKind::I16, Value::I16(v)) => composite.encode_i16_element(descriptor, index, *v),
        (PrimitiveKind::I32, Value::I32(v)) => composite.encode_i32_element(descriptor, index, *v),
        (PrimitiveKind::I64, Value::I64(v)) => composite.encode_i64_element(descriptor, index, *v),
        (PrimitiveKind::U8, Value::U8(v)) => composite.encode_u8_element(descriptor, index, *v),
        (PrimitiveKind::U16, Value::U16(v)) => composite.encode_u16_element(descriptor, index, *v),
        (PrimitiveKind::U32, Value::U32(v)) => composite.encode_u32_element(descriptor, index, *v),
        (PrimitiveKind::U64, Value::U64(v)) => composite.encode_u64_element(descriptor, index, *v),
        (PrimitiveKind::F32, Value::F32(v)) => composite.encode_f32_element(descriptor, index, *v),
        (PrimitiveKind::F64, Value::F64(v)) => composite.encode_f64_element(descriptor, index, *v),
        (PrimitiveKind::Char, Value::Char(v)) => composite.encode_char_element(descriptor, index, *v),
        (PrimitiveKind::Str, Value::String(v)) => composite.encode_str_element(descriptor, index, v),
        (PrimitiveKind::Bool, other) => Err(CodecError::mismatch("bool", other)),
        (PrimitiveKind::I8, other) => Err(CodecError::mismatch("i8", other)),
        (PrimitiveKind::I16, other) => Err(CodecError::mismatch("i16", other)),
        (PrimitiveKind::I32, other) => Err(CodecError::mismatch("i32", other)),
        (PrimitiveKind::I64, other) => Err(CodecError::mismatch("i64", other)),
        (PrimitiveKind::U8, other) => Err(CodecError::mismatch("u8", other)),
        (PrimitiveKind::U16, other) => Err(CodecError::mismatch("u16", other)),
        (PrimitiveKind::U32, other) => Err(CodecError::mismatch("u32", other)),
        (PrimitiveKind::U64, other) => Err(CodecError::mismatch("u64", other)),
        (PrimitiveKind::F32, other) => Err(CodecError::mismatch("f32", other)),
        (PrimitiveKind::F64, other) => Err(CodecError::mismatch("f64", other)),
        (PrimitiveKind::Char, other) => Err(CodecError::mismatch("char", other)),
        (PrimitiveKind::Str, other) => Err(CodecError::mismatch("string", other)),
    }
}

fn decode_primitive_element(
    composite: &mut dyn CompositeDecoder,
    descriptor: &SerialDescriptor,
    index: usize,
    kind: PrimitiveKind,
) -> Result<Value, CodecError> {
    Ok(match kind {
        PrimitiveKind::Bool => Value::Bool(composite.decode_bool_element(descriptor, index)?),
        PrimitiveKind::I8 => Value::I8(composite.decode_i8_element(descriptor, index)?),
        PrimitiveKind::I16 => Value::I16(composite.decode_i16_element(descriptor, index)?),
        PrimitiveKind::I32 => Value::I32(composite.decode_i32_element(descriptor, index)?),
        PrimitiveKind::I64 => Value::I64(composite.decode_i64_element(descriptor, index)?),
        PrimitiveKind::U8 => Value::U8(composite.decode_u8_element(descriptor, index)?),
        PrimitiveKind::U16 => Value::U16(composite.decode_u16_element(descriptor, index)?),
        PrimitiveKind::U32 => Value::U32(composite.decode_u32_element(descriptor, index)?),
        PrimitiveKind::U64 => Value::U64(composite.decode_u64_element(descriptor, index)?),
        PrimitiveKind::F32 => Value::F32(composite.decode_f32_element(descriptor, index)?),
        PrimitiveKind::F64 => Value::F64(composite.decode_f64_element(descriptor, index)?),
        PrimitiveKind::Char => Value::Char(composite.decode_char_element(descriptor, index)?),
        PrimitiveKind::Str => Value::String(composite.decode_string_element(descriptor, index)?),
    })
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::codec::CodecError;
    use crate::codec::tree::{TreeDecoder, TreeEncoder};
    use crate::serializer::{Serializer, SerializerRef, SerializerRegistry};
    use crate::shape::{EntryShape, FieldShape, TypeRef, TypeShape};
    use crate::value::{StructValue, Value};

    fn point_serializer() -> SerializerRef {
        let mut registry = SerializerRegistry::new();
        let shape = TypeShape::class("demo::Point")
            .with_field(FieldShape::parameter("x", TypeRef::I32))
            .with_field(FieldShape::parameter("y", TypeRef::I32).with_default(Value::I32(0)));
        registry.register(shape).unwrap()
    }

    fn point(x: i32, y: i32) -> Value {
        Value::Struct(
            StructValue::of("demo::Point")
                .with("x", Value::I32(x))
                .with("y", Value::I32(y)),
        )
    }

    fn encode(serializer: &dyn Serializer, value: &Value) -> Value {
        let mut encoder = TreeEncoder::new();
        serializer.serialize(&mut encoder, value).unwrap();
        encoder.into_value().unwrap()
    }

    fn decode(serializer: &dyn Serializer, value: Value) -> Result<Value, CodecError> {
        let mut decoder = TreeDecoder::new(value);
        serializer.deserialize(&mut decoder)
    }

    #[test]
    fn descriptor_matches_property_count() {
        let serializer = point_serializer();
        assert_eq!(serializer.descriptor().element_len(), 2);
        assert!(serializer.descriptor().is_element_optional(1));
        assert!(!serializer.descriptor().is_element_optional(0));
    }

    #[test]
    fn round_trip() {
        let serializer = point_serializer();
        let value = point(3, -7);
        assert_eq!(decode(serializer.as_ref(), encode(serializer.as_ref(), &value)).unwrap(), value);
    }

    #[test]
    fn missing_required_field_is_reported() {
        let serializer = point_serializer();
        let err = decode(serializer.as_ref(), Value::Struct(StructValue::new())).unwrap_err();
        match err {
            CodecError::MissingFields { serial_name, fields } => {
                assert_eq!(&*serial_name, "demo::Point");
                assert_eq!(fields, ["x"].map(Into::into).to_vec());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_optional_field_falls_back_to_default() {
        let serializer = point_serializer();
        let encoded = Value::Struct(StructValue::new().with("x", Value::I32(3)));
        assert_eq!(decode(serializer.as_ref(), encoded).unwrap(), point(3, 0));
    }

    #[test]
    fn all_missing_required_fields_are_reported_together() {
        let mut registry = SerializerRegistry::new();
        let serializer = registry
            .register(
                TypeShape::class("demo::Span")
                    .with_field(FieldShape::parameter("lo", TypeRef::I64))
                    .with_field(FieldShape::parameter("hi", TypeRef::I64)),
            )
            .unwrap();

        let err = decode(serializer.as_ref(), Value::Struct(StructValue::new())).unwrap_err();
        match err {
            CodecError::MissingFields { fields, .. } => {
                assert_eq!(fields, ["lo", "hi"].map(Into::into).to_vec());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reordered_fields_decode_by_index() {
        let serializer = point_serializer();
        let reordered = Value::Struct(
            StructValue::new()
                .with("y", Value::I32(9))
                .with("x", Value::I32(1)),
        );
        assert_eq!(decode(serializer.as_ref(), reordered).unwrap(), point(1, 9));
    }

    #[test]
    fn unknown_fields_are_skipped() {
        let serializer = point_serializer();
        let with_extra = Value::Struct(
            StructValue::new()
                .with("w", Value::Bool(true))
                .with("x", Value::I32(5))
                .with("also_unknown", Value::Null),
        );
        assert_eq!(decode(serializer.as_ref(), with_extra).unwrap(), point(5, 0));
    }

    #[test]
    fn unknown_fields_can_be_denied() {
        let serializer = point_serializer();
        let with_extra = Value::Struct(
            StructValue::new()
                .with("x", Value::I32(5))
                .with("w", Value::Bool(true)),
        );
        let mut decoder = TreeDecoder::new(with_extra).deny_unknown_fields();
        match serializer.deserialize(&mut decoder).unwrap_err() {
            CodecError::UnknownField { field, .. } => assert_eq!(&*field, "w"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn defaults_can_be_elided_and_restored() {
        let serializer = point_serializer();
        let mut encoder = TreeEncoder::new().skip_defaults();
        serializer.serialize(&mut encoder, &point(3, 0)).unwrap();

        let encoded = encoder.into_value().unwrap();
        assert_eq!(encoded.as_struct().unwrap().field("y"), None);
        assert_eq!(decode(serializer.as_ref(), encoded).unwrap(), point(3, 0));
    }

    #[test]
    fn non_default_values_are_never_elided() {
        let serializer = point_serializer();
        let mut encoder = TreeEncoder::new().skip_defaults();
        serializer.serialize(&mut encoder, &point(3, 4)).unwrap();

        let encoded = encoder.into_value().unwrap();
        assert_eq!(encoded.as_struct().unwrap().field("y"), Some(&Value::I32(4)));
    }

    #[test]
    fn sequential_decoding_round_trip() {
        let serializer = point_serializer();
        let encoded = encode(serializer.as_ref(), &point(2, 8));
        let mut decoder = TreeDecoder::new(encoded).sequential();
        assert_eq!(serializer.deserialize(&mut decoder).unwrap(), point(2, 8));
    }

    #[test]
    fn wire_name_overrides_apply_on_the_wire_only() {
        let mut registry = SerializerRegistry::new();
        let serializer = registry
            .register(TypeShape::class("demo::Renamed").with_field(
                FieldShape::parameter("snake_case", TypeRef::Bool).with_wire_name("snakeCase"),
            ))
            .unwrap();

        let value = Value::Struct(StructValue::of("demo::Renamed").with("snake_case", Value::Bool(true)));
        let encoded = encode(serializer.as_ref(), &value);
        assert_eq!(encoded.as_struct().unwrap().field("snakeCase"), Some(&Value::Bool(true)));
        assert_eq!(decode(serializer.as_ref(), encoded).unwrap(), value);
    }

    #[test]
    fn nested_struct_round_trip() {
        let mut registry = SerializerRegistry::new();
        registry
            .register(
                TypeShape::class("demo::Point")
                    .with_field(FieldShape::parameter("x", TypeRef::I32))
                    .with_field(FieldShape::parameter("y", TypeRef::I32).with_default(Value::I32(0))),
            )
            .unwrap();
        let serializer = registry
            .register(
                TypeShape::class("demo::Line")
                    .with_field(FieldShape::parameter("a", TypeRef::named("demo::Point")))
                    .with_field(FieldShape::parameter("b", TypeRef::named("demo::Point"))),
            )
            .unwrap();

        let line = Value::Struct(
            StructValue::of("demo::Line")
                .with("a", point(0, 0))
                .with("b", point(4, 2)),
        );
        assert_eq!(decode(serializer.as_ref(), encode(serializer.as_ref(), &line)).unwrap(), line);
    }

    #[test]
    fn nullable_field_round_trip() {
        let mut registry = SerializerRegistry::new();
        let serializer = registry
            .register(TypeShape::class("demo::Profile").with_field(FieldShape::parameter(
                "nick",
                TypeRef::nullable(TypeRef::String),
            )))
            .unwrap();

        let absent = Value::Struct(StructValue::of("demo::Profile").with("nick", Value::Null));
        let present =
            Value::Struct(StructValue::of("demo::Profile").with("nick", Value::from("kai")));
        assert_eq!(
            decode(serializer.as_ref(), encode(serializer.as_ref(), &absent)).unwrap(),
            absent,
        );
        assert_eq!(
            decode(serializer.as_ref(), encode(serializer.as_ref(), &present)).unwrap(),
            present,
        );
    }

    #[test]
    fn enum_field_round_trip() {
        let mut registry = SerializerRegistry::new();
        registry
            .register(
                TypeShape::enumeration("demo::Color")
                    .with_entry(EntryShape::new("RED"))
                    .with_entry(EntryShape::new("GREEN")),
            )
            .unwrap();
        let serializer = registry
            .register(
                TypeShape::class("demo::Shirt")
                    .with_field(FieldShape::parameter("color", TypeRef::named("demo::Color"))),
            )
            .unwrap();

        let shirt =
            Value::Struct(StructValue::of("demo::Shirt").with("color", Value::Enum("GREEN".into())));
        let encoded = encode(serializer.as_ref(), &shirt);
        assert_eq!(
            encoded.as_struct().unwrap().field("color"),
            Some(&Value::String("GREEN".into())),
        );
        assert_eq!(decode(serializer.as_ref(), encoded).unwrap(), shirt);
    }

    #[test]
    fn recursive_type_round_trip() {
        let mut registry = SerializerRegistry::new();
        let serializer = registry
            .register(
                TypeShape::class("demo::Node")
                    .with_field(FieldShape::parameter("value", TypeRef::I32))
                    .with_field(FieldShape::parameter(
                        "next",
                        TypeRef::nullable(TypeRef::named("demo::Node")),
                    )),
            )
            .unwrap();

        let node = |value: i32, next: Value| {
            Value::Struct(
                StructValue::of("demo::Node")
                    .with("value", Value::I32(value))
                    .with("next", next),
            )
        };
        let chain = node(1, node(2, node(3, Value::Null)));
        assert_eq!(
            decode(serializer.as_ref(), encode(serializer.as_ref(), &chain)).unwrap(),
            chain,
        );
    }

    #[test]
    fn represented_type_is_checked_when_present() {
        let serializer = point_serializer();
        let wrong = Value::Struct(
            StructValue::of("demo::Other")
                .with("x", Value::I32(1))
                .with("y", Value::I32(2)),
        );
        let mut encoder = TreeEncoder::new();
        assert!(matches!(
            serializer.serialize(&mut encoder, &wrong).unwrap_err(),
            CodecError::TypeMismatch { .. },
        ));
    }

    #[test]
    fn write_own_fields_composes_field_groups_in_one_scope() {
        let mut registry = SerializerRegistry::new();
        let header = registry
            .register(
                TypeShape::class("demo::Header")
                    .with_field(FieldShape::parameter("id", TypeRef::U64)),
            )
            .unwrap();
        registry
            .register(
                TypeShape::class("demo::Body")
                    .with_field(FieldShape::parameter("text", TypeRef::String)),
            )
            .unwrap();
        let header_generated = registry.generated_for("demo::Header").unwrap();
        let body_generated = registry.generated_for("demo::Body").unwrap();

        let header_value = StructValue::of("demo::Header").with("id", Value::U64(9));
        let body_value = StructValue::of("demo::Body").with("text", Value::from("hello"));

        let mut encoder = TreeEncoder::new();
        {
            use crate::codec::{CompositeEncoder as _, Encoder};
            let mut composite = encoder.begin_structure(header.descriptor()).unwrap();
            header_generated
                .write_own_fields(&header_value, composite.as_mut())
                .unwrap();
            body_generated
                .write_own_fields(&body_value, composite.as_mut())
                .unwrap();
            composite.end_structure(header.descriptor()).unwrap();
        }

        let combined = encoder.into_value().unwrap();
        let fields = combined.as_struct().unwrap();
        assert_eq!(fields.field("id"), Some(&Value::U64(9)));
        assert_eq!(fields.field("text"), Some(&Value::String("hello".into())));
    }
}
