//! Wrapper serializers: nullable values and inline unwrapping.

use wireform_utils::sync::Arc;

use crate::codec::{CodecError, Decoder, Encoder};
use crate::descriptor::SerialDescriptor;
use crate::serializer::{GeneratedSerializer, Serializer, SerializerRef};
use crate::value::{StructValue, Value};

// -----------------------------------------------------------------------------
// NullableSerializer

/// Makes any serializer nullability-aware.
///
/// Its descriptor is the inner descriptor with the nullable flag set (shared
/// element table, no wrapper element). Null handling therefore stays inside
/// this serializer: dispatch helpers and composite encoders delegate to it
/// directly instead of emitting their own null marks.
pub struct NullableSerializer {
    descriptor: Arc<SerialDescriptor>,
    inner: SerializerRef,
}

impl NullableSerializer {
    /// Wraps `inner`, producing the serializer for its nullable form.
    pub fn new(inner: SerializerRef) -> Self {
        Self {
            descriptor: Arc::new(inner.descriptor().as_nullable()),
            inner,
        }
    }
}

impl Serializer for NullableSerializer {
    fn descriptor(&self) -> &Arc<SerialDescriptor> {
        &self.descriptor
    }

    fn serialize(&self, encoder: &mut dyn Encoder, value: &Value) -> Result<(), CodecError> {
        if value.is_null() {
            encoder.encode_null()
        } else {
            encoder.encode_not_null_mark()?;
            self.inner.serialize(encoder, value)
        }
    }

    fn deserialize(&self, decoder: &mut dyn Decoder) -> Result<Value, CodecError> {
        if decoder.decode_not_null_mark()? {
            self.inner.deserialize(decoder)
        } else {
            decoder.decode_null()?;
            Ok(Value::Null)
        }
    }
}

// -----------------------------------------------------------------------------
// InlineSerializer

/// Unwraps a single-property wrapper class: the inner field's value is
/// encoded directly, without the wrapper's structural layer.
///
/// The descriptor is the inner value's descriptor flagged inline, under the
/// wrapper's serial name.
pub struct InlineSerializer {
    descriptor: Arc<SerialDescriptor>,
    wrapper: Arc<GeneratedSerializer>,
}

impl InlineSerializer {
    /// Wraps the generated serializer of a single-property class.
    ///
    /// Returns `None` if the wrapped type does not have exactly one property
    /// (the registry maps that to a resolution error).
    pub fn new(wrapper: Arc<GeneratedSerializer>) -> Option<Self> {
        if wrapper.properties().len() != 1 {
            return None;
        }
        let inner_descriptor = wrapper.descriptor().element_descriptor(0)?;
        Some(Self {
            descriptor: Arc::new(inner_descriptor.as_inline(wrapper.type_name())),
            wrapper,
        })
    }

    fn inner_serializer(&self) -> Result<&SerializerRef, CodecError> {
        self.wrapper.child(0)
    }
}

impl Serializer for InlineSerializer {
    fn descriptor(&self) -> &Arc<SerialDescriptor> {
        &self.descriptor
    }

    fn serialize(&self, encoder: &mut dyn Encoder, value: &Value) -> Result<(), CodecError> {
        let fields = value
            .as_struct()
            .ok_or_else(|| CodecError::mismatch("struct", value))?;
        let property = self
            .wrapper
            .properties()
            .get(0)
            .ok_or_else(|| CodecError::custom("inline wrapper lost its property"))?;
        let inner = fields
            .field(property.original_identifier())
            .ok_or(CodecError::MissingFields {
                serial_name: self.descriptor.serial_name().into(),
                fields: alloc::vec![property.name().into()],
            })?;
        self.inner_serializer()?.serialize(encoder, inner)
    }

    fn deserialize(&self, decoder: &mut dyn Decoder) -> Result<Value, CodecError> {
        let inner = self.inner_serializer()?.deserialize(decoder)?;
        let property = self
            .wrapper
            .properties()
            .get(0)
            .ok_or_else(|| CodecError::custom("inline wrapper lost its property"))?;
        let mut out = StructValue::of(self.wrapper.type_name());
        out.insert(property.original_identifier(), inner);
        Ok(Value::Struct(out))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::codec::tree::{TreeDecoder, TreeEncoder};
    use crate::codec::{decode_nullable_serializable_value, encode_nullable_serializable_value};
    use crate::serializer::{Serializer, SerializerRegistry};
    use crate::shape::{FieldShape, TypeRef, TypeShape};
    use crate::value::{StructValue, Value};

    #[test]
    fn nullable_wrapper_handles_both_cases() {
        let mut registry = SerializerRegistry::new();
        let serializer = registry
            .resolve(&TypeRef::nullable(TypeRef::I32))
            .unwrap();
        assert!(serializer.descriptor().is_nullable());

        for value in [Value::Null, Value::I32(11)] {
            let mut encoder = TreeEncoder::new();
            serializer.serialize(&mut encoder, &value).unwrap();
            let mut decoder = TreeDecoder::new(encoder.into_value().unwrap());
            assert_eq!(serializer.deserialize(&mut decoder).unwrap(), value);
        }
    }

    #[test]
    fn dispatch_helpers_wrap_non_nullable_serializers() {
        let mut registry = SerializerRegistry::new();
        let plain = registry.resolve(&TypeRef::I32).unwrap();

        let mut encoder = TreeEncoder::new();
        encode_nullable_serializable_value(&mut encoder, plain.as_ref(), &Value::Null).unwrap();
        let mut decoder = TreeDecoder::new(encoder.into_value().unwrap());
        assert_eq!(
            decode_nullable_serializable_value(&mut decoder, plain.as_ref()).unwrap(),
            Value::Null,
        );
    }

    #[test]
    fn inline_field_unwraps_its_structural_layer() {
        let mut registry = SerializerRegistry::new();
        registry
            .register(
                TypeShape::class("demo::Meters")
                    .with_field(FieldShape::parameter("value", TypeRef::F64)),
            )
            .unwrap();
        let serializer = registry
            .register(TypeShape::class("demo::Trip").with_field(
                FieldShape::parameter("distance", TypeRef::named("demo::Meters")).mark_inline(),
            ))
            .unwrap();

        let trip = Value::Struct(StructValue::of("demo::Trip").with(
            "distance",
            Value::Struct(StructValue::of("demo::Meters").with("value", Value::F64(12.5))),
        ));

        let mut encoder = TreeEncoder::new();
        serializer.serialize(&mut encoder, &trip).unwrap();
        let encoded = encoder.into_value().unwrap();
        // No nested `{value: ...}` layer on the wire.
        assert_eq!(
            encoded.as_struct().unwrap().field("distance"),
            Some(&Value::F64(12.5)),
        );

        let mut decoder = TreeDecoder::new(encoded);
        assert_eq!(serializer.deserialize(&mut decoder).unwrap(), trip);
    }

    #[test]
    fn inline_descriptor_carries_the_flag() {
        let mut registry = SerializerRegistry::new();
        registry
            .register(
                TypeShape::class("demo::Meters")
                    .with_field(FieldShape::parameter("value", TypeRef::F64)),
            )
            .unwrap();
        let serializer = registry
            .register(TypeShape::class("demo::Trip").with_field(
                FieldShape::parameter("distance", TypeRef::named("demo::Meters")).mark_inline(),
            ))
            .unwrap();

        let element = serializer.descriptor().element_descriptor(0).unwrap();
        assert!(element.is_inline());
        assert_eq!(element.serial_name(), "demo::Meters");
    }

    #[test]
    fn inline_requires_a_single_property_class() {
        let mut registry = SerializerRegistry::new();
        registry
            .register(
                TypeShape::class("demo::Pair2")
                    .with_field(FieldShape::parameter("a", TypeRef::F64))
                    .with_field(FieldShape::parameter("b", TypeRef::F64)),
            )
            .unwrap();
        let err = registry
            .register(TypeShape::class("demo::Bad").with_field(
                FieldShape::parameter("inner", TypeRef::named("demo::Pair2")).mark_inline(),
            ))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            crate::serializer::RegistryError::Resolve(
                crate::serializer::ResolveError::InlineUnsupported { .. },
            ),
        ));
    }
}
