//! Polymorphic serialization for closed hierarchies, as an explicit tagged
//! union.
//!
//! Open, inheritance-driven dispatch is deliberately absent: a hierarchy is
//! closed by enumerating its variants up front, and the encoded form is a
//! two-element structure `{type, value}` where `type` carries the variant tag
//! and `value` the variant's own fields. Decoding requires the tag before the
//! value, the same posture streaming formats take with class discriminators.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use wireform_utils::sync::Arc;

use crate::codec::{
    CodecError, Decoder, ElementIndex, Encoder, decode_structure, encode_structure,
};
use crate::descriptor::{
    DescriptorCell, ElementInfo, PrimitiveKind, SerialDescriptor, SerialKind, StructureKind,
};
use crate::serializer::{GeneratedSerializer, Serializer};
use crate::value::Value;

const TAG_INDEX: usize = 0;
const VALUE_INDEX: usize = 1;

/// Serializer for a sealed hierarchy: a fixed tag-to-variant table.
///
/// Variant serializers are the variants' own generated serializers; encoding
/// delegates to them whole, so each variant controls its own field layout.
pub struct SealedSerializer {
    descriptor: Arc<SerialDescriptor>,
    variants: Box<[(Box<str>, Arc<GeneratedSerializer>)]>,
}

impl SealedSerializer {
    /// Creates the serializer for a closed hierarchy.
    ///
    /// Each `(tag, serializer)` pair maps a wire tag to one variant. Tags are
    /// matched during decode; a variant value is matched during encode by the
    /// type it represents.
    pub fn new(
        serial_name: &str,
        variants: Vec<(Box<str>, Arc<GeneratedSerializer>)>,
    ) -> Self {
        let elements = vec![
            ElementInfo::new(
                "type",
                DescriptorCell::resolved(Arc::new(SerialDescriptor::primitive(
                    "String",
                    PrimitiveKind::Str,
                ))),
                false,
            ),
            // The value element's descriptor depends on the variant; the slot
            // stays deferred.
            ElementInfo::new("value", DescriptorCell::deferred(), false),
        ];
        Self {
            descriptor: Arc::new(SerialDescriptor::new(
                serial_name,
                SerialKind::Structure(StructureKind::Class),
                elements,
            )),
            variants: variants.into_boxed_slice(),
        }
    }

    fn variant_by_tag(&self, tag: &str) -> Result<&Arc<GeneratedSerializer>, CodecError> {
        self.variants
            .iter()
            .find(|(t, _)| &**t == tag)
            .map(|(_, serializer)| serializer)
            .ok_or_else(|| CodecError::UnknownVariant {
                serial_name: self.descriptor.serial_name().into(),
                variant: tag.into(),
            })
    }

    fn variant_by_value(
        &self,
        type_name: &str,
    ) -> Result<(&str, &Arc<GeneratedSerializer>), CodecError> {
        self.variants
            .iter()
            .find(|(_, serializer)| serializer.type_name() == type_name)
            .map(|(tag, serializer)| (&**tag, serializer))
            .ok_or_else(|| CodecError::UnknownVariant {
                serial_name: self.descriptor.serial_name().into(),
                variant: type_name.into(),
            })
    }
}

impl Serializer for SealedSerializer {
    fn descriptor(&self) -> &Arc<SerialDescriptor> {
        &self.descriptor
    }

    fn serialize(&self, encoder: &mut dyn Encoder, value: &Value) -> Result<(), CodecError> {
        let fields = value
            .as_struct()
            .ok_or_else(|| CodecError::mismatch("struct", value))?;
        let type_name = fields.type_name().ok_or_else(|| {
            CodecError::custom("sealed hierarchy value does not name its variant type")
        })?;
        let (tag, variant) = self.variant_by_value(type_name)?;

        encode_structure(encoder, &self.descriptor, |composite| {
            composite.encode_str_element(&self.descriptor, TAG_INDEX, tag)?;
            composite.encode_serializable_element(
                &self.descriptor,
                VALUE_INDEX,
                variant.as_ref(),
                value,
            )
        })
    }

    fn deserialize(&self, decoder: &mut dyn Decoder) -> Result<Value, CodecError> {
        decode_structure(decoder, &self.descriptor, |composite| {
            let mut decoded: Option<Value> = None;
            let mut tag: Option<Box<str>> = None;

            if composite.decode_sequentially() {
                let text = composite.decode_string_element(&self.descriptor, TAG_INDEX)?;
                let variant = self.variant_by_tag(&text)?;
                decoded = Some(composite.decode_serializable_element(
                    &self.descriptor,
                    VALUE_INDEX,
                    variant.as_ref(),
                )?);
                tag = Some(text.into());
            } else {
                loop {
                    match composite.decode_element_index(&self.descriptor)? {
                        ElementIndex::Element(TAG_INDEX) => {
                            let text =
                                composite.decode_string_element(&self.descriptor, TAG_INDEX)?;
                            tag = Some(text.into());
                        }
                        ElementIndex::Element(VALUE_INDEX) => {
                            let Some(tag) = tag.as_deref() else {
                                return Err(CodecError::custom(
                                    "variant value arrived before its type tag",
                                ));
                            };
                            let variant = self.variant_by_tag(tag)?;
                            decoded = Some(composite.decode_serializable_element(
                                &self.descriptor,
                                VALUE_INDEX,
                                variant.as_ref(),
                            )?);
                        }
                        ElementIndex::Element(index) => {
                            return Err(CodecError::InvalidElementIndex {
                                serial_name: self.descriptor.serial_name().into(),
                                index,
                            });
                        }
                        ElementIndex::UnknownName => continue,
                        ElementIndex::Done => break,
                    }
                }
            }

            let mut missing: Vec<Box<str>> = Vec::new();
            if tag.is_none() {
                missing.push("type".into());
            }
            if decoded.is_none() && tag.is_some() {
                missing.push("value".into());
            }
            match decoded {
                Some(value) if missing.is_empty() => Ok(value),
                _ => Err(CodecError::MissingFields {
                    serial_name: self.descriptor.serial_name().into(),
                    fields: missing,
                }),
            }
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::codec::CodecError;
    use crate::codec::tree::{TreeDecoder, TreeEncoder};
    use crate::serializer::{Serializer, SerializerRef, SerializerRegistry};
    use crate::shape::{FieldShape, TypeRef, TypeShape};
    use crate::value::{StructValue, Value};

    fn shape_registry() -> (SerializerRegistry, SerializerRef) {
        let mut registry = SerializerRegistry::new();
        registry
            .register(
                TypeShape::class("demo::Circle")
                    .with_field(FieldShape::parameter("radius", TypeRef::F64)),
            )
            .unwrap();
        registry
            .register(
                TypeShape::class("demo::Square")
                    .with_field(FieldShape::parameter("side", TypeRef::F64)),
            )
            .unwrap();
        let sealed = registry
            .register_sealed(
                "demo::Shape",
                &[("circle", "demo::Circle"), ("square", "demo::Square")],
            )
            .unwrap();
        (registry, sealed)
    }

    fn circle(radius: f64) -> Value {
        Value::Struct(StructValue::of("demo::Circle").with("radius", Value::F64(radius)))
    }

    #[test]
    fn tagged_union_round_trip() {
        let (_, sealed) = shape_registry();
        let value = circle(2.5);

        let mut encoder = TreeEncoder::new();
        sealed.serialize(&mut encoder, &value).unwrap();
        let encoded = encoder.into_value().unwrap();

        let fields = encoded.as_struct().unwrap();
        assert_eq!(fields.field("type"), Some(&Value::String("circle".into())));
        assert!(fields.field("value").unwrap().as_struct().is_some());

        let mut decoder = TreeDecoder::new(encoded);
        assert_eq!(sealed.deserialize(&mut decoder).unwrap(), value);
    }

    #[test]
    fn variants_keep_their_own_layout() {
        let (_, sealed) = shape_registry();
        let value = Value::Struct(StructValue::of("demo::Square").with("side", Value::F64(4.0)));

        let mut encoder = TreeEncoder::new();
        sealed.serialize(&mut encoder, &value).unwrap();
        let encoded = encoder.into_value().unwrap();
        let inner = encoded.as_struct().unwrap().field("value").unwrap();
        assert_eq!(inner.as_struct().unwrap().field("side"), Some(&Value::F64(4.0)));
    }

    #[test]
    fn unknown_variant_type_is_rejected_on_encode() {
        let (_, sealed) = shape_registry();
        let value = Value::Struct(StructValue::of("demo::Triangle").with("base", Value::F64(1.0)));
        let mut encoder = TreeEncoder::new();
        assert!(matches!(
            sealed.serialize(&mut encoder, &value).unwrap_err(),
            CodecError::UnknownVariant { .. },
        ));
    }

    #[test]
    fn unknown_tag_is_rejected_on_decode() {
        let (_, sealed) = shape_registry();
        let encoded = Value::Struct(
            StructValue::new()
                .with("type", Value::from("triangle"))
                .with("value", Value::Struct(StructValue::new())),
        );
        let mut decoder = TreeDecoder::new(encoded);
        match sealed.deserialize(&mut decoder).unwrap_err() {
            CodecError::UnknownVariant { variant, .. } => assert_eq!(&*variant, "triangle"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn value_before_tag_is_rejected() {
        let (_, sealed) = shape_registry();
        let encoded = Value::Struct(
            StructValue::new()
                .with("value", Value::Struct(StructValue::new().with("radius", Value::F64(1.0))))
                .with("type", Value::from("circle")),
        );
        let mut decoder = TreeDecoder::new(encoded);
        assert!(matches!(
            sealed.deserialize(&mut decoder).unwrap_err(),
            CodecError::Custom(_),
        ));
    }

    #[test]
    fn missing_tag_is_reported() {
        let (_, sealed) = shape_registry();
        let mut decoder = TreeDecoder::new(Value::Struct(StructValue::new()));
        match sealed.deserialize(&mut decoder).unwrap_err() {
            CodecError::MissingFields { fields, .. } => {
                assert_eq!(fields, ["type"].map(Into::into).to_vec());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
