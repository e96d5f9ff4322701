//! Serializers for primitive and other well-known standard-library types.
//!
//! Each primitive serializer pairs a fixed singleton descriptor with the
//! matching `encode_*`/`decode_*` protocol methods and a strict value-kind
//! check on the way in.

use alloc::vec;

use wireform_utils::sync::{Arc, OnceLock};

use crate::codec::{
    CodecError, Decoder, ElementIndex, Encoder, decode_structure, encode_structure,
};
use crate::descriptor::{
    DescriptorCell, ElementInfo, PrimitiveKind, SerialDescriptor, SerialKind, StructureKind,
};
use crate::serializer::Serializer;
use crate::value::{StructValue, Value};

// -----------------------------------------------------------------------------
// primitives

macro_rules! primitive_serializer {
    ($(#[$doc:meta] $name:ident: $serial:literal, $kind:ident, $variant:ident($ty:ty), $encode:ident, $decode:ident;)*) => {
        $(
            #[$doc]
            pub struct $name;

            impl $name {
                fn descriptor_cell() -> &'static Arc<SerialDescriptor> {
                    static DESCRIPTOR: OnceLock<Arc<SerialDescriptor>> = OnceLock::new();
                    DESCRIPTOR.get_or_init(|| {
                        Arc::new(SerialDescriptor::primitive($serial, PrimitiveKind::$kind))
                    })
                }
            }

            impl Serializer for $name {
                fn descriptor(&self) -> &Arc<SerialDescriptor> {
                    Self::descriptor_cell()
                }

                fn serialize(
                    &self,
                    encoder: &mut dyn Encoder,
                    value: &Value,
                ) -> Result<(), CodecError> {
                    match value {
                        Value::$variant(value) => encoder.$encode(*value),
                        other => Err(CodecError::mismatch($serial, other)),
                    }
                }

                fn deserialize(&self, decoder: &mut dyn Decoder) -> Result<Value, CodecError> {
                    decoder.$decode().map(Value::$variant)
                }
            }
        )*
    };
}

primitive_serializer! {
    /// The built-in serializer for `bool`.
    BoolSerializer: "bool", Bool, Bool(bool), encode_bool, decode_bool;
    /// The built-in serializer for `i8`.
    I8Serializer: "i8", I8, I8(i8), encode_i8, decode_i8;
    /// The built-in serializer for `i16`.
    I16Serializer: "i16", I16, I16(i16), encode_i16, decode_i16;
    /// The built-in serializer for `i32`.
    I32Serializer: "i32", I32, I32(i32), encode_i32, decode_i32;
    /// The built-in serializer for `i64`.
    I64Serializer: "i64", I64, I64(i64), encode_i64, decode_i64;
    /// The built-in serializer for `u8`.
    U8Serializer: "u8", U8, U8(u8), encode_u8, decode_u8;
    /// The built-in serializer for `u16`.
    U16Serializer: "u16", U16, U16(u16), encode_u16, decode_u16;
    /// The built-in serializer for `u32`.
    U32Serializer: "u32", U32, U32(u32), encode_u32, decode_u32;
    /// The built-in serializer for `u64`.
    U64Serializer: "u64", U64, U64(u64), encode_u64, decode_u64;
    /// The built-in serializer for `f32`.
    F32Serializer: "f32", F32, F32(f32), encode_f32, decode_f32;
    /// The built-in serializer for `f64`.
    F64Serializer: "f64", F64, F64(f64), encode_f64, decode_f64;
    /// The built-in serializer for `char`.
    CharSerializer: "char", Char, Char(char), encode_char, decode_char;
}

// -----------------------------------------------------------------------------
// String

/// The built-in serializer for strings.
pub struct StringSerializer;

impl StringSerializer {
    fn descriptor_cell() -> &'static Arc<SerialDescriptor> {
        static DESCRIPTOR: OnceLock<Arc<SerialDescriptor>> = OnceLock::new();
        DESCRIPTOR
            .get_or_init(|| Arc::new(SerialDescriptor::primitive("String", PrimitiveKind::Str)))
    }
}

impl Serializer for StringSerializer {
    fn descriptor(&self) -> &Arc<SerialDescriptor> {
        Self::descriptor_cell()
    }

    fn serialize(&self, encoder: &mut dyn Encoder, value: &Value) -> Result<(), CodecError> {
        match value {
            Value::String(value) => encoder.encode_str(value),
            other => Err(CodecError::mismatch("string", other)),
        }
    }

    fn deserialize(&self, decoder: &mut dyn Decoder) -> Result<Value, CodecError> {
        decoder.decode_string().map(Value::String)
    }
}

// -----------------------------------------------------------------------------
// Unit

/// The built-in serializer for the unit type: an empty singleton structure.
pub struct UnitSerializer;

impl UnitSerializer {
    fn descriptor_cell() -> &'static Arc<SerialDescriptor> {
        static DESCRIPTOR: OnceLock<Arc<SerialDescriptor>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            Arc::new(SerialDescriptor::new(
                "()",
                SerialKind::Structure(StructureKind::Object),
                vec![],
            ))
        })
    }
}

impl Serializer for UnitSerializer {
    fn descriptor(&self) -> &Arc<SerialDescriptor> {
        Self::descriptor_cell()
    }

    fn serialize(&self, encoder: &mut dyn Encoder, value: &Value) -> Result<(), CodecError> {
        match value {
            Value::Unit => encode_structure(encoder, self.descriptor(), |_| Ok(())),
            other => Err(CodecError::mismatch("unit", other)),
        }
    }

    fn deserialize(&self, decoder: &mut dyn Decoder) -> Result<Value, CodecError> {
        decode_structure(decoder, self.descriptor(), |composite| {
            if !composite.decode_sequentially() {
                loop {
                    match composite.decode_element_index(self.descriptor())? {
                        ElementIndex::Done => break,
                        ElementIndex::UnknownName => continue,
                        ElementIndex::Element(index) => {
                            return Err(CodecError::InvalidElementIndex {
                                serial_name: self.descriptor().serial_name().into(),
                                index,
                            });
                        }
                    }
                }
            }
            Ok(Value::Unit)
        })
    }
}

// -----------------------------------------------------------------------------
// Duration

/// The built-in serializer for `core::time::Duration`, encoded as
/// `{secs: u64, nanos: u32}`.
pub struct DurationSerializer;

impl DurationSerializer {
    fn descriptor_cell() -> &'static Arc<SerialDescriptor> {
        static DESCRIPTOR: OnceLock<Arc<SerialDescriptor>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            Arc::new(SerialDescriptor::new(
                "core::time::Duration",
                SerialKind::Structure(StructureKind::Class),
                vec![
                    ElementInfo::new(
                        "secs",
                        DescriptorCell::resolved(U64Serializer::descriptor_cell().clone()),
                        false,
                    ),
                    ElementInfo::new(
                        "nanos",
                        DescriptorCell::resolved(U32Serializer::descriptor_cell().clone()),
                        false,
                    ),
                ],
            ))
        })
    }

    fn field_u64(value: &StructValue, name: &str) -> Result<u64, CodecError> {
        match value.field(name) {
            Some(Value::U64(v)) => Ok(*v),
            Some(other) => Err(CodecError::mismatch("u64", other)),
            None => Err(CodecError::custom("duration value is missing a field")),
        }
    }
}

impl Serializer for DurationSerializer {
    fn descriptor(&self) -> &Arc<SerialDescriptor> {
        Self::descriptor_cell()
    }

    fn serialize(&self, encoder: &mut dyn Encoder, value: &Value) -> Result<(), CodecError> {
        let value = value
            .as_struct()
            .ok_or_else(|| CodecError::mismatch("struct", value))?;
        let secs = Self::field_u64(value, "secs")?;
        let nanos = match value.field("nanos") {
            Some(Value::U32(v)) => *v,
            Some(other) => return Err(CodecError::mismatch("u32", other)),
            None => return Err(CodecError::custom("duration value is missing a field")),
        };
        let descriptor = self.descriptor();
        encode_structure(encoder, descriptor, |composite| {
            composite.encode_u64_element(descriptor, 0, secs)?;
            composite.encode_u32_element(descriptor, 1, nanos)
        })
    }

    fn deserialize(&self, decoder: &mut dyn Decoder) -> Result<Value, CodecError> {
        let descriptor = self.descriptor();
        decode_structure(decoder, descriptor, |composite| {
            let mut secs = None;
            let mut nanos = None;
            if composite.decode_sequentially() {
                secs = Some(composite.decode_u64_element(descriptor, 0)?);
                nanos = Some(composite.decode_u32_element(descriptor, 1)?);
            } else {
                loop {
                    match composite.decode_element_index(descriptor)? {
                        ElementIndex::Element(0) => {
                            secs = Some(composite.decode_u64_element(descriptor, 0)?);
                        }
                        ElementIndex::Element(1) => {
                            nanos = Some(composite.decode_u32_element(descriptor, 1)?);
                        }
                        ElementIndex::Element(index) => {
                            return Err(CodecError::InvalidElementIndex {
                                serial_name: descriptor.serial_name().into(),
                                index,
                            });
                        }
                        ElementIndex::UnknownName => continue,
                        ElementIndex::Done => break,
                    }
                }
            }
            collect_required(
                descriptor,
                [("secs", secs.is_some()), ("nanos", nanos.is_some())],
            )?;
            let mut out = StructValue::of(descriptor.serial_name());
            out.insert("secs", Value::U64(secs.unwrap_or_default()));
            out.insert("nanos", Value::U32(nanos.unwrap_or_default()));
            Ok(Value::Struct(out))
        })
    }
}

// Reports every absent required field at once.
pub(crate) fn collect_required<const N: usize>(
    descriptor: &SerialDescriptor,
    fields: [(&str, bool); N],
) -> Result<(), CodecError> {
    let missing: alloc::vec::Vec<_> = fields
        .iter()
        .filter(|(_, seen)| !seen)
        .map(|(name, _)| (*name).into())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CodecError::MissingFields {
            serial_name: descriptor.serial_name().into(),
            fields: missing,
        })
    }
}

// -----------------------------------------------------------------------------
// Uuid

/// The built-in serializer for UUID strings (hyphenated form).
pub struct UuidSerializer;

impl UuidSerializer {
    fn descriptor_cell() -> &'static Arc<SerialDescriptor> {
        static DESCRIPTOR: OnceLock<Arc<SerialDescriptor>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            Arc::new(SerialDescriptor::primitive("uuid::Uuid", PrimitiveKind::Str))
        })
    }

    fn validate(text: &str) -> Result<(), CodecError> {
        let bytes = text.as_bytes();
        let well_formed = bytes.len() == 36
            && bytes.iter().enumerate().all(|(i, b)| match i {
                8 | 13 | 18 | 23 => *b == b'-',
                _ => b.is_ascii_hexdigit(),
            });
        if well_formed {
            Ok(())
        } else {
            Err(CodecError::custom("malformed uuid string"))
        }
    }
}

impl Serializer for UuidSerializer {
    fn descriptor(&self) -> &Arc<SerialDescriptor> {
        Self::descriptor_cell()
    }

    fn serialize(&self, encoder: &mut dyn Encoder, value: &Value) -> Result<(), CodecError> {
        match value {
            Value::String(text) => {
                Self::validate(text)?;
                encoder.encode_str(text)
            }
            other => Err(CodecError::mismatch("string", other)),
        }
    }

    fn deserialize(&self, decoder: &mut dyn Decoder) -> Result<Value, CodecError> {
        let text = decoder.decode_string()?;
        Self::validate(&text)?;
        Ok(Value::String(text))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{DurationSerializer, I32Serializer, UuidSerializer};
    use crate::codec::CodecError;
    use crate::codec::tree::{TreeDecoder, TreeEncoder};
    use crate::serializer::Serializer;
    use crate::value::{StructValue, Value};

    fn round_trip(serializer: &dyn Serializer, value: &Value) -> Value {
        let mut encoder = TreeEncoder::new();
        serializer.serialize(&mut encoder, value).unwrap();
        let mut decoder = TreeDecoder::new(encoder.into_value().unwrap());
        serializer.deserialize(&mut decoder).unwrap()
    }

    #[test]
    fn primitive_round_trip() {
        assert_eq!(round_trip(&I32Serializer, &Value::I32(-5)), Value::I32(-5));
    }

    #[test]
    fn primitive_rejects_wrong_kind() {
        let mut encoder = TreeEncoder::new();
        let err = I32Serializer
            .serialize(&mut encoder, &Value::Bool(true))
            .unwrap_err();
        assert!(matches!(err, CodecError::ValueMismatch { .. }));
    }

    #[test]
    fn duration_round_trip() {
        let duration = Value::Struct(
            StructValue::of("core::time::Duration")
                .with("secs", Value::U64(12))
                .with("nanos", Value::U32(500)),
        );
        assert_eq!(round_trip(&DurationSerializer, &duration), duration);
    }

    #[test]
    fn uuid_rejects_malformed_text() {
        let mut encoder = TreeEncoder::new();
        let err = UuidSerializer
            .serialize(&mut encoder, &Value::from("not-a-uuid"))
            .unwrap_err();
        assert!(matches!(err, CodecError::Custom(_)));

        let ok = Value::from("67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert_eq!(round_trip(&UuidSerializer, &ok), ok);
    }
}
