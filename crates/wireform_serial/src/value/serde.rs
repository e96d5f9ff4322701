//! Export of [`Value`] trees through the serde data model.
//!
//! Serialization only: structs become maps (field names are not `'static`),
//! enums become their entry identifier string. Inbound traffic goes through
//! this crate's own [`Decoder`](crate::codec::Decoder) protocol instead.

use serde_core::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::value::Value;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::I8(v) => serializer.serialize_i8(*v),
            Value::I16(v) => serializer.serialize_i16(*v),
            Value::I32(v) => serializer.serialize_i32(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::U8(v) => serializer.serialize_u8(*v),
            Value::U16(v) => serializer.serialize_u16(*v),
            Value::U32(v) => serializer.serialize_u32(*v),
            Value::U64(v) => serializer.serialize_u64(*v),
            Value::F32(v) => serializer.serialize_f32(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::Char(v) => serializer.serialize_char(*v),
            Value::String(v) => serializer.serialize_str(v),
            Value::Unit => serializer.serialize_unit(),
            Value::Enum(identifier) => serializer.serialize_str(identifier),
            Value::Struct(value) => {
                let mut map = serializer.serialize_map(Some(value.field_len()))?;
                for (name, field) in value.iter() {
                    map.serialize_entry(name, field)?;
                }
                map.end()
            }
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, entry) in entries {
                    map.serialize_entry(key, entry)?;
                }
                map.end()
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use crate::value::{StructValue, Value};

    #[test]
    fn json_export() {
        let value = Value::Struct(
            StructValue::of("demo::Point")
                .with("x", Value::I32(3))
                .with("y", Value::I32(0)),
        );
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"x":3,"y":0}"#);
    }

    #[test]
    fn json_export_nested() {
        let value = Value::Struct(
            StructValue::of("demo::Tags")
                .with("name", Value::from("point"))
                .with("tags", Value::List(vec![Value::from("a"), Value::Null])),
        );
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"name":"point","tags":["a",null]}"#);
    }

    #[test]
    fn ron_export() {
        let value = Value::List(vec![Value::Bool(true), Value::U8(7)]);
        let text: String = ron::to_string(&value).unwrap();
        assert_eq!(text, "[true,7]");
    }
}
