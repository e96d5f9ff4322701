use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::value::Value;

/// A dynamic struct: ordered fields keyed by source identifier.
///
/// Field order is insertion order and participates in equality; decoded
/// structs always restore declaration order regardless of the order fields
/// arrived in.
///
/// # Examples
///
/// ```
/// use wireform_serial::value::{StructValue, Value};
///
/// let mut point = StructValue::of("demo::Point");
/// point.insert("x", Value::I32(3));
/// point.insert("y", Value::I32(4));
///
/// assert_eq!(point.field_len(), 2);
/// assert_eq!(point.field("y"), Some(&Value::I32(4)));
/// assert!(point.represents("demo::Point"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StructValue {
    type_name: Option<Box<str>>,
    fields: Vec<(Box<str>, Value)>,
}

impl StructValue {
    /// Creates an empty struct with no represented type.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty struct representing the named type.
    pub fn of(type_name: impl Into<Box<str>>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            fields: Vec::new(),
        }
    }

    /// Creates an empty struct with preallocated field capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            type_name: None,
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<Box<str>>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a field, replacing any existing field with the same name.
    pub fn insert(&mut self, name: impl Into<Box<str>>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Returns the field with the given name, if present.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| &**n == name)
            .map(|(_, v)| v)
    }

    /// Returns the field at the given index, if present.
    pub fn field_at(&self, index: usize) -> Option<&Value> {
        self.fields.get(index).map(|(_, v)| v)
    }

    /// The number of fields.
    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    /// Iterates the fields in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (&**n, v))
    }

    /// Consumes the struct, returning its fields in insertion order.
    pub fn into_fields(self) -> Vec<(Box<str>, Value)> {
        self.fields
    }

    /// The represented type name, if set.
    #[inline]
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Whether this struct represents the named type.
    pub fn represents(&self, type_name: &str) -> bool {
        self.type_name.as_deref() == Some(type_name)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::StructValue;
    use crate::value::Value;

    #[test]
    fn insert_replaces_by_name() {
        let mut value = StructValue::new();
        value.insert("a", Value::I32(1));
        value.insert("a", Value::I32(2));

        assert_eq!(value.field_len(), 1);
        assert_eq!(value.field("a"), Some(&Value::I32(2)));
    }

    #[test]
    fn field_order_participates_in_equality() {
        let ab = StructValue::new().with("a", 1_i32).with("b", 2_i32);
        let ba = StructValue::new().with("b", 2_i32).with("a", 1_i32);
        assert_ne!(ab, ba);
    }
}
