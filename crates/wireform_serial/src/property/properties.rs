use alloc::boxed::Box;
use alloc::vec::Vec;

use wireform_utils::hash::HashSet;

use crate::property::DeriveError;
use crate::shape::{DeclKind, TypeRef, TypeShape};
use crate::value::Value;

// -----------------------------------------------------------------------------
// SerializableProperty

/// One serializable field of a declared type, after derivation.
///
/// Transient fields never appear here; what remains is exactly the set of
/// elements of the type's descriptor, in the same order.
#[derive(Clone, Debug, PartialEq)]
pub struct SerializableProperty {
    name: Box<str>,
    original_identifier: Box<str>,
    ty: TypeRef,
    optional: bool,
    inline: bool,
    constructor_parameter: bool,
    default: Option<Value>,
}

impl SerializableProperty {
    /// The wire name used in the encoded representation.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source-level identifier, used when the wire name is overridden.
    #[inline]
    pub fn original_identifier(&self) -> &str {
        &self.original_identifier
    }

    /// The declared value type.
    #[inline]
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Whether the field may be absent during decode, falling back to its
    /// declared default.
    #[inline]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the field's value is encoded without its own structural layer.
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    /// Whether the field is backed by a primary constructor parameter.
    #[inline]
    pub fn is_constructor_parameter(&self) -> bool {
        self.constructor_parameter
    }

    /// The declared default value, if any.
    #[inline]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

// -----------------------------------------------------------------------------
// SerializableProperties

/// The canonical, ordered property list of one declared type.
///
/// Constructor-backed properties come first (in parameter order), then
/// standalone properties (in declaration order).
#[derive(Clone, Debug)]
pub struct SerializableProperties {
    properties: Box<[SerializableProperty]>,
    constructor_len: usize,
    externally_serializable: bool,
}

impl SerializableProperties {
    /// The number of retained properties.
    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no properties were retained.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Returns the property at `index`, if present.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&SerializableProperty> {
        self.properties.get(index)
    }

    /// Iterates the properties in canonical order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &SerializableProperty> {
        self.properties.iter()
    }

    /// The constructor-backed prefix of the canonical order.
    #[inline]
    pub fn constructor_properties(&self) -> &[SerializableProperty] {
        &self.properties[..self.constructor_len]
    }

    /// The standalone suffix of the canonical order.
    #[inline]
    pub fn standalone_properties(&self) -> &[SerializableProperty] {
        &self.properties[self.constructor_len..]
    }

    /// Returns the index for the given wire name, if present.
    ///
    /// This is O(N) complexity.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| &*p.name == name)
    }

    /// Whether an instance can be rebuilt from the outside: every primary
    /// constructor parameter corresponds to exactly one retained property.
    #[inline]
    pub fn is_externally_serializable(&self) -> bool {
        self.externally_serializable
    }
}

// -----------------------------------------------------------------------------
// derivation

/// Derives the canonical property list of a class shape.
///
/// Wire-name resolution, per field: an explicit override wins; otherwise a
/// constructor-backed field uses its source identifier; otherwise the field
/// is transient. Computed fields (no storage) are always transient.
///
/// A field is optional iff it is not marked required and declares a default.
///
/// # Examples
///
/// ```
/// use wireform_serial::property::derive_properties;
/// use wireform_serial::shape::{FieldShape, TypeRef, TypeShape};
/// use wireform_serial::value::Value;
///
/// let shape = TypeShape::class("demo::Point")
///     .with_field(FieldShape::parameter("x", TypeRef::I32))
///     .with_field(FieldShape::parameter("y", TypeRef::I32).with_default(Value::I32(0)));
///
/// let properties = derive_properties(&shape).unwrap();
/// assert_eq!(properties.len(), 2);
/// assert!(!properties.get(0).unwrap().is_optional());
/// assert!(properties.get(1).unwrap().is_optional());
/// ```
pub fn derive_properties(shape: &TypeShape) -> Result<SerializableProperties, DeriveError> {
    let mut from_constructor = Vec::new();
    let mut standalone = Vec::new();

    for field in shape.fields() {
        let wire_name = match field.wire_name() {
            Some(name) => name,
            None if field.is_constructor_parameter() => field.identifier(),
            None => continue,
        };
        if !field.has_storage() {
            continue;
        }

        let property = SerializableProperty {
            name: wire_name.into(),
            original_identifier: field.identifier().into(),
            ty: field.ty().clone(),
            optional: !field.is_required() && field.default().is_some(),
            inline: field.is_inline(),
            constructor_parameter: field.is_constructor_parameter(),
            default: field.default().cloned(),
        };
        if field.is_constructor_parameter() {
            from_constructor.push(property);
        } else {
            standalone.push(property);
        }
    }

    let constructor_len = from_constructor.len();
    let externally_serializable =
        shape.decl() == DeclKind::Enum || constructor_len == shape.constructor_param_count();

    let mut properties = from_constructor;
    properties.append(&mut standalone);

    {
        let mut names: HashSet<&str> = HashSet::default();
        for property in &properties {
            if !names.insert(property.name()) {
                return Err(DeriveError::DuplicatePropertyName {
                    type_name: shape.name().into(),
                    name: property.name().into(),
                });
            }
        }
    }

    Ok(SerializableProperties {
        properties: properties.into_boxed_slice(),
        constructor_len,
        externally_serializable,
    })
}

// -----------------------------------------------------------------------------
// enum entries

/// One enum entry, after derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumEntry {
    identifier: Box<str>,
    name: Box<str>,
}

impl EnumEntry {
    /// The source-level identifier.
    #[inline]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The wire name used in the encoded representation.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Derives the entry list of an enum shape.
///
/// Entry wire names resolve like property wire names (override, else
/// identifier). Among duplicates the first occurrence keeps the name; the
/// derivation fails identifying both entries.
pub fn derive_entries(shape: &TypeShape) -> Result<Box<[EnumEntry]>, DeriveError> {
    let mut entries = Vec::with_capacity(shape.entries().len());
    let mut first_by_name: wireform_utils::hash::HashMap<&str, &str> = Default::default();

    for entry in shape.entries() {
        let name = entry.wire_name().unwrap_or_else(|| entry.identifier());
        if let Some(first) = first_by_name.get(name) {
            return Err(DeriveError::DuplicateEnumEntryName {
                type_name: shape.name().into(),
                name: name.into(),
                first_entry: (*first).into(),
                second_entry: entry.identifier().into(),
            });
        }
        first_by_name.insert(name, entry.identifier());
        entries.push(EnumEntry {
            identifier: entry.identifier().into(),
            name: name.into(),
        });
    }

    Ok(entries.into_boxed_slice())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{derive_entries, derive_properties};
    use crate::property::DeriveError;
    use crate::shape::{EntryShape, FieldShape, TypeRef, TypeShape};
    use crate::value::Value;

    fn wire_names(shape: &TypeShape) -> alloc::vec::Vec<alloc::boxed::Box<str>> {
        derive_properties(shape)
            .unwrap()
            .iter()
            .map(|p| p.name().into())
            .collect()
    }

    #[test]
    fn constructor_properties_come_first() {
        let shape = TypeShape::class("demo::Mixed")
            .with_field(FieldShape::standalone("note", TypeRef::String).with_wire_name("note"))
            .with_field(FieldShape::parameter("id", TypeRef::I64))
            .with_field(FieldShape::parameter("label", TypeRef::String));

        assert_eq!(wire_names(&shape), ["id", "label", "note"].map(Into::into));
    }

    #[test]
    fn wire_name_override_keeps_identifier() {
        let shape = TypeShape::class("demo::Renamed")
            .with_field(FieldShape::parameter("snake_case", TypeRef::I32).with_wire_name("snakeCase"));

        let properties = derive_properties(&shape).unwrap();
        let property = properties.get(0).unwrap();
        assert_eq!(property.name(), "snakeCase");
        assert_eq!(property.original_identifier(), "snake_case");
    }

    #[test]
    fn unannotated_standalone_field_is_transient() {
        let shape = TypeShape::class("demo::Cache")
            .with_field(FieldShape::parameter("id", TypeRef::I64))
            .with_field(FieldShape::standalone("cached", TypeRef::Bool));

        assert_eq!(wire_names(&shape), ["id"].map(Into::into));
    }

    #[test]
    fn computed_field_is_transient() {
        let shape = TypeShape::class("demo::Area")
            .with_field(FieldShape::parameter("w", TypeRef::F64))
            .with_field(
                FieldShape::standalone("area", TypeRef::F64)
                    .with_wire_name("area")
                    .computed(),
            );

        assert_eq!(wire_names(&shape), ["w"].map(Into::into));
    }

    #[test]
    fn required_overrides_default() {
        let shape = TypeShape::class("demo::Strict").with_field(
            FieldShape::parameter("mode", TypeRef::I32)
                .with_default(Value::I32(1))
                .mark_required(),
        );

        let properties = derive_properties(&shape).unwrap();
        assert!(!properties.get(0).unwrap().is_optional());
    }

    #[test]
    fn default_without_required_is_optional() {
        let shape = TypeShape::class("demo::Lax")
            .with_field(FieldShape::parameter("mode", TypeRef::I32).with_default(Value::I32(1)));

        let properties = derive_properties(&shape).unwrap();
        assert!(properties.get(0).unwrap().is_optional());
        assert_eq!(properties.get(0).unwrap().default(), Some(&Value::I32(1)));
    }

    #[test]
    fn duplicate_wire_names_fail() {
        let shape = TypeShape::class("demo::Clash")
            .with_field(FieldShape::parameter("a", TypeRef::I32).with_wire_name("field"))
            .with_field(FieldShape::parameter("b", TypeRef::I32).with_wire_name("field"));

        match derive_properties(&shape).unwrap_err() {
            DeriveError::DuplicatePropertyName { type_name, name } => {
                assert_eq!(&*type_name, "demo::Clash");
                assert_eq!(&*name, "field");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn dropped_constructor_parameter_blocks_external_serialization() {
        let shape = TypeShape::class("demo::Partial")
            .with_field(FieldShape::parameter("kept", TypeRef::I32))
            .with_constructor_param_count(2);

        let properties = derive_properties(&shape).unwrap();
        assert!(!properties.is_externally_serializable());

        let full = TypeShape::class("demo::Full").with_field(FieldShape::parameter("kept", TypeRef::I32));
        assert!(derive_properties(&full).unwrap().is_externally_serializable());
    }

    #[test]
    fn enum_entries_resolve_in_declaration_order() {
        let shape = TypeShape::enumeration("demo::Color")
            .with_entry(EntryShape::new("RED"))
            .with_entry(EntryShape::new("GREEN").with_wire_name("green"));

        let entries = derive_entries(&shape).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name(), "RED");
        assert_eq!(entries[1].name(), "green");
        assert_eq!(entries[1].identifier(), "GREEN");
    }

    #[test]
    fn duplicate_enum_entry_names_identify_both_entries() {
        let shape = TypeShape::enumeration("demo::Color")
            .with_entry(EntryShape::new("RED"))
            .with_entry(EntryShape::new("ROUGE").with_wire_name("RED"));

        match derive_entries(&shape).unwrap_err() {
            DeriveError::DuplicateEnumEntryName {
                name,
                first_entry,
                second_entry,
                ..
            } => {
                assert_eq!(&*name, "RED");
                assert_eq!(&*first_entry, "RED");
                assert_eq!(&*second_entry, "ROUGE");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
