use alloc::format;
use alloc::vec::Vec;

use wireform_utils::sync::Arc;

use crate::descriptor::{DescriptorCell, ElementInfo, SerialDescriptor, SerialKind, StructureKind};
use crate::property::{EnumEntry, SerializableProperties};

/// Builds the class-kinded descriptor shell for a derived property list.
///
/// Element `i` mirrors property `i`; child slots start deferred and are
/// resolved by the registry as child serializers resolve.
pub fn class_descriptor(serial_name: &str, properties: &SerializableProperties) -> SerialDescriptor {
    let elements = properties
        .iter()
        .map(|property| {
            ElementInfo::new(
                property.name(),
                DescriptorCell::deferred(),
                property.is_optional(),
            )
        })
        .collect();
    SerialDescriptor::new(
        serial_name,
        SerialKind::Structure(StructureKind::Class),
        elements,
    )
}

/// Builds an object-kinded descriptor (a singleton; no elements).
pub fn object_descriptor(serial_name: &str) -> SerialDescriptor {
    SerialDescriptor::new(
        serial_name,
        SerialKind::Structure(StructureKind::Object),
        Vec::new(),
    )
}

/// Builds an enum descriptor: one element per entry, named by the entry's
/// wire name, each child an entry-specific object descriptor.
pub fn enum_descriptor(serial_name: &str, entries: &[EnumEntry]) -> SerialDescriptor {
    let elements = entries
        .iter()
        .map(|entry| {
            let child = object_descriptor(&format!("{serial_name}::{}", entry.identifier()));
            ElementInfo::new(
                entry.name(),
                DescriptorCell::resolved(Arc::new(child)),
                false,
            )
        })
        .collect();
    SerialDescriptor::new(serial_name, SerialKind::Enum, elements)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::enum_descriptor;
    use crate::descriptor::{SerialKind, StructureKind};
    use crate::property::derive_entries;
    use crate::shape::{EntryShape, TypeShape};

    #[test]
    fn enum_descriptor_names_follow_declaration_order() {
        let shape = TypeShape::enumeration("demo::Color")
            .with_entry(EntryShape::new("RED"))
            .with_entry(EntryShape::new("GREEN"));
        let entries = derive_entries(&shape).unwrap();

        let descriptor = enum_descriptor("demo::Color", &entries);
        assert_eq!(descriptor.kind(), SerialKind::Enum);
        assert_eq!(descriptor.element_len(), 2);
        assert_eq!(descriptor.element_name(0), Some("RED"));
        assert_eq!(descriptor.element_name(1), Some("GREEN"));

        let child = descriptor.element_descriptor(0).unwrap();
        assert_eq!(child.kind(), SerialKind::Structure(StructureKind::Object));
        assert_eq!(child.serial_name(), "demo::Color::RED");
    }
}
