use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use wireform_utils::sync::Arc;

use crate::descriptor::{DescriptorCell, PrimitiveKind, SerialKind};

// -----------------------------------------------------------------------------
// ElementInfo

/// Information for one element of a structure-kinded descriptor.
#[derive(Debug)]
pub struct ElementInfo {
    name: Box<str>,
    optional: bool,
    descriptor: DescriptorCell,
}

impl ElementInfo {
    /// Creates a new [`ElementInfo`] with the given wire `name`.
    pub fn new(name: impl Into<Box<str>>, descriptor: DescriptorCell, optional: bool) -> Self {
        Self {
            name: name.into(),
            optional,
            descriptor,
        }
    }

    /// The element's wire name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the element may be absent during decode.
    #[inline]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// The child descriptor slot.
    #[inline]
    pub fn descriptor(&self) -> &DescriptorCell {
        &self.descriptor
    }
}

// -----------------------------------------------------------------------------
// SerialDescriptor

/// The self-describing shape of one serializable type.
///
/// A descriptor carries everything a format needs to lay out or navigate the
/// encoded representation: the globally distinguishing serial name, the
/// [`SerialKind`], nullability and inline-ness, and (for structure kinds)
/// the ordered element table.
///
/// Element index assignment is stable: element `i` corresponds to the `i`-th
/// retained property of the property model, so `element_len` equals the
/// number of non-transient properties.
///
/// # Examples
///
/// ```
/// use wireform_serial::shape::{FieldShape, TypeRef, TypeShape};
/// use wireform_serial::serializer::{Serializer, SerializerRegistry};
///
/// let shape = TypeShape::class("demo::Point")
///     .with_field(FieldShape::parameter("x", TypeRef::I32))
///     .with_field(FieldShape::parameter("y", TypeRef::I32));
///
/// let mut registry = SerializerRegistry::new();
/// let serializer = registry.register(shape).unwrap();
/// let descriptor = serializer.descriptor();
///
/// assert_eq!(descriptor.serial_name(), "demo::Point");
/// assert_eq!(descriptor.element_len(), 2);
/// assert_eq!(descriptor.element_index("y"), Some(1));
/// assert_eq!(descriptor.element_descriptor(0).unwrap().serial_name(), "i32");
/// ```
#[derive(Clone, Debug)]
pub struct SerialDescriptor {
    serial_name: Box<str>,
    kind: SerialKind,
    is_nullable: bool,
    is_inline: bool,
    // Shared so that flag-propagating copies (`as_nullable`, `as_inline`)
    // do not duplicate the element table.
    elements: Arc<[ElementInfo]>,
}

impl SerialDescriptor {
    /// Creates a structure- or enum-kinded descriptor with the given element
    /// table.
    pub fn new(serial_name: impl Into<Box<str>>, kind: SerialKind, elements: Vec<ElementInfo>) -> Self {
        Self {
            serial_name: serial_name.into(),
            kind,
            is_nullable: false,
            is_inline: false,
            elements: elements.into(),
        }
    }

    /// Creates a primitive descriptor (no elements).
    pub fn primitive(serial_name: impl Into<Box<str>>, kind: PrimitiveKind) -> Self {
        Self::new(serial_name, SerialKind::Primitive(kind), Vec::new())
    }

    /// A copy of this descriptor describing the nullable form of the type.
    ///
    /// The element table is shared, not duplicated; nullability lives on the
    /// element's child descriptor, never on a wrapper element.
    pub fn as_nullable(&self) -> Self {
        Self {
            is_nullable: true,
            ..self.clone()
        }
    }

    /// A copy of this descriptor flagged as inline, under the wrapper's
    /// serial name.
    pub fn as_inline(&self, serial_name: impl Into<Box<str>>) -> Self {
        Self {
            serial_name: serial_name.into(),
            is_inline: true,
            ..self.clone()
        }
    }

    /// The globally distinguishing serial name.
    #[inline]
    pub fn serial_name(&self) -> &str {
        &self.serial_name
    }

    /// The kind of the described type.
    #[inline]
    pub fn kind(&self) -> SerialKind {
        self.kind
    }

    /// Whether the described type admits null.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.is_nullable
    }

    /// Whether values are represented without their own structural layer.
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.is_inline
    }

    /// The number of elements.
    #[inline]
    pub fn element_len(&self) -> usize {
        self.elements.len()
    }

    /// Returns the [`ElementInfo`] at the given index, if present.
    #[inline]
    pub fn element(&self, index: usize) -> Option<&ElementInfo> {
        self.elements.get(index)
    }

    /// Returns the wire name of the element at the given index, if present.
    pub fn element_name(&self, index: usize) -> Option<&str> {
        self.elements.get(index).map(ElementInfo::name)
    }

    /// Returns the index for the given element wire name, if present.
    ///
    /// This is O(N) complexity.
    pub fn element_index(&self, name: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.name() == name)
    }

    /// Returns the resolved child descriptor at the given index.
    ///
    /// `None` if the index is out of bounds or the child has not been
    /// resolved yet (only observable while the owning type is still being
    /// registered).
    pub fn element_descriptor(&self, index: usize) -> Option<&SerialDescriptor> {
        self.elements.get(index)?.descriptor().get()
    }

    /// Whether the element at the given index may be absent during decode.
    pub fn is_element_optional(&self, index: usize) -> bool {
        self.elements
            .get(index)
            .is_some_and(ElementInfo::is_optional)
    }

    /// Iterates the elements in index order.
    pub fn iter_elements(&self) -> impl ExactSizeIterator<Item = &ElementInfo> {
        self.elements.iter()
    }
}

impl fmt::Display for SerialDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.serial_name, self.kind)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;

    use wireform_utils::sync::Arc;

    use super::{ElementInfo, SerialDescriptor};
    use crate::descriptor::{DescriptorCell, PrimitiveKind, SerialKind, StructureKind};

    fn sample() -> SerialDescriptor {
        let child = Arc::new(SerialDescriptor::primitive("i32", PrimitiveKind::I32));
        SerialDescriptor::new(
            "demo::Sample",
            SerialKind::Structure(StructureKind::Class),
            vec![
                ElementInfo::new("a", DescriptorCell::resolved(child.clone()), false),
                ElementInfo::new("b", DescriptorCell::resolved(child), true),
            ],
        )
    }

    #[test]
    fn element_lookup() {
        let descriptor = sample();
        assert_eq!(descriptor.element_len(), 2);
        assert_eq!(descriptor.element_name(0), Some("a"));
        assert_eq!(descriptor.element_index("b"), Some(1));
        assert_eq!(descriptor.element_index("c"), None);
        assert!(descriptor.is_element_optional(1));
        assert!(!descriptor.is_element_optional(0));
    }

    #[test]
    fn nullable_copy_shares_elements() {
        let descriptor = sample();
        let nullable = descriptor.as_nullable();

        assert!(nullable.is_nullable());
        assert!(!descriptor.is_nullable());
        assert_eq!(nullable.element_len(), descriptor.element_len());
        assert_eq!(nullable.serial_name(), descriptor.serial_name());
    }

    #[test]
    fn deferred_cell_resolves_once() {
        let cell = DescriptorCell::deferred();
        assert!(!cell.is_resolved());

        let first = Arc::new(SerialDescriptor::primitive("bool", PrimitiveKind::Bool));
        let second = Arc::new(SerialDescriptor::primitive("i64", PrimitiveKind::I64));
        assert!(cell.resolve(first));
        assert!(!cell.resolve(second));
        assert_eq!(cell.get().unwrap().serial_name(), "bool");
    }
}
