use core::fmt;

use wireform_utils::sync::{Arc, OnceLock};

use crate::descriptor::SerialDescriptor;

/// A write-once slot holding one element's child descriptor.
///
/// Non-recursive children are stored [`resolved`](DescriptorCell::resolved)
/// at construction time. A child that refers back to a type still being
/// registered starts [`deferred`](DescriptorCell::deferred) and is resolved
/// by the registry right after the referenced descriptor exists, so lookups
/// through a fully registered type never observe an empty slot.
pub struct DescriptorCell(OnceLock<Arc<SerialDescriptor>>);

impl DescriptorCell {
    /// Creates an empty cell, to be resolved later.
    #[inline]
    #[must_use]
    pub const fn deferred() -> Self {
        Self(OnceLock::new())
    }

    /// Creates an already-resolved cell.
    pub fn resolved(descriptor: Arc<SerialDescriptor>) -> Self {
        let cell = OnceLock::new();
        // A fresh lock cannot already hold a value.
        let _ = cell.set(descriptor);
        Self(cell)
    }

    /// Resolves the cell. Returns `false` if it was already resolved (the
    /// first resolution wins).
    pub fn resolve(&self, descriptor: Arc<SerialDescriptor>) -> bool {
        self.0.set(descriptor).is_ok()
    }

    /// The resolved descriptor, if any.
    #[inline]
    pub fn get(&self) -> Option<&SerialDescriptor> {
        self.0.get().map(Arc::as_ref)
    }

    /// The resolved descriptor as a shared handle, if any.
    #[inline]
    pub fn get_arc(&self) -> Option<&Arc<SerialDescriptor>> {
        self.0.get()
    }

    /// Whether the cell has been resolved.
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.0.get().is_some()
    }
}

impl fmt::Debug for DescriptorCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(descriptor) => write!(f, "DescriptorCell({})", descriptor.serial_name()),
            None => f.write_str("DescriptorCell(<deferred>)"),
        }
    }
}
