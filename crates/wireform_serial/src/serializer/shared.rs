use core::fmt;

use wireform_utils::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::serializer::{RegistryError, SerializerRef, SerializerRegistry};
use crate::shape::TypeShape;

/// A clonable, thread-safe handle around a [`SerializerRegistry`].
///
/// Reads are concurrent; registration takes the write lock, which also
/// guarantees first access to any one type computes its serializer exactly
/// once (later callers find the cached entry). Recomputation would be
/// harmless, only wasted work; the lock removes even that.
#[derive(Clone, Default)]
pub struct SharedRegistry {
    /// The wrapped [`SerializerRegistry`].
    pub internal: Arc<RwLock<SerializerRegistry>>,
}

impl SharedRegistry {
    /// Creates a shared handle over an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a read lock on the underlying [`SerializerRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, SerializerRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`SerializerRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, SerializerRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a shape, or returns the already-computed serializer.
    pub fn get_or_register(&self, shape: TypeShape) -> Result<SerializerRef, RegistryError> {
        self.write().register(shape)
    }

    /// Returns the serializer for a type name, synthesizing it on first
    /// request.
    pub fn serializer_for(&self, name: &str) -> Result<SerializerRef, RegistryError> {
        self.write().serializer_for(name)
    }
}

impl fmt::Debug for SharedRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.read(), f)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use wireform_utils::sync::Arc;

    use super::SharedRegistry;
    use crate::shape::{FieldShape, TypeRef, TypeShape};

    fn shape() -> TypeShape {
        TypeShape::class("demo::Shared").with_field(FieldShape::parameter("id", TypeRef::U64))
    }

    #[test]
    fn concurrent_first_access_yields_one_serializer() {
        let registry = SharedRegistry::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || registry.get_or_register(shape()).unwrap())
            })
            .collect();

        let serializers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for pair in serializers.windows(2) {
            assert!(Arc::ptr_eq(&pair[0], &pair[1]));
        }
    }
}
