//! The serializer registry: the central store mapping type names to their
//! serializers.
//!
//! Registration is memoized (a serializer is computed once per type and
//! shared), recursion-safe (a shape's shell is inserted before its children
//! resolve, so self-referential and mutually recursive types find it), and
//! transactional (a setup failure removes every entry the failing
//! registration inserted; no partial serializer survives).

use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;
use core::fmt;

use wireform_utils::hash::HashMap;
use wireform_utils::sync::Arc;

use crate::property::{derive_entries, derive_properties};
use crate::serializer::builtins::{
    BoolSerializer, CharSerializer, DurationSerializer, F32Serializer, F64Serializer,
    I8Serializer, I16Serializer, I32Serializer, I64Serializer, StringSerializer, U8Serializer,
    U16Serializer, U32Serializer, U64Serializer, UnitSerializer, UuidSerializer,
};
use crate::serializer::{
    ArraySerializer, EnumSerializer, GeneratedSerializer, InlineSerializer, ListSerializer,
    MapSerializer, NullableSerializer, PairSerializer, RegistryError, ResolveError,
    SealedSerializer, SerializerRef, TripleSerializer,
};
use crate::shape::{DeclKind, TypeRef, TypeShape, check_shape};

// -----------------------------------------------------------------------------
// standard names

// The default codec registry: well-known standard-library type names with
// built-in serializers. Consulted before registered shapes, so user shapes
// cannot shadow these names.
#[derive(Clone, Copy)]
enum Standard {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
    Str,
    Unit,
    List,
    Set,
    Map,
    Duration,
    Uuid,
}

fn standard_name(name: &str) -> Option<Standard> {
    Some(match name {
        "bool" => Standard::Bool,
        "i8" => Standard::I8,
        "i16" => Standard::I16,
        "i32" => Standard::I32,
        "i64" => Standard::I64,
        "u8" => Standard::U8,
        "u16" => Standard::U16,
        "u32" => Standard::U32,
        "u64" => Standard::U64,
        "f32" => Standard::F32,
        "f64" => Standard::F64,
        "char" => Standard::Char,
        "str" | "String" | "alloc::string::String" | "std::string::String" => Standard::Str,
        "()" => Standard::Unit,
        "Vec" | "alloc::vec::Vec" | "std::vec::Vec" | "VecDeque"
        | "alloc::collections::VecDeque" | "std::collections::VecDeque" => Standard::List,
        "HashSet" | "std::collections::HashSet" | "BTreeSet" | "alloc::collections::BTreeSet"
        | "std::collections::BTreeSet" => Standard::Set,
        "HashMap" | "std::collections::HashMap" | "BTreeMap" | "alloc::collections::BTreeMap"
        | "std::collections::BTreeMap" => Standard::Map,
        "Duration" | "core::time::Duration" | "std::time::Duration" => Standard::Duration,
        "Uuid" | "uuid::Uuid" => Standard::Uuid,
        _ => return None,
    })
}

// -----------------------------------------------------------------------------
// SerializerRegistry

/// The central store for shapes and their synthesized serializers.
///
/// Serializers are built lazily on first request and cached: for any type
/// there is exactly one serializer instance, shared by every caller. Lookups
/// after a successful registration never recompute.
///
/// # Examples
///
/// ```
/// use wireform_serial::shape::{FieldShape, TypeRef, TypeShape};
/// use wireform_serial::serializer::SerializerRegistry;
/// use wireform_utils::sync::Arc;
///
/// let mut registry = SerializerRegistry::new();
/// let shape = TypeShape::class("demo::Id")
///     .with_field(FieldShape::parameter("id", TypeRef::U64));
///
/// let first = registry.register(shape).unwrap();
/// let second = registry.serializer_for("demo::Id").unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
pub struct SerializerRegistry {
    shapes: HashMap<Box<str>, TypeShape>,
    serializers: HashMap<Box<str>, SerializerRef>,
    generated: HashMap<Box<str>, Arc<GeneratedSerializer>>,
}

impl Default for SerializerRegistry {
    /// See [`SerializerRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SerializerRegistry {
    /// Creates an empty registry. Built-in serializers are materialized on
    /// first use.
    pub fn new() -> Self {
        Self {
            shapes: HashMap::default(),
            serializers: HashMap::default(),
            generated: HashMap::default(),
        }
    }

    /// Registers a shape and synthesizes its serializer.
    ///
    /// If a serializer for the shape's name already exists, it is returned
    /// unchanged (a type is computed once; re-registration does not replace
    /// it). On failure every entry inserted by this registration is removed.
    pub fn register(&mut self, shape: TypeShape) -> Result<SerializerRef, RegistryError> {
        let name: Box<str> = shape.name().into();
        if standard_name(&name).is_some() {
            return Err(crate::property::DeriveError::ReservedTypeName { type_name: name }.into());
        }
        if let Some(existing) = self.serializers.get(&*name) {
            return Ok(existing.clone());
        }
        self.shapes.insert(name.clone(), shape);

        let mut inserted = Vec::new();
        let result = self.build_named(&name, &mut inserted);
        if result.is_err() {
            self.rollback(&inserted);
        }
        result
    }

    /// Registers a closed hierarchy as a tagged union over previously
    /// registered (or registrable) class shapes.
    ///
    /// `variants` maps each wire tag to the variant's shape name.
    pub fn register_sealed(
        &mut self,
        serial_name: &str,
        variants: &[(&str, &str)],
    ) -> Result<SerializerRef, RegistryError> {
        if standard_name(serial_name).is_some() {
            return Err(crate::property::DeriveError::ReservedTypeName {
                type_name: serial_name.into(),
            }
            .into());
        }
        if let Some(existing) = self.serializers.get(serial_name) {
            return Ok(existing.clone());
        }

        let mut inserted = Vec::new();
        let mut build = || -> Result<SerializerRef, RegistryError> {
            let mut table = Vec::with_capacity(variants.len());
            for (tag, shape_name) in variants {
                self.build_named(shape_name, &mut inserted)?;
                let generated = self.generated.get(*shape_name).cloned().ok_or_else(|| {
                    ResolveError::NoSerializerFound {
                        type_name: (*shape_name).into(),
                    }
                })?;
                table.push(((*tag).into(), generated));
            }
            let serializer: SerializerRef = Arc::new(SealedSerializer::new(serial_name, table));
            self.serializers
                .insert(serial_name.into(), serializer.clone());
            inserted.push(serial_name.into());
            Ok(serializer)
        };
        let result = build();
        if result.is_err() {
            self.rollback(&inserted);
        }
        result
    }

    /// Returns the serializer for a type name: a built-in, or a registered
    /// shape (synthesized on first request).
    pub fn serializer_for(&mut self, name: &str) -> Result<SerializerRef, RegistryError> {
        self.resolve(&TypeRef::named(name))
    }

    /// Returns the descriptor for a type name.
    pub fn descriptor_for(
        &mut self,
        name: &str,
    ) -> Result<Arc<crate::descriptor::SerialDescriptor>, RegistryError> {
        Ok(self.serializer_for(name)?.descriptor().clone())
    }

    /// Resolves any type reference to its serializer, following the fixed
    /// resolution order: type parameters are rejected, arrays wrap their
    /// element serializer, well-known standard-library names map to
    /// built-ins, and named shapes use their registered (enum or generated)
    /// serializer.
    pub fn resolve(&mut self, ty: &TypeRef) -> Result<SerializerRef, RegistryError> {
        let mut inserted = Vec::new();
        let result = self.resolve_inner(ty, &mut inserted);
        if result.is_err() {
            self.rollback(&inserted);
        }
        result
    }

    /// The generated serializer for a registered class shape, if one has
    /// been synthesized. Useful for callers that need the own-fields
    /// capability rather than the erased [`SerializerRef`].
    pub fn generated_for(&self, name: &str) -> Option<Arc<GeneratedSerializer>> {
        self.generated.get(name).cloned()
    }

    /// Whether a serializer (or at least a shape) is present for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.serializers.contains_key(name) || self.shapes.contains_key(name)
    }

    fn rollback(&mut self, inserted: &[Box<str>]) {
        for name in inserted {
            self.serializers.remove(name);
            self.generated.remove(name);
        }
    }

    // Builds (or fetches) the serializer for a registered shape name. The
    // shell is cached before children resolve so recursive references see it.
    fn build_named(
        &mut self,
        name: &str,
        inserted: &mut Vec<Box<str>>,
    ) -> Result<SerializerRef, RegistryError> {
        if let Some(existing) = self.serializers.get(name) {
            return Ok(existing.clone());
        }
        let shape = match self.shapes.get(name) {
            Some(shape) => shape.clone(),
            None => {
                return Err(ResolveError::NoSerializerFound {
                    type_name: name.into(),
                }
                .into());
            }
        };

        match shape.decl() {
            DeclKind::Enum => {
                let entries = derive_entries(&shape)?;
                let serializer: SerializerRef = Arc::new(EnumSerializer::new(name, entries));
                self.serializers.insert(name.into(), serializer.clone());
                inserted.push(name.into());
                Ok(serializer)
            }
            DeclKind::Class | DeclKind::Object => {
                check_shape(&shape)?;
                let properties = derive_properties(&shape)?;
                let generated = Arc::new(GeneratedSerializer::shell(name, properties));
                let serializer: SerializerRef = generated.clone();
                self.serializers.insert(name.into(), serializer.clone());
                self.generated.insert(name.into(), generated.clone());
                inserted.push(name.into());

                for index in 0..generated.properties().len() {
                    let (ty, inline) = {
                        let property = generated
                            .properties()
                            .get(index)
                            .ok_or_else(|| ResolveError::NoSerializerFound {
                                type_name: name.into(),
                            })?;
                        (property.ty().clone(), property.is_inline())
                    };
                    let child = if inline {
                        self.resolve_inline(&ty, inserted)?
                    } else {
                        self.resolve_inner(&ty, inserted)?
                    };
                    generated.resolve_child(index, child);
                }
                Ok(serializer)
            }
        }
    }

    // Inline fields must name a registered single-property class; the child
    // serializer is the unwrapping form of that class's serializer.
    fn resolve_inline(
        &mut self,
        ty: &TypeRef,
        inserted: &mut Vec<Box<str>>,
    ) -> Result<SerializerRef, RegistryError> {
        let unsupported = || ResolveError::InlineUnsupported {
            type_name: format!("{ty}").into(),
        };
        let TypeRef::Named { name, args } = ty else {
            return Err(unsupported().into());
        };
        if !args.is_empty() || standard_name(name).is_some() {
            return Err(unsupported().into());
        }
        self.build_named(name, inserted)?;
        let generated = self
            .generated
            .get(&**name)
            .cloned()
            .ok_or_else(|| unsupported())?;
        let inline = InlineSerializer::new(generated).ok_or_else(unsupported)?;
        Ok(Arc::new(inline))
    }

    fn resolve_inner(
        &mut self,
        ty: &TypeRef,
        inserted: &mut Vec<Box<str>>,
    ) -> Result<SerializerRef, RegistryError> {
        let key: Box<str> = format!("{ty}").into();
        if let Some(existing) = self.serializers.get(&*key) {
            return Ok(existing.clone());
        }

        // User shapes memoize under their own name inside `build_named`.
        if let TypeRef::Named { name, args } = ty
            && standard_name(name).is_none()
        {
            if !args.is_empty() {
                return Err(ResolveError::NoSerializerFound { type_name: key }.into());
            }
            return self.build_named(name, inserted);
        }

        let serializer = self.construct(ty, &key, inserted)?;
        self.serializers.insert(key.clone(), serializer.clone());
        inserted.push(key);
        Ok(serializer)
    }

    fn construct(
        &mut self,
        ty: &TypeRef,
        key: &str,
        inserted: &mut Vec<Box<str>>,
    ) -> Result<SerializerRef, RegistryError> {
        Ok(match ty {
            TypeRef::Param(index) => {
                return Err(ResolveError::TypeParameterUnsupported { index: *index }.into());
            }
            TypeRef::Array(element) => {
                if element.contains_param() {
                    return Err(ResolveError::GenericArrayElementUnsupported {
                        type_name: key.into(),
                    }
                    .into());
                }
                Arc::new(ArraySerializer::new(self.resolve_inner(element, inserted)?))
            }
            TypeRef::Bool => Arc::new(BoolSerializer),
            TypeRef::I8 => Arc::new(I8Serializer),
            TypeRef::I16 => Arc::new(I16Serializer),
            TypeRef::I32 => Arc::new(I32Serializer),
            TypeRef::I64 => Arc::new(I64Serializer),
            TypeRef::U8 => Arc::new(U8Serializer),
            TypeRef::U16 => Arc::new(U16Serializer),
            TypeRef::U32 => Arc::new(U32Serializer),
            TypeRef::U64 => Arc::new(U64Serializer),
            TypeRef::F32 => Arc::new(F32Serializer),
            TypeRef::F64 => Arc::new(F64Serializer),
            TypeRef::Char => Arc::new(CharSerializer),
            TypeRef::String => Arc::new(StringSerializer),
            TypeRef::Unit => Arc::new(UnitSerializer),
            TypeRef::List(element) => Arc::new(ListSerializer::new(
                "Vec",
                self.resolve_inner(element, inserted)?,
            )),
            TypeRef::Set(element) => Arc::new(ListSerializer::new(
                "HashSet",
                self.resolve_inner(element, inserted)?,
            )),
            TypeRef::Map(key_ty, value_ty) => Arc::new(MapSerializer::new(
                "HashMap",
                self.resolve_inner(key_ty, inserted)?,
                self.resolve_inner(value_ty, inserted)?,
            )),
            TypeRef::Tuple(items) => match items.as_slice() {
                [first, second] => Arc::new(PairSerializer::new(
                    self.resolve_inner(first, inserted)?,
                    self.resolve_inner(second, inserted)?,
                )),
                [first, second, third] => Arc::new(TripleSerializer::new(
                    self.resolve_inner(first, inserted)?,
                    self.resolve_inner(second, inserted)?,
                    self.resolve_inner(third, inserted)?,
                )),
                _ => {
                    return Err(ResolveError::TupleArityUnsupported { arity: items.len() }.into());
                }
            },
            TypeRef::Nullable(inner) => Arc::new(NullableSerializer::new(
                self.resolve_inner(inner, inserted)?,
            )),
            TypeRef::Named { name, args } => self.construct_standard(name, args, key, inserted)?,
        })
    }

    fn construct_standard(
        &mut self,
        name: &str,
        args: &[TypeRef],
        key: &str,
        inserted: &mut Vec<Box<str>>,
    ) -> Result<SerializerRef, RegistryError> {
        let not_found = || -> RegistryError {
            ResolveError::NoSerializerFound {
                type_name: key.into(),
            }
            .into()
        };
        let standard = standard_name(name).ok_or_else(not_found)?;
        Ok(match (standard, args) {
            (Standard::Bool, []) => Arc::new(BoolSerializer),
            (Standard::I8, []) => Arc::new(I8Serializer),
            (Standard::I16, []) => Arc::new(I16Serializer),
            (Standard::I32, []) => Arc::new(I32Serializer),
            (Standard::I64, []) => Arc::new(I64Serializer),
            (Standard::U8, []) => Arc::new(U8Serializer),
            (Standard::U16, []) => Arc::new(U16Serializer),
            (Standard::U32, []) => Arc::new(U32Serializer),
            (Standard::U64, []) => Arc::new(U64Serializer),
            (Standard::F32, []) => Arc::new(F32Serializer),
            (Standard::F64, []) => Arc::new(F64Serializer),
            (Standard::Char, []) => Arc::new(CharSerializer),
            (Standard::Str, []) => Arc::new(StringSerializer),
            (Standard::Unit, []) => Arc::new(UnitSerializer),
            (Standard::Duration, []) => Arc::new(DurationSerializer),
            (Standard::Uuid, []) => Arc::new(UuidSerializer),
            (Standard::List, [element]) => Arc::new(ListSerializer::new(
                "Vec",
                self.resolve_inner(element, inserted)?,
            )),
            (Standard::Set, [element]) => Arc::new(ListSerializer::new(
                "HashSet",
                self.resolve_inner(element, inserted)?,
            )),
            (Standard::Map, [key_ty, value_ty]) => Arc::new(MapSerializer::new(
                "HashMap",
                self.resolve_inner(key_ty, inserted)?,
                self.resolve_inner(value_ty, inserted)?,
            )),
            _ => return Err(not_found()),
        })
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.serializers.keys()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use wireform_utils::sync::Arc;

    use super::SerializerRegistry;
    use crate::property::DeriveError;
    use crate::serializer::{RegistryError, ResolveError};
    use crate::shape::{FieldShape, TypeRef, TypeShape};

    fn point_shape() -> TypeShape {
        TypeShape::class("demo::Point")
            .with_field(FieldShape::parameter("x", TypeRef::I32))
            .with_field(FieldShape::parameter("y", TypeRef::I32))
    }

    #[test]
    fn registration_is_memoized() {
        let mut registry = SerializerRegistry::new();
        let first = registry.register(point_shape()).unwrap();
        let again = registry.register(point_shape()).unwrap();
        let looked_up = registry.serializer_for("demo::Point").unwrap();

        assert!(Arc::ptr_eq(&first, &again));
        assert!(Arc::ptr_eq(&first, &looked_up));
    }

    #[test]
    fn builtin_resolution_is_memoized() {
        let mut registry = SerializerRegistry::new();
        let first = registry.resolve(&TypeRef::list(TypeRef::I32)).unwrap();
        let second = registry.resolve(&TypeRef::list(TypeRef::I32)).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.descriptor().serial_name(), "Vec");
    }

    #[test]
    fn named_builtin_aliases() {
        let mut registry = SerializerRegistry::new();
        let by_alias = registry.serializer_for("std::string::String").unwrap();
        assert_eq!(by_alias.descriptor().serial_name(), "String");

        let duration = registry.serializer_for("std::time::Duration").unwrap();
        assert_eq!(duration.descriptor().serial_name(), "core::time::Duration");

        let vec = registry
            .resolve(&TypeRef::named_with("Vec", alloc::vec![TypeRef::U8]))
            .unwrap();
        assert_eq!(vec.descriptor().serial_name(), "Vec");
    }

    #[test]
    fn unknown_type_is_a_resolution_error() {
        let mut registry = SerializerRegistry::new();
        let err = registry.serializer_for("demo::Missing").err().unwrap();
        assert!(matches!(
            err,
            RegistryError::Resolve(ResolveError::NoSerializerFound { .. }),
        ));
    }

    #[test]
    fn reserved_names_cannot_be_registered() {
        let mut registry = SerializerRegistry::new();
        let err = registry.register(TypeShape::class("bool")).err().unwrap();
        assert!(matches!(
            err,
            RegistryError::Derive(DeriveError::ReservedTypeName { .. }),
        ));
    }

    #[test]
    fn recursive_shape_resolves_through_its_own_shell() {
        let mut registry = SerializerRegistry::new();
        let node = TypeShape::class("demo::Node")
            .with_field(FieldShape::parameter("value", TypeRef::I32))
            .with_field(FieldShape::parameter(
                "next",
                TypeRef::nullable(TypeRef::named("demo::Node")),
            ));

        let serializer = registry.register(node).unwrap();
        let descriptor = serializer.descriptor();
        let next = descriptor.element_descriptor(1).unwrap();
        assert!(next.is_nullable());
        assert_eq!(next.serial_name(), "demo::Node");
        assert_eq!(next.element_len(), descriptor.element_len());
    }

    #[test]
    fn mutually_recursive_shapes_resolve() {
        let mut registry = SerializerRegistry::new();
        registry
            .register(
                TypeShape::class("demo::Forest").with_field(FieldShape::parameter(
                    "trees",
                    TypeRef::list(TypeRef::named("demo::Tree")),
                )),
            )
            .err()
            .unwrap();

        // `demo::Tree` was unknown: the failed registration keeps its shape
        // but leaves no serializer behind.
        assert!(registry.serializer_for("demo::Forest").is_err());

        // Registering the missing half completes the cycle for both.
        let tree = registry
            .register(
                TypeShape::class("demo::Tree").with_field(FieldShape::parameter(
                    "children",
                    TypeRef::named("demo::Forest"),
                )),
            )
            .unwrap();
        assert_eq!(tree.descriptor().element_len(), 1);

        let forest = registry.serializer_for("demo::Forest").unwrap();
        let trees = forest.descriptor().element_descriptor(0).unwrap();
        assert_eq!(trees.serial_name(), "Vec");
        assert_eq!(
            trees.element_descriptor(0).unwrap().serial_name(),
            "demo::Tree",
        );
    }

    #[test]
    fn failed_registration_rolls_back_serializers() {
        let mut registry = SerializerRegistry::new();
        let broken = TypeShape::class("demo::Broken").with_field(FieldShape::parameter(
            "inner",
            TypeRef::named("demo::AlsoMissing"),
        ));
        assert!(registry.register(broken).is_err());
        assert!(registry.serializer_for("demo::Broken").is_err());

        // The memoized builtin cache is unaffected by rollbacks.
        assert!(registry.resolve(&TypeRef::Bool).is_ok());
    }

    #[test]
    fn type_parameter_references_are_rejected() {
        let mut registry = SerializerRegistry::new();
        let err = registry.resolve(&TypeRef::Param(0)).err().unwrap();
        assert!(matches!(
            err,
            RegistryError::Resolve(ResolveError::TypeParameterUnsupported { index: 0 }),
        ));

        let err = registry
            .resolve(&TypeRef::array(TypeRef::Param(1)))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            RegistryError::Resolve(ResolveError::GenericArrayElementUnsupported { .. }),
        ));
    }
}
