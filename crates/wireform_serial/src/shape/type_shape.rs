use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::shape::{EntryShape, FieldShape};

// -----------------------------------------------------------------------------
// DeclKind

/// The declaration kind of a [`TypeShape`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    /// An ordinary data class.
    Class,
    /// A singleton object declaration.
    Object,
    /// An enumeration.
    Enum,
}

// -----------------------------------------------------------------------------
// DeclModifiers

/// Declaration-level modifier facts consumed by the static checker.
///
/// These exist so a host layer can faithfully report declaration shapes the
/// serializer synthesis does not support; all of them default to `false`.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct DeclModifiers {
    pub is_abstract: bool,
    pub is_inner: bool,
    pub is_anonymous: bool,
    pub has_companion: bool,
}

// -----------------------------------------------------------------------------
// TypeShape

/// The structural declaration of one type.
///
/// Built with the `with_*` methods; immutable once handed to the registry.
///
/// # Examples
///
/// ```
/// use wireform_serial::shape::{DeclKind, FieldShape, TypeRef, TypeShape};
///
/// let shape = TypeShape::class("demo::Point")
///     .with_field(FieldShape::parameter("x", TypeRef::I32))
///     .with_field(FieldShape::parameter("y", TypeRef::I32));
///
/// assert_eq!(shape.decl(), DeclKind::Class);
/// assert_eq!(shape.constructor_param_count(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TypeShape {
    name: Box<str>,
    decl: DeclKind,
    fields: Vec<FieldShape>,
    entries: Vec<EntryShape>,
    type_params: Vec<Box<str>>,
    supertypes: Vec<Box<str>>,
    modifiers: DeclModifiers,
    // `None` means every constructor parameter is field-backed.
    constructor_param_count: Option<usize>,
}

impl TypeShape {
    fn new(name: impl Into<Box<str>>, decl: DeclKind) -> Self {
        Self {
            name: name.into(),
            decl,
            fields: Vec::new(),
            entries: Vec::new(),
            type_params: Vec::new(),
            supertypes: Vec::new(),
            modifiers: DeclModifiers::default(),
            constructor_param_count: None,
        }
    }

    /// A class declaration. The `name` must be globally distinguishing; it
    /// becomes the serial name.
    pub fn class(name: impl Into<Box<str>>) -> Self {
        Self::new(name, DeclKind::Class)
    }

    /// A singleton object declaration.
    pub fn object(name: impl Into<Box<str>>) -> Self {
        Self::new(name, DeclKind::Object)
    }

    /// An enum declaration.
    pub fn enumeration(name: impl Into<Box<str>>) -> Self {
        Self::new(name, DeclKind::Enum)
    }

    /// Appends a field declaration (class shapes).
    pub fn with_field(mut self, field: FieldShape) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends several field declarations in order.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldShape>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Appends an enum entry (enum shapes).
    pub fn with_entry(mut self, entry: EntryShape) -> Self {
        self.entries.push(entry);
        self
    }

    /// Appends several enum entries in order.
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = EntryShape>) -> Self {
        self.entries.extend(entries);
        self
    }

    /// Declares a type parameter. Declarations with type parameters are
    /// rejected by [`check_shape`](crate::shape::check_shape).
    pub fn with_type_param(mut self, name: impl Into<Box<str>>) -> Self {
        self.type_params.push(name.into());
        self
    }

    /// Declares a supertype. Declarations with supertypes are rejected by
    /// [`check_shape`](crate::shape::check_shape).
    pub fn with_supertype(mut self, name: impl Into<Box<str>>) -> Self {
        self.supertypes.push(name.into());
        self
    }

    /// Sets the declaration modifier facts.
    pub fn with_modifiers(mut self, modifiers: DeclModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Overrides the primary constructor parameter count.
    ///
    /// Only needed when the constructor has parameters that are not
    /// field-backed; such a declaration is not externally serializable.
    pub fn with_constructor_param_count(mut self, count: usize) -> Self {
        self.constructor_param_count = Some(count);
        self
    }

    /// The qualified type name (the serial name).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declaration kind.
    #[inline]
    pub fn decl(&self) -> DeclKind {
        self.decl
    }

    /// The declared fields, in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldShape] {
        &self.fields
    }

    /// The enum entries, in declaration order.
    #[inline]
    pub fn entries(&self) -> &[EntryShape] {
        &self.entries
    }

    /// The declared type parameters.
    #[inline]
    pub fn type_params(&self) -> &[Box<str>] {
        &self.type_params
    }

    /// The declared supertypes.
    #[inline]
    pub fn supertypes(&self) -> &[Box<str>] {
        &self.supertypes
    }

    /// The declaration modifier facts.
    #[inline]
    pub fn modifiers(&self) -> DeclModifiers {
        self.modifiers
    }

    /// The number of primary constructor parameters.
    pub fn constructor_param_count(&self) -> usize {
        self.constructor_param_count.unwrap_or_else(|| {
            self.fields
                .iter()
                .filter(|f| f.is_constructor_parameter())
                .count()
        })
    }
}
