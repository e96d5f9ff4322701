use alloc::boxed::Box;

use crate::shape::TypeRef;
use crate::value::Value;

// -----------------------------------------------------------------------------
// FieldShape

/// One declared field of a class shape.
///
/// The two constructors mirror where a field is declared: as a primary
/// constructor [`parameter`](FieldShape::parameter), or as a
/// [`standalone`](FieldShape::standalone) body property. Constructor-backed
/// fields precede standalone ones in the canonical serial order.
///
/// Whether a field declares a default is an explicit fact here: a field with
/// `default: Some(..)` declares one, and the stored value doubles as the
/// decode-time fallback. A field initialized from a constructor parameter
/// inherits that parameter's default (or absence of one).
#[derive(Clone, Debug, PartialEq)]
pub struct FieldShape {
    identifier: Box<str>,
    ty: TypeRef,
    wire_name: Option<Box<str>>,
    required: bool,
    inline: bool,
    constructor_parameter: bool,
    has_storage: bool,
    default: Option<Value>,
}

impl FieldShape {
    /// A field backed by a primary constructor parameter.
    pub fn parameter(identifier: impl Into<Box<str>>, ty: TypeRef) -> Self {
        Self {
            identifier: identifier.into(),
            ty,
            wire_name: None,
            required: false,
            inline: false,
            constructor_parameter: true,
            has_storage: true,
            default: None,
        }
    }

    /// A body-declared (standalone) field.
    ///
    /// Standalone fields need an explicit [wire name](Self::with_wire_name) to
    /// be serialized; without one they are transient.
    pub fn standalone(identifier: impl Into<Box<str>>, ty: TypeRef) -> Self {
        Self {
            constructor_parameter: false,
            ..Self::parameter(identifier, ty)
        }
    }

    /// Overrides the wire name used in the encoded representation.
    pub fn with_wire_name(mut self, name: impl Into<Box<str>>) -> Self {
        self.wire_name = Some(name.into());
        self
    }

    /// Declares a default value. The field becomes optional unless it is also
    /// [marked required](Self::mark_required).
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Marks the field as required even though it declares a default.
    pub fn mark_required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the field's value as inline: encoded without its own structural
    /// layer.
    pub fn mark_inline(mut self) -> Self {
        self.inline = true;
        self
    }

    /// Marks the field as computed: it has no storage of its own and is never
    /// serialized.
    pub fn computed(mut self) -> Self {
        self.has_storage = false;
        self
    }

    /// The source-level identifier.
    #[inline]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The declared value type.
    #[inline]
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// The explicit wire-name override, if any.
    #[inline]
    pub fn wire_name(&self) -> Option<&str> {
        self.wire_name.as_deref()
    }

    /// Whether the field was explicitly marked required.
    #[inline]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the field's value is encoded inline.
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    /// Whether the field is backed by a primary constructor parameter.
    #[inline]
    pub fn is_constructor_parameter(&self) -> bool {
        self.constructor_parameter
    }

    /// Whether the field has storage (computed fields do not).
    #[inline]
    pub fn has_storage(&self) -> bool {
        self.has_storage
    }

    /// The declared default value, if any.
    #[inline]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

// -----------------------------------------------------------------------------
// EntryShape

/// One entry of an enum shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryShape {
    identifier: Box<str>,
    wire_name: Option<Box<str>>,
}

impl EntryShape {
    /// Creates an entry named after its source identifier.
    pub fn new(identifier: impl Into<Box<str>>) -> Self {
        Self {
            identifier: identifier.into(),
            wire_name: None,
        }
    }

    /// Overrides the wire name used in the encoded representation.
    pub fn with_wire_name(mut self, name: impl Into<Box<str>>) -> Self {
        self.wire_name = Some(name.into());
        self
    }

    /// The source-level identifier.
    #[inline]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The explicit wire-name override, if any.
    #[inline]
    pub fn wire_name(&self) -> Option<&str> {
        self.wire_name.as_deref()
    }
}
