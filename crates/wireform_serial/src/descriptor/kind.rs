use core::fmt;

// -----------------------------------------------------------------------------
// PrimitiveKind

/// The primitive kinds a descriptor can describe.
///
/// Each kind corresponds to one `encode_*`/`decode_*` method pair of the
/// codec protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
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
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.pad("Bool"),
            Self::I8 => f.pad("I8"),
            Self::I16 => f.pad("I16"),
            Self::I32 => f.pad("I32"),
            Self::I64 => f.pad("I64"),
            Self::U8 => f.pad("U8"),
            Self::U16 => f.pad("U16"),
            Self::U32 => f.pad("U32"),
            Self::U64 => f.pad("U64"),
            Self::F32 => f.pad("F32"),
            Self::F64 => f.pad("F64"),
            Self::Char => f.pad("Char"),
            Self::Str => f.pad("Str"),
        }
    }
}

// -----------------------------------------------------------------------------
// StructureKind

/// The structure kinds a descriptor can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    /// An ordinary keyed structure with a fixed element list.
    Class,
    /// A positional collection; element indexes are positions.
    List,
    /// A keyed collection; element indexes alternate between keys and values.
    Map,
    /// A singleton with no elements.
    Object,
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => f.pad("Class"),
            Self::List => f.pad("List"),
            Self::Map => f.pad("Map"),
            Self::Object => f.pad("Object"),
        }
    }
}

// -----------------------------------------------------------------------------
// SerialKind

/// The kind of a serializable type: a fast discriminator a format can branch
/// on without inspecting elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerialKind {
    Primitive(PrimitiveKind),
    Enum,
    Structure(StructureKind),
}

impl SerialKind {
    /// Whether this kind is a primitive.
    #[inline]
    pub const fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    /// Whether this kind is an enum.
    #[inline]
    pub const fn is_enum(&self) -> bool {
        matches!(self, Self::Enum)
    }

    /// Whether this kind is a structure.
    #[inline]
    pub const fn is_structure(&self) -> bool {
        matches!(self, Self::Structure(_))
    }

    /// The primitive kind, if this is one.
    #[inline]
    pub const fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for SerialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => kind.fmt(f),
            Self::Enum => f.pad("Enum"),
            Self::Structure(kind) => kind.fmt(f),
        }
    }
}
