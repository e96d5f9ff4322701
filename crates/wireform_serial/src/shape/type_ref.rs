use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

/// A reference to a field's declared value type.
///
/// Primitive and collection shapes are structural; everything else is a
/// [`Named`](TypeRef::Named) reference resolved through the serializer
/// registry (well-known standard-library names first, then registered
/// shapes).
///
/// # Examples
///
/// ```
/// use wireform_serial::shape::TypeRef;
///
/// let ty = TypeRef::list(TypeRef::nullable(TypeRef::named("demo::Point")));
/// assert_eq!(ty.to_string(), "Vec<Option<demo::Point>>");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
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
    String,
    Unit,
    /// A list-like collection (`Vec` and friends).
    List(Box<TypeRef>),
    /// A set-like collection. Encoded exactly like a list.
    Set(Box<TypeRef>),
    /// A map-like collection with alternating key/value element slots.
    Map(Box<TypeRef>, Box<TypeRef>),
    /// A fixed-arity product type. Arities 2 and 3 have built-in serializers.
    Tuple(Vec<TypeRef>),
    /// A reference array; encoded like a list through the array wrapper.
    Array(Box<TypeRef>),
    /// An optional value (`Option<T>` / `T?`).
    Nullable(Box<TypeRef>),
    /// A named type: either a well-known standard-library name or a
    /// registered shape.
    Named { name: Box<str>, args: Vec<TypeRef> },
    /// A type parameter of the enclosing declaration, by position.
    Param(usize),
}

impl TypeRef {
    /// A named reference without type arguments.
    pub fn named(name: impl Into<Box<str>>) -> Self {
        Self::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A named reference with type arguments.
    pub fn named_with(name: impl Into<Box<str>>, args: Vec<TypeRef>) -> Self {
        Self::Named {
            name: name.into(),
            args,
        }
    }

    /// Shorthand for [`TypeRef::List`].
    pub fn list(element: TypeRef) -> Self {
        Self::List(Box::new(element))
    }

    /// Shorthand for [`TypeRef::Set`].
    pub fn set(element: TypeRef) -> Self {
        Self::Set(Box::new(element))
    }

    /// Shorthand for [`TypeRef::Map`].
    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// Shorthand for [`TypeRef::Array`].
    pub fn array(element: TypeRef) -> Self {
        Self::Array(Box::new(element))
    }

    /// Shorthand for [`TypeRef::Nullable`].
    pub fn nullable(inner: TypeRef) -> Self {
        Self::Nullable(Box::new(inner))
    }

    /// Whether this reference is a declaration type parameter.
    #[inline]
    pub const fn is_param(&self) -> bool {
        matches!(self, Self::Param(_))
    }

    /// Whether a type parameter occurs anywhere inside this reference.
    pub fn contains_param(&self) -> bool {
        match self {
            Self::Param(_) => true,
            Self::List(t) | Self::Set(t) | Self::Array(t) | Self::Nullable(t) => t.contains_param(),
            Self::Map(k, v) => k.contains_param() || v.contains_param(),
            Self::Tuple(items) => items.iter().any(TypeRef::contains_param),
            Self::Named { args, .. } => args.iter().any(TypeRef::contains_param),
            _ => false,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::I8 => f.write_str("i8"),
            Self::I16 => f.write_str("i16"),
            Self::I32 => f.write_str("i32"),
            Self::I64 => f.write_str("i64"),
            Self::U8 => f.write_str("u8"),
            Self::U16 => f.write_str("u16"),
            Self::U32 => f.write_str("u32"),
            Self::U64 => f.write_str("u64"),
            Self::F32 => f.write_str("f32"),
            Self::F64 => f.write_str("f64"),
            Self::Char => f.write_str("char"),
            Self::String => f.write_str("String"),
            Self::Unit => f.write_str("()"),
            Self::List(t) => write!(f, "Vec<{t}>"),
            Self::Set(t) => write!(f, "HashSet<{t}>"),
            Self::Map(k, v) => write!(f, "HashMap<{k}, {v}>"),
            Self::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
            Self::Array(t) => write!(f, "[{t}]"),
            Self::Nullable(t) => write!(f, "Option<{t}>"),
            Self::Named { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Self::Param(index) => write!(f, "#{index}"),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
