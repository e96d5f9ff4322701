use alloc::boxed::Box;
use alloc::string::String;

use crate::property::DeriveError;
use crate::shape::{DeclKind, TypeRef, TypeShape};

/// Statically checks a declaration before any derivation runs.
///
/// All conditions rejected here are fatal for the type: no serializer is
/// produced, and nothing is encoded or decoded. The checks run in a fixed
/// order and stop at the first failure.
///
/// # Examples
///
/// ```
/// use wireform_serial::shape::{check_shape, TypeShape};
///
/// let shape = TypeShape::class("demo::Sub").with_supertype("demo::Base");
/// assert!(check_shape(&shape).is_err());
/// ```
pub fn check_shape(shape: &TypeShape) -> Result<(), DeriveError> {
    if shape.decl() == DeclKind::Object {
        return Err(DeriveError::ObjectNotSupported {
            type_name: shape.name().into(),
        });
    }

    if !shape.supertypes().is_empty() {
        return Err(DeriveError::SuperclassNotSupported {
            type_name: shape.name().into(),
            supertypes: join(shape.supertypes()),
        });
    }

    let modifiers = shape.modifiers();
    if modifiers.is_anonymous {
        return Err(DeriveError::AnonymousClassNotSupported {
            type_name: shape.name().into(),
        });
    }
    if modifiers.is_inner {
        return Err(DeriveError::InnerClassNotSupported {
            type_name: shape.name().into(),
        });
    }
    if modifiers.is_abstract {
        return Err(DeriveError::AbstractClassNotSupported {
            type_name: shape.name().into(),
        });
    }

    if !shape.type_params().is_empty() {
        return Err(DeriveError::TypeParametersNotSupported {
            type_name: shape.name().into(),
            params: join(shape.type_params()),
        });
    }

    if modifiers.has_companion {
        return Err(DeriveError::CompanionNotSupported {
            type_name: shape.name().into(),
        });
    }

    for field in shape.fields() {
        check_field_type(shape, field.identifier(), field.ty())?;
    }

    Ok(())
}

// A field typed as a bare type parameter cannot be resolved to a serializer;
// a reference array over a type parameter has no known element serializer.
fn check_field_type(shape: &TypeShape, field: &str, ty: &TypeRef) -> Result<(), DeriveError> {
    if ty.is_param() {
        return Err(DeriveError::PropertyTypeParameterUnsupported {
            type_name: shape.name().into(),
            property: field.into(),
        });
    }
    if contains_generic_array(ty) {
        return Err(DeriveError::GenericArrayElementUnsupported {
            type_name: shape.name().into(),
            property: field.into(),
        });
    }
    Ok(())
}

fn contains_generic_array(ty: &TypeRef) -> bool {
    match ty {
        TypeRef::Array(element) => element.is_param() || contains_generic_array(element),
        TypeRef::List(t) | TypeRef::Set(t) | TypeRef::Nullable(t) => contains_generic_array(t),
        TypeRef::Map(k, v) => contains_generic_array(k) || contains_generic_array(v),
        TypeRef::Tuple(items) => items.iter().any(contains_generic_array),
        TypeRef::Named { args, .. } => args.iter().any(contains_generic_array),
        _ => false,
    }
}

fn join(names: &[Box<str>]) -> Box<str> {
    let mut out = String::new();
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(name);
    }
    out.into_boxed_str()
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::check_shape;
    use crate::property::DeriveError;
    use crate::shape::{DeclModifiers, FieldShape, TypeRef, TypeShape};

    #[test]
    fn plain_class_passes() {
        let shape = TypeShape::class("demo::Plain")
            .with_field(FieldShape::parameter("value", TypeRef::I32));
        assert!(check_shape(&shape).is_ok());
    }

    #[test]
    fn object_is_rejected() {
        let err = check_shape(&TypeShape::object("demo::Singleton")).unwrap_err();
        assert!(matches!(err, DeriveError::ObjectNotSupported { .. }));
    }

    #[test]
    fn supertypes_are_rejected() {
        let shape = TypeShape::class("demo::Sub")
            .with_supertype("demo::Base")
            .with_supertype("demo::Marker");
        match check_shape(&shape).unwrap_err() {
            DeriveError::SuperclassNotSupported { supertypes, .. } => {
                assert_eq!(&*supertypes, "demo::Base, demo::Marker");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn abstract_class_is_rejected() {
        let shape = TypeShape::class("demo::Base").with_modifiers(DeclModifiers {
            is_abstract: true,
            ..DeclModifiers::default()
        });
        assert!(matches!(
            check_shape(&shape).unwrap_err(),
            DeriveError::AbstractClassNotSupported { .. },
        ));
    }

    #[test]
    fn type_parameters_are_rejected() {
        let shape = TypeShape::class("demo::Generic").with_type_param("T");
        assert!(matches!(
            check_shape(&shape).unwrap_err(),
            DeriveError::TypeParametersNotSupported { .. },
        ));
    }

    #[test]
    fn param_typed_field_is_rejected() {
        let shape =
            TypeShape::class("demo::Holder").with_field(FieldShape::parameter("value", TypeRef::Param(0)));
        assert!(matches!(
            check_shape(&shape).unwrap_err(),
            DeriveError::PropertyTypeParameterUnsupported { .. },
        ));
    }

    #[test]
    fn generic_array_element_is_rejected() {
        let shape = TypeShape::class("demo::Holder")
            .with_field(FieldShape::parameter("values", TypeRef::array(TypeRef::Param(0))));
        assert!(matches!(
            check_shape(&shape).unwrap_err(),
            DeriveError::GenericArrayElementUnsupported { .. },
        ));
    }
}
