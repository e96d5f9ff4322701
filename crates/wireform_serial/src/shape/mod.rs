//! The structural input model.
//!
//! A [`TypeShape`] is a language-neutral description of a declared type: its
//! fields (with value types, defaults and wire annotations) or enum entries,
//! plus the declaration-level facts the static checker needs. It is the only
//! input the rest of the crate consumes; how a host produces it (reflection,
//! an AST walker, hand-written registration code) is out of scope here.
//!
//! ## Menu
//!
//! - [`TypeShape`]: one declared type: class, singleton object, or enum.
//! - [`FieldShape`]: one declared field of a class shape.
//! - [`EntryShape`]: one entry of an enum shape.
//! - [`TypeRef`]: a reference to a field's declared value type.
//! - [`check_shape`]: the static checker rejecting unsupported declarations.

// -----------------------------------------------------------------------------
// Modules

mod check;
mod field_shape;
mod type_ref;
mod type_shape;

// -----------------------------------------------------------------------------
// Exports

pub use check::check_shape;
pub use field_shape::{EntryShape, FieldShape};
pub use type_ref::TypeRef;
pub use type_shape::{DeclKind, DeclModifiers, TypeShape};
