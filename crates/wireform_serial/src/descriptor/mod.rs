//! The descriptor model: self-describing shape metadata.
//!
//! A [`SerialDescriptor`] tells a format everything it may need to know about
//! one serializable type without seeing a value: its serial name, its
//! [`SerialKind`], and (for structure kinds) the ordered elements with
//! their wire names, optionality and child descriptors.
//!
//! Descriptors form a tree, possibly with shared subtrees for repeated types.
//! Recursive types are handled by registering a descriptor whose child slots
//! are deferred [`DescriptorCell`]s, backpatched once the referenced
//! descriptor exists; the tree is never traversed eagerly during
//! construction.

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod cell;
mod descriptor;
mod kind;

// -----------------------------------------------------------------------------
// Exports

pub use builder::{class_descriptor, enum_descriptor, object_descriptor};
pub use cell::DescriptorCell;
pub use descriptor::{ElementInfo, SerialDescriptor};
pub use kind::{PrimitiveKind, SerialKind, StructureKind};
