//! Useful synchronization primitives.
//!
//! This module provides a cross-platform alternative to the standard library's
//! `sync` module, limited to the primitives the workspace actually uses.
//!
//! - In `std` environments, it directly re-exports the standard library's
//!   contents.
//! - In non-`std` environments, a spin-based [`OnceLock`] fallback is used.
//!   The lock-based primitives (`RwLock` and friends) are only available with
//!   `std`; `no_std` callers share state through write-once cells instead.
//!
//! The fallback keeps the same API as the standard library (only the stable
//! subset used here).

// -----------------------------------------------------------------------------
// Exports

pub use alloc::sync::{Arc, Weak};

#[cfg(feature = "std")]
pub use std::sync::{
    LockResult, Mutex, MutexGuard, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
    TryLockError, TryLockResult,
};

#[cfg(not(feature = "std"))]
mod once;

#[cfg(not(feature = "std"))]
pub use once::OnceLock;
