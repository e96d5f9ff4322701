//! Fallback `OnceLock` implementation based on a spinning state machine.
//!
//! The API is intentionally kept compatible with the standard library (only
//! the stable subset used by this workspace). Initialization spins instead of
//! parking, which is the usual trade-off for `no_std` targets.

#![expect(unsafe_code, reason = "OnceLock requires unsafe code.")]

use core::cell::UnsafeCell;
use core::fmt;
use core::hint;
use core::marker::PhantomData;
use core::mem::MaybeUninit;
use core::sync::atomic::Ordering::{Acquire, Relaxed, Release};
use core::sync::atomic::{AtomicU8, fence};

const COMPLETE: u8 = 0;
const RUNNING: u8 = 1;
const INCOMPLETE: u8 = 2;

// Restores the state when the initialization closure unwinds, so a panicking
// writer does not leave other threads spinning forever.
struct CompletionGuard<'a> {
    state: &'a AtomicU8,
    set_state_on_drop_to: u8,
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        self.state.store(self.set_state_on_drop_to, Release);
    }
}

/// Fallback implementation of `OnceLock` from the standard library.
///
/// A cell which can be written to only once.
///
/// See the [standard library] for further details.
///
/// [standard library]: https://doc.rust-lang.org/std/sync/struct.OnceLock.html
pub struct OnceLock<T> {
    state: AtomicU8,
    // Whether or not the value is initialized is tracked by `state`.
    value: UnsafeCell<MaybeUninit<T>>,
    /// `PhantomData` to make sure dropck understands we're dropping T in our Drop impl.
    _marker: PhantomData<T>,
}

impl<T> OnceLock<T> {
    /// Creates a new uninitialized cell.
    #[inline]
    #[must_use]
    pub const fn new() -> OnceLock<T> {
        OnceLock {
            state: AtomicU8::new(INCOMPLETE),
            value: UnsafeCell::new(MaybeUninit::uninit()),
            _marker: PhantomData,
        }
    }

    /// Gets the reference to the underlying value.
    ///
    /// Returns `None` if the cell is uninitialized, or being initialized.
    /// This method never blocks.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        if self.is_initialized() {
            // SAFETY: The inner value has been initialized.
            Some(unsafe { self.get_unchecked() })
        } else {
            None
        }
    }

    /// Gets the mutable reference to the underlying value.
    ///
    /// Returns `None` if the cell is uninitialized. This method never blocks.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        if self.is_initialized() {
            // SAFETY: The inner value has been initialized, and `&mut self`
            // guarantees exclusive access.
            Some(unsafe { (&mut *self.value.get()).assume_init_mut() })
        } else {
            None
        }
    }

    /// Initializes the contents of the cell to `value`.
    ///
    /// May block if another thread is currently attempting to initialize the
    /// cell. The cell is guaranteed to contain a value when `set` returns,
    /// though not necessarily the one provided.
    ///
    /// Returns `Ok(())` if the cell was uninitialized and `Err(value)` if the
    /// cell was already initialized.
    #[inline]
    pub fn set(&self, value: T) -> Result<(), T> {
        let mut value = Some(value);
        self.get_or_init(|| value.take().unwrap());
        match value {
            None => Ok(()),
            Some(value) => Err(value),
        }
    }

    /// Gets the contents of the cell, initializing it to `f()` if the cell
    /// was uninitialized.
    ///
    /// Many threads may call `get_or_init` concurrently with different
    /// initializing functions, but it is guaranteed that only one function
    /// will be executed if the function doesn't panic.
    ///
    /// # Panics
    ///
    /// If `f()` panics, the panic is propagated to the caller, and the cell
    /// remains uninitialized.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        // Fast path check
        if let Some(value) = self.get() {
            return value;
        }
        self.initialize(f);

        // SAFETY: The inner value has been initialized.
        unsafe { self.get_unchecked() }
    }

    /// Consumes the `OnceLock`, returning the wrapped value. Returns `None` if
    /// the cell was uninitialized.
    #[inline]
    pub fn into_inner(mut self) -> Option<T> {
        self.take()
    }

    /// Takes the value out of this `OnceLock`, moving it back to an
    /// uninitialized state.
    ///
    /// Has no effect and returns `None` if the `OnceLock` was uninitialized.
    #[inline]
    pub fn take(&mut self) -> Option<T> {
        if self.is_initialized() {
            self.state = AtomicU8::new(INCOMPLETE);
            // SAFETY: The inner value was initialized, and the state was just
            // reset, so it will not be read or dropped again.
            unsafe { Some((*self.value.get()).assume_init_read()) }
        } else {
            None
        }
    }

    fn initialize(&self, f: impl FnOnce() -> T) {
        let mut f = Some(f);
        let mut state = self.state.load(Relaxed);
        loop {
            match state {
                COMPLETE => {
                    // Ensure visibility of the stored value.
                    fence(Acquire);
                    return;
                }
                INCOMPLETE => {
                    if let Err(new) = self
                        .state
                        .compare_exchange_weak(INCOMPLETE, RUNNING, Acquire, Relaxed)
                    {
                        state = new;
                        continue;
                    }

                    let mut completion_guard = CompletionGuard {
                        state: &self.state,
                        set_state_on_drop_to: INCOMPLETE,
                    };

                    let value = f.take().unwrap()();
                    // SAFETY: This thread won the state race, so it has
                    // exclusive access to the slot until the guard releases.
                    unsafe {
                        (*self.value.get()).write(value);
                    }

                    completion_guard.set_state_on_drop_to = COMPLETE;
                    return;
                }
                _ => {
                    hint::spin_loop();
                    state = self.state.load(Relaxed);
                }
            }
        }
    }

    #[inline(always)]
    fn is_initialized(&self) -> bool {
        // Use acquire ordering to make all initialization changes visible to
        // the current thread.
        self.state.load(Acquire) == COMPLETE
    }

    // # Safety
    // The value must be initialized.
    #[inline]
    unsafe fn get_unchecked(&self) -> &T {
        debug_assert!(self.is_initialized());
        unsafe { (*self.value.get()).assume_init_ref() }
    }
}

// SAFETY: Access to the inner value is synchronized through the atomic state.
unsafe impl<T: Sync + Send> Sync for OnceLock<T> {}
// SAFETY: Sending the lock sends the (possibly initialized) inner value.
unsafe impl<T: Send> Send for OnceLock<T> {}

impl<T> Default for OnceLock<T> {
    #[inline]
    fn default() -> OnceLock<T> {
        OnceLock::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for OnceLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_tuple("OnceLock");
        match self.get() {
            Some(v) => d.field(v),
            None => d.field(&format_args!("<uninit>")),
        };
        d.finish()
    }
}

impl<T> Drop for OnceLock<T> {
    fn drop(&mut self) {
        if *self.state.get_mut() == COMPLETE {
            // SAFETY: The inner value was initialized and is dropped exactly
            // once, here.
            unsafe { (*self.value.get()).assume_init_drop() }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::OnceLock;

    #[test]
    fn set_then_get() {
        let cell = OnceLock::new();
        assert_eq!(cell.get(), None);
        assert_eq!(cell.set(7), Ok(()));
        assert_eq!(cell.set(8), Err(8));
        assert_eq!(cell.get(), Some(&7));
    }

    #[test]
    fn get_or_init_runs_once() {
        let cell = OnceLock::new();
        assert_eq!(*cell.get_or_init(|| 1), 1);
        assert_eq!(*cell.get_or_init(|| 2), 1);
        assert_eq!(cell.into_inner(), Some(1));
    }
}
