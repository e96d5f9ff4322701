//! Serial-name trace of the enclosing structure scopes.
//!
//! The structure helpers push the serial name of every scope they open, so a
//! failing codec error can report *where* in the value tree it happened. The
//! stack only exists in debug builds with the `std` and `debug` features;
//! everywhere else the hooks compile to no-ops.

#[cfg(all(debug_assertions, feature = "std", feature = "debug"))]
mod imp {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use core::fmt::Write;

    std::thread_local! {
        static SCOPE_STACK: RefCell<Vec<Box<str>>> = const { RefCell::new(Vec::new()) };
    }

    pub(crate) fn push(serial_name: &str) {
        SCOPE_STACK.with_borrow_mut(|stack| stack.push(serial_name.into()));
    }

    pub(crate) fn pop() {
        SCOPE_STACK.with_borrow_mut(|stack| {
            stack.pop();
        });
    }

    pub(crate) fn decorate(message: String) -> String {
        SCOPE_STACK.with_borrow(|stack| {
            if stack.is_empty() {
                return message;
            }
            let mut out = message;
            out.push_str(" (in ");
            for (i, name) in stack.iter().enumerate() {
                if i > 0 {
                    out.push_str(" -> ");
                }
                let _ = write!(out, "`{name}`");
            }
            out.push(')');
            out
        })
    }
}

#[cfg(not(all(debug_assertions, feature = "std", feature = "debug")))]
mod imp {
    use alloc::string::String;

    #[inline(always)]
    pub(crate) fn push(_serial_name: &str) {}

    #[inline(always)]
    pub(crate) fn pop() {}

    #[inline(always)]
    pub(crate) fn decorate(message: String) -> String {
        message
    }
}

pub(crate) use imp::{decorate, pop, push};
