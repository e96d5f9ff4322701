//! Provide hash containers, re-exports *hashbrown* and *foldhash*.

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{FixedHashState, FixedHasher};

/// A [`hashbrown::HashMap`] with a fixed hash state.
///
/// Lookups are as fast as with the default random state, but hash values only
/// depend on the input, so iteration order is reproducible between runs.
///
/// Construct with [`Default::default`] or `with_hasher(FixedHashState)`; the
/// hashbrown `new` constructor is tied to its own default state type.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashSet`] with a fixed hash state.
///
/// See [`HashMap`] for the construction caveat.
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::HashMap;

    #[test]
    fn fixed_state_lookup() {
        let mut map: HashMap<&str, i32> = HashMap::default();
        map.insert("a", 1);
        map.insert("b", 2);

        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.get("b"), Some(&2));
        assert_eq!(map.get("c"), None);
    }
}
