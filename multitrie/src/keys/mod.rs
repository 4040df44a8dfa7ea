//! Conversion between caller-facing keys and the part sequences the trie stores.
//!
//! A [`MultiTrie`](crate::MultiTrie) never looks inside a key. It asks its [`KeyStrategy`]
//! to decompose the key into parts on the way in, and to recompose parts into a key when
//! enumerating.

use std::hash::Hash;

pub mod delimited_key;
pub mod fn_key;
pub mod sequence_key;

pub use delimited_key::DelimitedKeys;
pub use fn_key::KeyFns;
pub use sequence_key::SequenceKeys;

/// The key <-> parts conversion pair.
///
/// Implementations must be consistent: `to_parts(&to_key(parts)) == parts` for every part
/// sequence the trie may hold, otherwise keys yielded by enumeration will not look up the
/// same node they came from.
pub trait KeyStrategy {
    /// Caller-facing key type.
    type Key: Clone;
    /// One atomic segment of a key.
    type Part: Clone + Eq + Hash;

    fn to_parts(&self, key: &Self::Key) -> Vec<Self::Part>;
    fn to_key(&self, parts: &[Self::Part]) -> Self::Key;
}
