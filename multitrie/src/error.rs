//! Error taxonomy for trie lookups and removals.

use thiserror::Error;

/// Failures surfaced by exact lookups and removals.
///
/// Prefix enumeration, [`has_ancestor`](crate::MultiTrie::has_ancestor) and
/// [`move_subtree`](crate::MultiTrie::move_subtree) never fail: an absent path is an
/// empty result, a `false`, or a no-op respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrieError {
    /// No node exists at the requested path. `depth` is the number of leading parts that
    /// did resolve before the path broke.
    #[error("key not found: path broke after {depth} part(s)")]
    KeyNotFound { depth: usize },
    /// The node exists but holds no value equal to the one requested.
    #[error("value not found at key")]
    ValueNotFound,
}

pub type Result<T> = std::result::Result<T, TrieError>;

#[cfg(test)]
mod tests {
    use super::TrieError;

    #[test]
    fn test_display() {
        assert_eq!(
            TrieError::KeyNotFound { depth: 2 }.to_string(),
            "key not found: path broke after 2 part(s)"
        );
        assert_eq!(TrieError::ValueNotFound.to_string(), "value not found at key");
    }
}
