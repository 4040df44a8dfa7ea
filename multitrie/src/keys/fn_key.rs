use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::keys::KeyStrategy;

/// A strategy assembled from a pair of functions, for composite key types that do not
/// warrant their own [`KeyStrategy`] impl.
///
/// ```rust
/// use multitrie::{KeyFns, MultiTrie};
///
/// // (tenant, bucket) keys, stored as two-part paths.
/// let strategy = KeyFns::new(
///     |key: &(u32, String)| vec![key.0.to_string(), key.1.clone()],
///     |parts: &[String]| {
///         let tenant = parts.first().and_then(|p| p.parse().ok()).unwrap_or_default();
///         let bucket = parts.get(1).cloned().unwrap_or_default();
///         (tenant, bucket)
///     },
/// );
/// let mut trie = MultiTrie::with_strategy(strategy);
/// trie.add(&(7, "logs".to_string()), "retain-30d");
/// assert_eq!(trie.get(&(7, "logs".to_string())).unwrap(), &["retain-30d"]);
/// ```
pub struct KeyFns<K, P, F, G> {
    to_parts: F,
    to_key: G,
    _phantom: PhantomData<fn(K) -> P>,
}

impl<K, P, F, G> KeyFns<K, P, F, G>
where
    F: Fn(&K) -> Vec<P>,
    G: Fn(&[P]) -> K,
{
    pub fn new(to_parts: F, to_key: G) -> Self {
        Self {
            to_parts,
            to_key,
            _phantom: PhantomData,
        }
    }
}

impl<K, P, F: Clone, G: Clone> Clone for KeyFns<K, P, F, G> {
    fn clone(&self) -> Self {
        Self {
            to_parts: self.to_parts.clone(),
            to_key: self.to_key.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<K, P, F, G> fmt::Debug for KeyFns<K, P, F, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyFns")
    }
}

impl<K, P, F, G> KeyStrategy for KeyFns<K, P, F, G>
where
    K: Clone,
    P: Clone + Eq + Hash,
    F: Fn(&K) -> Vec<P>,
    G: Fn(&[P]) -> K,
{
    type Key = K;
    type Part = P;

    fn to_parts(&self, key: &K) -> Vec<P> {
        (self.to_parts)(key)
    }

    fn to_key(&self, parts: &[P]) -> K {
        (self.to_key)(parts)
    }
}

#[cfg(test)]
mod test {
    use crate::keys::KeyStrategy;
    use crate::keys::fn_key::KeyFns;

    #[test]
    fn dotted_version_numbers() {
        let keys = KeyFns::new(
            |key: &String| key.split('.').filter_map(|p| p.parse::<u16>().ok()).collect(),
            |parts: &[u16]| {
                parts
                    .iter()
                    .map(u16::to_string)
                    .collect::<Vec<_>>()
                    .join(".")
            },
        );
        assert_eq!(keys.to_parts(&"1.20.3".to_string()), vec![1, 20, 3]);
        assert_eq!(keys.to_key(&[2, 0]), "2.0");
    }
}
