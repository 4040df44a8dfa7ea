use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::keys::KeyStrategy;

/// Identity strategy: a key already is its sequence of parts.
pub struct SequenceKeys<P> {
    _phantom: PhantomData<fn() -> P>,
}

impl<P> SequenceKeys<P> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<P> Default for SequenceKeys<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for SequenceKeys<P> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for SequenceKeys<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SequenceKeys")
    }
}

impl<P: Clone + Eq + Hash> KeyStrategy for SequenceKeys<P> {
    type Key = Vec<P>;
    type Part = P;

    #[inline]
    fn to_parts(&self, key: &Vec<P>) -> Vec<P> {
        key.clone()
    }

    #[inline]
    fn to_key(&self, parts: &[P]) -> Vec<P> {
        parts.to_vec()
    }
}

#[cfg(test)]
mod test {
    use crate::keys::KeyStrategy;
    use crate::keys::sequence_key::SequenceKeys;

    #[test]
    fn identity() {
        let keys = SequenceKeys::<u32>::new();
        assert_eq!(keys.to_parts(&vec![1, 2, 3]), vec![1, 2, 3]);
        assert_eq!(keys.to_key(&[4, 5]), vec![4, 5]);
        assert!(keys.to_parts(&vec![]).is_empty());
    }
}
