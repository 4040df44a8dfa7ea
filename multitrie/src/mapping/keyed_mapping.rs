use std::hash::Hash;

use crate::mapping::ChildMapping;
use crate::mapping::indexed_mapping::IndexedMapping;

/// Maps parts to children using a plain vector of `(part, child)` pairs, searched linearly.
/// Cheap for the low fan-out most trie nodes have. New entries are appended, so the vector
/// order is insertion order.
#[derive(Clone)]
pub struct KeyedMapping<P, N> {
    pub(crate) entries: Vec<(P, N)>,
}

impl<P, N> Default for KeyedMapping<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, N> KeyedMapping<P, N> {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Converts a wide mapping back into a keyed one, keeping entry order.
    pub(crate) fn from_indexed(im: &mut IndexedMapping<P, N>) -> Self
    where
        P: Eq + Hash + Clone,
    {
        Self {
            entries: im.drain_entries(),
        }
    }

    #[inline]
    fn position(&self, part: &P) -> Option<usize>
    where
        P: Eq,
    {
        self.entries.iter().position(|(p, _)| p == part)
    }
}

impl<P: Eq + Hash + Clone, N> ChildMapping<P, N> for KeyedMapping<P, N> {
    #[inline]
    fn add_child(&mut self, part: P, node: N) {
        debug_assert!(self.position(&part).is_none(), "add_child: duplicate part");
        self.entries.push((part, node));
    }

    fn seek_child(&self, part: &P) -> Option<&N> {
        self.entries.iter().find(|(p, _)| p == part).map(|(_, n)| n)
    }

    fn seek_child_mut(&mut self, part: &P) -> Option<&mut N> {
        self.entries
            .iter_mut()
            .find(|(p, _)| p == part)
            .map(|(_, n)| n)
    }

    fn child_or_insert_with<F: FnOnce() -> N>(&mut self, part: &P, make: F) -> &mut N {
        let idx = match self.position(part) {
            Some(idx) => idx,
            None => {
                self.entries.push((part.clone(), make()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    fn delete_child(&mut self, part: &P) -> Option<N> {
        let idx = self.position(part)?;
        // Vec::remove rather than swap_remove: sibling order must survive deletes.
        Some(self.entries.remove(idx).1)
    }

    #[inline(always)]
    fn num_children(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn entries(&self) -> &[(P, N)] {
        &self.entries
    }

    fn drain_entries(&mut self) -> Vec<(P, N)> {
        std::mem::take(&mut self.entries)
    }
}
