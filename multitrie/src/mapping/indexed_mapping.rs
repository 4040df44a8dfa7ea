use std::collections::HashMap;
use std::hash::Hash;

use crate::mapping::ChildMapping;
use crate::mapping::keyed_mapping::KeyedMapping;

// An ordered vector of children plus a hash index from part to slot, for wide nodes where a
// linear scan stops paying off.
#[derive(Clone)]
pub struct IndexedMapping<P, N> {
    child_slots: HashMap<P, usize>,
    entries: Vec<(P, N)>,
}

impl<P, N> Default for IndexedMapping<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, N> IndexedMapping<P, N> {
    pub fn new() -> Self {
        Self {
            child_slots: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn take_entries(&mut self) -> Vec<(P, N)> {
        self.child_slots.clear();
        std::mem::take(&mut self.entries)
    }
}

impl<P: Eq + Hash + Clone, N> IndexedMapping<P, N> {
    pub fn from_keyed(km: &mut KeyedMapping<P, N>) -> Self {
        let mut im = IndexedMapping::new();
        for (part, node) in km.drain_entries() {
            im.add_child(part, node);
        }
        im
    }
}

impl<P: Eq + Hash + Clone, N> ChildMapping<P, N> for IndexedMapping<P, N> {
    fn add_child(&mut self, part: P, node: N) {
        let pos = self.entries.len();
        let previous = self.child_slots.insert(part.clone(), pos);
        debug_assert!(previous.is_none(), "add_child: duplicate part");
        self.entries.push((part, node));
    }

    fn seek_child(&self, part: &P) -> Option<&N> {
        let pos = *self.child_slots.get(part)?;
        Some(&self.entries[pos].1)
    }

    fn seek_child_mut(&mut self, part: &P) -> Option<&mut N> {
        let pos = *self.child_slots.get(part)?;
        Some(&mut self.entries[pos].1)
    }

    fn child_or_insert_with<F: FnOnce() -> N>(&mut self, part: &P, make: F) -> &mut N {
        let pos = match self.child_slots.get(part) {
            Some(pos) => *pos,
            None => {
                self.add_child(part.clone(), make());
                self.entries.len() - 1
            }
        };
        &mut self.entries[pos].1
    }

    fn delete_child(&mut self, part: &P) -> Option<N> {
        let pos = self.child_slots.remove(part)?;
        let (_, node) = self.entries.remove(pos);

        // Everything after the hole shifted down by one.
        for slot in self.child_slots.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(node)
    }

    #[inline]
    fn num_children(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn entries(&self) -> &[(P, N)] {
        &self.entries
    }

    fn drain_entries(&mut self) -> Vec<(P, N)> {
        self.take_entries()
    }
}
