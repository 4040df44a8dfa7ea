use std::hash::Hash;

pub mod indexed_mapping;
pub mod keyed_mapping;

/// Mapping from a key part to an owned child.
///
/// Every implementation keeps its entries in insertion order; deleting an entry does not
/// disturb the relative order of the rest. Enumeration relies on this for reproducible
/// sibling order.
pub trait ChildMapping<P: Eq + Hash + Clone, N> {
    fn add_child(&mut self, part: P, node: N);
    fn seek_child(&self, part: &P) -> Option<&N>;
    fn seek_child_mut(&mut self, part: &P) -> Option<&mut N>;
    /// Returns the child under `part`, inserting the result of `make` first if absent.
    fn child_or_insert_with<F: FnOnce() -> N>(&mut self, part: &P, make: F) -> &mut N;
    fn delete_child(&mut self, part: &P) -> Option<N>;
    fn num_children(&self) -> usize;
    /// Entries in insertion order.
    fn entries(&self) -> &[(P, N)];
    /// Removes and returns all entries in insertion order.
    fn drain_entries(&mut self) -> Vec<(P, N)>;
}
