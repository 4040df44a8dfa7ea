use std::hash::Hash;

use crate::mapping::ChildMapping;
use crate::mapping::indexed_mapping::IndexedMapping;
use crate::mapping::keyed_mapping::KeyedMapping;

/// Fan-out at which a keyed node grows into an indexed one.
pub(crate) const KEYED_WIDTH: usize = 8;
/// An indexed node that drops below this many children shrinks back to keyed.
pub(crate) const INDEXED_SHRINK_BELOW: usize = 4;

pub(crate) struct Node<P, V> {
    /// Values stored at exactly this node's key, in insertion order. Duplicates allowed.
    pub(crate) values: Vec<V>,
    pub(crate) children: Children<P, Node<P, V>>,
}

pub(crate) enum Children<P, N> {
    Keyed(KeyedMapping<P, N>),
    Indexed(IndexedMapping<P, N>),
}

impl<P, V> Default for Node<P, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, V> Node<P, V> {
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            values: Vec::new(),
            children: Children::Keyed(KeyedMapping::new()),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
        self.children = Children::Keyed(KeyedMapping::new());
    }
}

impl<P, N> Children<P, N> {
    fn take_entries(&mut self) -> Vec<(P, N)> {
        match self {
            Children::Keyed(km) => std::mem::take(&mut km.entries),
            Children::Indexed(im) => im.take_entries(),
        }
    }
}

impl<P, V> Drop for Node<P, V> {
    fn drop(&mut self) {
        // Unlink descendants onto a heap stack so a deep chain is not dropped recursively.
        let mut pending = self.children.take_entries();
        while let Some((_, mut child)) = pending.pop() {
            pending.append(&mut child.children.take_entries());
        }
    }
}

impl<P: Eq + Hash + Clone, V> Node<P, V> {
    /// True when the node holds no values and has no children. Such a node is only ever
    /// reachable transiently, or as the root.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.values.is_empty() && self.num_children() == 0
    }

    pub(crate) fn num_children(&self) -> usize {
        match &self.children {
            Children::Keyed(km) => km.num_children(),
            Children::Indexed(im) => im.num_children(),
        }
    }

    pub(crate) fn is_indexed(&self) -> bool {
        matches!(&self.children, Children::Indexed(_))
    }

    pub(crate) fn seek_child(&self, part: &P) -> Option<&Node<P, V>> {
        match &self.children {
            Children::Keyed(km) => km.seek_child(part),
            Children::Indexed(im) => im.seek_child(part),
        }
    }

    pub(crate) fn seek_child_mut(&mut self, part: &P) -> Option<&mut Node<P, V>> {
        match &mut self.children {
            Children::Keyed(km) => km.seek_child_mut(part),
            Children::Indexed(im) => im.seek_child_mut(part),
        }
    }

    pub(crate) fn add_child(&mut self, part: P, node: Node<P, V>) {
        if self.is_full() {
            self.grow();
        }

        match &mut self.children {
            Children::Keyed(km) => km.add_child(part, node),
            Children::Indexed(im) => im.add_child(part, node),
        }
    }

    /// The child under `part`, created empty if it does not exist yet.
    pub(crate) fn child_or_insert(&mut self, part: &P) -> &mut Node<P, V> {
        if self.is_full() && self.seek_child(part).is_none() {
            self.grow();
        }

        match &mut self.children {
            Children::Keyed(km) => km.child_or_insert_with(part, Node::new),
            Children::Indexed(im) => im.child_or_insert_with(part, Node::new),
        }
    }

    pub(crate) fn delete_child(&mut self, part: &P) -> Option<Node<P, V>> {
        match &mut self.children {
            Children::Keyed(km) => km.delete_child(part),
            Children::Indexed(im) => {
                let node = im.delete_child(part);
                if im.num_children() < INDEXED_SHRINK_BELOW {
                    self.shrink();
                }
                node
            }
        }
    }

    /// Descends along `parts`, creating every missing node on the way.
    pub(crate) fn path_or_insert(&mut self, parts: &[P]) -> &mut Node<P, V> {
        let mut node = self;
        for part in parts {
            node = node.child_or_insert(part);
        }
        node
    }

    /// Takes over every value and child of `src`. Children under a part this node already
    /// has are merged into the existing child; the rest are relinked as they are. Values of
    /// `src` land after the values already here.
    pub(crate) fn absorb(&mut self, src: Node<P, V>) {
        // Each frame owns a destination node lifted out of its slot; the slot holds an empty
        // placeholder until the frame finishes and the merged node is written back.
        let mut stack = vec![AbsorbFrame::open(None, std::mem::take(self), src)];
        while let Some(frame) = stack.last_mut() {
            if let Some((part, child)) = frame.src_children.next() {
                let existing = frame.node.seek_child_mut(&part).map(std::mem::take);
                match existing {
                    Some(existing) => stack.push(AbsorbFrame::open(Some(part), existing, child)),
                    None => frame.node.add_child(part, child),
                }
                continue;
            }

            let Some(done) = stack.pop() else {
                break;
            };
            match (stack.last_mut(), done.part) {
                (Some(parent), Some(part)) => {
                    if let Some(slot) = parent.node.seek_child_mut(&part) {
                        *slot = done.node;
                    }
                }
                _ => *self = done.node,
            }
        }
    }

    /// Children in insertion order.
    #[inline]
    pub(crate) fn entries(&self) -> &[(P, Node<P, V>)] {
        match &self.children {
            Children::Keyed(km) => km.entries(),
            Children::Indexed(im) => im.entries(),
        }
    }

    /// Detaches every child, leaving this node childless.
    pub(crate) fn take_children(&mut self) -> Vec<(P, Node<P, V>)> {
        let entries = self.children.take_entries();
        self.children = Children::Keyed(KeyedMapping::new());
        entries
    }

    #[inline]
    fn is_full(&self) -> bool {
        match &self.children {
            Children::Keyed(km) => km.num_children() >= KEYED_WIDTH,
            Children::Indexed(_) => false,
        }
    }

    fn grow(&mut self) {
        if let Children::Keyed(km) = &mut self.children {
            self.children = Children::Indexed(IndexedMapping::from_keyed(km));
        }
    }

    fn shrink(&mut self) {
        if let Children::Indexed(im) = &mut self.children {
            self.children = Children::Keyed(KeyedMapping::from_indexed(im));
        }
    }
}

struct AbsorbFrame<P, V> {
    part: Option<P>,
    node: Node<P, V>,
    src_children: std::vec::IntoIter<(P, Node<P, V>)>,
}

impl<P: Eq + Hash + Clone, V> AbsorbFrame<P, V> {
    fn open(part: Option<P>, mut node: Node<P, V>, mut src: Node<P, V>) -> Self {
        node.values.append(&mut src.values);
        Self {
            part,
            node,
            src_children: src.take_children().into_iter(),
        }
    }
}

impl<P: Eq + Hash + Clone, V: Clone> Clone for Node<P, V> {
    fn clone(&self) -> Self {
        fn bare<P, V: Clone>(node: &Node<P, V>) -> Node<P, V> {
            Node {
                values: node.values.clone(),
                children: Children::Keyed(KeyedMapping::new()),
            }
        }

        // Copies are built bottom-up and attached to their parent's copy when finished.
        let mut stack = vec![(None, bare(self), self.entries().iter())];
        let mut copy = Node::new();
        while let Some((_, _, children)) = stack.last_mut() {
            if let Some((part, child)) = children.next() {
                stack.push((Some(part.clone()), bare(child), child.entries().iter()));
                continue;
            }

            let Some((part, node, _)) = stack.pop() else {
                break;
            };
            match (stack.last_mut(), part) {
                (Some((_, parent, _)), Some(part)) => parent.add_child(part, node),
                _ => copy = node,
            }
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use crate::node::{INDEXED_SHRINK_BELOW, KEYED_WIDTH, Node};

    fn leaf(value: u32) -> Node<u32, u32> {
        let mut node = Node::new();
        node.values.push(value);
        node
    }

    #[test]
    fn test_empty() {
        let mut node: Node<u32, u32> = Node::new();
        assert!(node.is_empty());
        node.values.push(1);
        assert!(!node.is_empty());
        node.values.clear();
        node.add_child(1, Node::new());
        assert!(!node.is_empty());
        node.clear();
        assert!(node.is_empty());
    }

    #[test]
    fn test_grow_and_shrink() {
        let mut node: Node<u32, u32> = Node::new();
        for i in 0..KEYED_WIDTH as u32 {
            node.add_child(i, leaf(i));
        }
        assert!(!node.is_indexed());

        node.add_child(100, leaf(100));
        assert!(node.is_indexed());
        for i in 0..KEYED_WIDTH as u32 {
            assert_eq!(node.seek_child(&i).unwrap().values, [i]);
        }

        let total = node.num_children();
        for i in 0..(total - INDEXED_SHRINK_BELOW + 1) as u32 {
            assert!(node.delete_child(&i).is_some());
        }
        assert!(!node.is_indexed());
        assert_eq!(node.num_children(), INDEXED_SHRINK_BELOW - 1);
        assert_eq!(node.seek_child(&100).unwrap().values, [100]);
    }

    #[test]
    fn test_child_or_insert_grows_in_order() {
        let mut node: Node<u32, u32> = Node::new();
        for i in (0..20).rev() {
            node.child_or_insert(&i).values.push(i);
        }
        // Existing children are returned rather than replaced.
        node.child_or_insert(&7).values.push(70);
        assert!(node.is_indexed());
        assert_eq!(node.seek_child(&7).unwrap().values, [7, 70]);

        let order: Vec<u32> = node.entries().iter().map(|(p, _)| *p).collect();
        let expected: Vec<u32> = (0..20).rev().collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn test_take_children() {
        let mut node: Node<u32, u32> = Node::new();
        node.add_child(2, leaf(2));
        node.add_child(1, leaf(1));
        let taken = node.take_children();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].0, 2);
        assert_eq!(node.num_children(), 0);
    }

    #[test]
    fn test_absorb_merges_and_relinks() {
        let mut dest: Node<u32, u32> = Node::new();
        dest.values.push(1);
        dest.path_or_insert(&[1, 2]).values.push(12);

        let mut src: Node<u32, u32> = Node::new();
        src.values.push(2);
        src.path_or_insert(&[1, 3]).values.push(13);
        src.path_or_insert(&[4]).values.push(4);

        dest.absorb(src);
        assert_eq!(dest.values, [1, 2]);
        let one = dest.seek_child(&1).unwrap();
        assert_eq!(one.seek_child(&2).unwrap().values, [12]);
        assert_eq!(one.seek_child(&3).unwrap().values, [13]);
        assert_eq!(dest.seek_child(&4).unwrap().values, [4]);
        let order: Vec<u32> = dest.entries().iter().map(|(p, _)| *p).collect();
        assert_eq!(order, [1, 4]);
    }

    #[test]
    fn test_absorb_keeps_existing_child_slots() {
        let mut dest: Node<u32, u32> = Node::new();
        for i in 0..10 {
            dest.path_or_insert(&[i]).values.push(i);
        }
        let mut src: Node<u32, u32> = Node::new();
        src.path_or_insert(&[3, 1]).values.push(31);
        src.path_or_insert(&[42]).values.push(42);

        dest.absorb(src);
        let order: Vec<u32> = dest.entries().iter().map(|(p, _)| *p).collect();
        assert_eq!(order, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 42]);
        let three = dest.seek_child(&3).unwrap();
        assert_eq!(three.values, [3]);
        assert_eq!(three.seek_child(&1).unwrap().values, [31]);
    }

    #[test]
    fn test_absorb_deep_identical_chains() {
        let chain: Vec<u32> = (0..20_000).collect();
        let mut dest: Node<u32, u32> = Node::new();
        dest.path_or_insert(&chain).values.push(1);
        let mut src: Node<u32, u32> = Node::new();
        src.path_or_insert(&chain).values.push(2);

        dest.absorb(src);
        let mut node = &dest;
        for part in &chain {
            assert_eq!(node.num_children(), 1);
            node = node.seek_child(part).unwrap();
        }
        assert_eq!(node.values, [1, 2]);
    }

    #[test]
    fn test_clone() {
        let mut node: Node<u32, u32> = Node::new();
        node.values.push(0);
        for i in (0..12).rev() {
            node.path_or_insert(&[i, i]).values.push(i);
        }
        let copy = node.clone();
        node.clear();

        assert_eq!(copy.values, [0]);
        assert!(copy.is_indexed());
        let order: Vec<u32> = copy.entries().iter().map(|(p, _)| *p).collect();
        assert_eq!(order, (0..12).rev().collect::<Vec<_>>());
        assert_eq!(copy.seek_child(&5).unwrap().seek_child(&5).unwrap().values, [5]);
    }

    #[test]
    fn test_clone_deep_chain() {
        let chain: Vec<u32> = (0..20_000).collect();
        let mut node: Node<u32, u32> = Node::new();
        node.path_or_insert(&chain).values.push(7);
        node.path_or_insert(&chain[..5]).values.push(5);

        let copy = node.clone();
        drop(node);
        let mut cur = &copy;
        for part in &chain {
            cur = cur.seek_child(part).unwrap();
        }
        assert_eq!(cur.values, [7]);
    }

    #[test]
    fn test_drop_deep_chain() {
        let mut root: Node<u32, ()> = Node::new();
        root.path_or_insert(&(0..100_000).collect::<Vec<_>>()).values.push(());
        drop(root);
    }
}
