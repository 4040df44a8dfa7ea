//! Lazy enumeration over a trie.
//!
//! All iterators here walk the node graph depth-first, pre-order, with an explicit stack of
//! child iterators rather than recursion, so arbitrarily deep key hierarchies cannot
//! overflow the call stack and dropping an iterator part-way is free.
//!
//! The iterators borrow the trie, so the borrow checker already rules out mutating it while
//! one is alive. Collect into a `Vec` (or use the eager `keys`/`values`/`items` methods)
//! first when the results have to outlive a later mutation.

use std::hash::Hash;
use std::iter::FusedIterator;

use crate::keys::KeyStrategy;
use crate::node::Node;

type Entries<'a, P, V> = std::slice::Iter<'a, (P, Node<P, V>)>;

/// Pre-order walk over every node of a subtree, tracking the parts of the node it is on.
pub(crate) struct NodeWalk<'a, P, V> {
    pending_root: Option<&'a Node<P, V>>,
    node_iter_stack: Vec<Entries<'a, P, V>>,

    // Pushed and popped with one part per level as we descend and climb the tree.
    cur_parts: Vec<P>,
}

impl<'a, P: Clone + Eq + Hash, V> NodeWalk<'a, P, V> {
    /// Walks the subtree rooted at `root`, whose own key is `prefix`. `None` walks nothing.
    pub(crate) fn new(root: Option<&'a Node<P, V>>, prefix: Vec<P>) -> Self {
        Self {
            pending_root: root,
            node_iter_stack: Vec::new(),
            cur_parts: prefix,
        }
    }

    /// Parts of the node most recently returned by [`advance`](Self::advance).
    #[inline]
    pub(crate) fn parts(&self) -> &[P] {
        &self.cur_parts
    }

    pub(crate) fn advance(&mut self) -> Option<&'a Node<P, V>> {
        if let Some(root) = self.pending_root.take() {
            self.node_iter_stack.push(root.entries().iter());
            return Some(root);
        }

        // Grab the innermost child iterator. If it has another child, descend into it; if
        // not, pop it off and climb one level.
        loop {
            let last_iter = self.node_iter_stack.last_mut()?;

            let Some((part, child)) = last_iter.next() else {
                self.node_iter_stack.pop();
                if !self.node_iter_stack.is_empty() {
                    self.cur_parts.pop();
                }
                continue;
            };

            self.cur_parts.push(part.clone());
            self.node_iter_stack.push(child.entries().iter());
            return Some(child);
        }
    }
}

/// Value-bearing nodes from an ancestor chain, then from a subtree walk.
struct Cursor<'a, P, V> {
    lineage_parts: Vec<P>,
    ancestors: std::iter::Enumerate<std::vec::IntoIter<&'a Node<P, V>>>,
    // Key length of the ancestor last returned; `None` once we are into the subtree.
    ancestor_key_len: Option<usize>,
    walk: NodeWalk<'a, P, V>,
}

impl<'a, P: Clone + Eq + Hash, V> Cursor<'a, P, V> {
    fn new(lineage: Lineage<'a, P, V>, walk: NodeWalk<'a, P, V>) -> Self {
        Self {
            lineage_parts: lineage.parts,
            ancestors: lineage.nodes.into_iter().enumerate(),
            ancestor_key_len: None,
            walk,
        }
    }

    fn next_node(&mut self) -> Option<&'a Node<P, V>> {
        for (key_len, node) in self.ancestors.by_ref() {
            if !node.values.is_empty() {
                self.ancestor_key_len = Some(key_len);
                return Some(node);
            }
        }
        self.ancestor_key_len = None;

        while let Some(node) = self.walk.advance() {
            if !node.values.is_empty() {
                return Some(node);
            }
        }
        None
    }

    fn parts(&self) -> &[P] {
        match self.ancestor_key_len {
            Some(len) => &self.lineage_parts[..len],
            None => self.walk.parts(),
        }
    }
}

/// The strict ancestors of a node, root first: `nodes[i]` sits at `parts[..i]`.
pub(crate) struct Lineage<'a, P, V> {
    pub(crate) parts: Vec<P>,
    pub(crate) nodes: Vec<&'a Node<P, V>>,
}

impl<P, V> Lineage<'_, P, V> {
    pub(crate) fn empty() -> Self {
        Self {
            parts: Vec::new(),
            nodes: Vec::new(),
        }
    }
}

/// Lazily yields the key of every value-bearing node, once per node.
pub struct Keys<'a, S: KeyStrategy, V> {
    strategy: &'a S,
    cursor: Cursor<'a, S::Part, V>,
}

impl<'a, S: KeyStrategy, V> Keys<'a, S, V> {
    pub(crate) fn new(
        strategy: &'a S,
        lineage: Lineage<'a, S::Part, V>,
        walk: NodeWalk<'a, S::Part, V>,
    ) -> Self {
        Self {
            strategy,
            cursor: Cursor::new(lineage, walk),
        }
    }
}

impl<S: KeyStrategy, V> Iterator for Keys<'_, S, V> {
    type Item = S::Key;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next_node()?;
        Some(self.strategy.to_key(self.cursor.parts()))
    }
}

impl<S: KeyStrategy, V> FusedIterator for Keys<'_, S, V> {}

/// Lazily yields values without reconstructing any keys.
pub struct Values<'a, S: KeyStrategy, V> {
    cursor: Cursor<'a, S::Part, V>,
    current: std::slice::Iter<'a, V>,
}

impl<'a, S: KeyStrategy, V> Values<'a, S, V> {
    pub(crate) fn new(lineage: Lineage<'a, S::Part, V>, walk: NodeWalk<'a, S::Part, V>) -> Self {
        Self {
            cursor: Cursor::new(lineage, walk),
            current: Default::default(),
        }
    }
}

impl<'a, S: KeyStrategy, V> Iterator for Values<'a, S, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(value) = self.current.next() {
                return Some(value);
            }
            self.current = self.cursor.next_node()?.values.iter();
        }
    }
}

impl<S: KeyStrategy, V> FusedIterator for Values<'_, S, V> {}

/// Lazily yields `(key, value)` pairs, one per stored value.
pub struct Items<'a, S: KeyStrategy, V> {
    strategy: &'a S,
    cursor: Cursor<'a, S::Part, V>,
    current: Option<(S::Key, std::slice::Iter<'a, V>)>,
}

impl<'a, S: KeyStrategy, V> Items<'a, S, V> {
    pub(crate) fn new(
        strategy: &'a S,
        lineage: Lineage<'a, S::Part, V>,
        walk: NodeWalk<'a, S::Part, V>,
    ) -> Self {
        Self {
            strategy,
            cursor: Cursor::new(lineage, walk),
            current: None,
        }
    }
}

impl<'a, S: KeyStrategy, V> Iterator for Items<'a, S, V> {
    type Item = (S::Key, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((key, values)) = &mut self.current {
                if let Some(value) = values.next() {
                    return Some((key.clone(), value));
                }
            }

            let node = self.cursor.next_node()?;
            let key = self.strategy.to_key(self.cursor.parts());
            self.current = Some((key, node.values.iter()));
        }
    }
}

impl<S: KeyStrategy, V> FusedIterator for Items<'_, S, V> {}

#[cfg(test)]
mod tests {
    use crate::iter::NodeWalk;
    use crate::node::Node;

    fn build() -> Node<char, u32> {
        // a -> (b -> d), c
        let mut root = Node::new();
        root.child_or_insert(&'a').values.push(1);
        let a = root.child_or_insert(&'a');
        a.child_or_insert(&'b').child_or_insert(&'d').values.push(3);
        root.child_or_insert(&'c').values.push(2);
        root
    }

    #[test]
    fn test_walk_pre_order_with_parts() {
        let root = build();
        let mut walk = NodeWalk::new(Some(&root), Vec::new());
        let mut seen = Vec::new();
        while let Some(node) = walk.advance() {
            seen.push((walk.parts().iter().collect::<String>(), node.values.clone()));
        }
        assert_eq!(
            seen,
            vec![
                (String::new(), vec![]),
                ("a".to_string(), vec![1]),
                ("ab".to_string(), vec![]),
                ("abd".to_string(), vec![3]),
                ("c".to_string(), vec![2]),
            ]
        );
    }

    #[test]
    fn test_walk_with_prefix() {
        let root = build();
        let a = root.seek_child(&'a').unwrap();
        let mut walk = NodeWalk::new(Some(a), vec!['a']);
        let mut paths = Vec::new();
        while walk.advance().is_some() {
            paths.push(walk.parts().iter().collect::<String>());
        }
        assert_eq!(paths, ["a", "ab", "abd"]);
    }

    #[test]
    fn test_walk_nothing() {
        let mut walk: NodeWalk<'_, char, u32> = NodeWalk::new(None, vec!['z']);
        assert!(walk.advance().is_none());
        assert!(walk.advance().is_none());
    }

    #[test]
    fn test_walk_deep_chain() {
        // Deep enough that a recursive walk would be uncomfortable.
        let depth = 50_000u32;
        let mut root: Node<u32, u32> = Node::new();
        let mut node = &mut root;
        for i in 0..depth {
            node = node.child_or_insert(&i);
        }
        node.values.push(depth);

        let mut walk = NodeWalk::new(Some(&root), Vec::new());
        let mut last = None;
        while let Some(node) = walk.advance() {
            if !node.values.is_empty() {
                last = Some(walk.parts().len());
            }
        }
        assert_eq!(last, Some(depth as usize));
    }
}
