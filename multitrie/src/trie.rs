//! The multi-valued prefix trie.
//!
//! This module contains [`MultiTrie`], the engine that resolves keys to node paths and
//! implements lookup, enumeration, insertion, removal with pruning, and subtree moves.

use log::{debug, trace};

use crate::error::{Result, TrieError};
use crate::iter::{Items, Keys, Lineage, NodeWalk, Values};
use crate::keys::{DelimitedKeys, KeyStrategy, SequenceKeys};
use crate::node::Node;

/// A trie mapping composite keys to ordered multisets of values.
///
/// Every key is a path of parts from the root, and every node along a path may carry values
/// of its own. That makes prefixes first-class: a subtree can be enumerated, the values of
/// every ancestor of a key can be collected ([`Scope::Parents`]), and whole subtrees can be
/// moved or merged under another key.
///
/// Keys are opaque to the trie. A [`KeyStrategy`] decomposes them into parts on the way in
/// and recomposes parts into keys during enumeration. Every key-taking operation has a
/// `_parts` twin for callers that already hold the decomposed form.
///
/// Nodes that end up holding no values and no children are pruned as soon as the operation
/// that emptied them completes, so only the root may ever be empty.
///
/// Sibling nodes are visited in the order their parts were first inserted.
///
/// ## Examples
///
/// ```rust
/// use multitrie::{PathTrie, Scope};
///
/// let mut acl = PathTrie::new();
/// acl.add(&"srv".to_string(), "ops:read");
/// acl.add(&"srv/db".to_string(), "dba:write");
/// acl.add(&"srv/db".to_string(), "ops:read");
/// acl.add(&"home/ana".to_string(), "ana:write");
///
/// assert_eq!(acl.get(&"srv/db".to_string()).unwrap(), &["dba:write", "ops:read"]);
///
/// // Everything that applies at srv/db/replica: inherited first, then its own subtree.
/// let effective = acl.values(Scope::Parents(&"srv/db/replica".to_string()));
/// assert_eq!(effective, [&"ops:read", &"dba:write", &"ops:read"]);
///
/// assert!(acl.has_ancestor(&"srv/db/replica".to_string()));
/// assert!(!acl.has_ancestor(&"home".to_string()));
/// ```
#[derive(Clone)]
pub struct MultiTrie<S: KeyStrategy, V> {
    root: Node<S::Part, V>,
    strategy: S,
}

/// A trie whose keys are already part sequences.
pub type SequenceTrie<P, V> = MultiTrie<SequenceKeys<P>, V>;

/// A trie keyed by delimited strings such as `"a/b/c"`.
pub type PathTrie<V> = MultiTrie<DelimitedKeys, V>;

/// Which part of the trie an enumeration covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope<T> {
    /// Every value in the trie.
    All,
    /// The subtree at a prefix, the prefix's own values included. An absent prefix yields
    /// nothing.
    Prefix(T),
    /// The values of every ancestor of a prefix (root first, each under its own key),
    /// followed by the subtree at the prefix. Ancestors are collected as far as the path
    /// resolves, even when the prefix itself does not exist.
    Parents(T),
}

impl<T> Scope<T> {
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Scope<U> {
        match self {
            Scope::All => Scope::All,
            Scope::Prefix(t) => Scope::Prefix(f(t)),
            Scope::Parents(t) => Scope::Parents(f(t)),
        }
    }
}

impl<S: KeyStrategy + Default, V> Default for MultiTrie<S, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: KeyStrategy + Default, V> MultiTrie<S, V> {
    /// Create a new empty trie using the strategy's default configuration.
    pub fn new() -> Self {
        Self::with_strategy(S::default())
    }
}

impl<S: KeyStrategy, V> MultiTrie<S, V> {
    /// Create a new empty trie that converts keys with `strategy`.
    pub fn with_strategy(strategy: S) -> Self {
        Self {
            root: Node::new(),
            strategy,
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// True when the trie holds no values at all.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub(crate) fn root(&self) -> &Node<S::Part, V> {
        &self.root
    }

    // ---------------------------------------------------------------------------------------
    // Path resolution
    // ---------------------------------------------------------------------------------------

    fn find(&self, parts: &[S::Part]) -> Result<&Node<S::Part, V>> {
        let mut node = &self.root;
        for (depth, part) in parts.iter().enumerate() {
            node = node
                .seek_child(part)
                .ok_or(TrieError::KeyNotFound { depth })?;
        }
        Ok(node)
    }

    fn find_mut(&mut self, parts: &[S::Part]) -> Result<&mut Node<S::Part, V>> {
        let mut node = &mut self.root;
        for (depth, part) in parts.iter().enumerate() {
            node = node
                .seek_child_mut(part)
                .ok_or(TrieError::KeyNotFound { depth })?;
        }
        Ok(node)
    }

    /// Resolves `parts`, also returning every strict ancestor passed on the way (the root
    /// included). When the path breaks the node is `None` and the ancestors stop at the last
    /// node that did resolve.
    fn find_with_ancestors(
        &self,
        parts: &[S::Part],
    ) -> (Option<&Node<S::Part, V>>, Vec<&Node<S::Part, V>>) {
        let mut ancestors = Vec::with_capacity(parts.len());
        let mut node = &self.root;
        for part in parts {
            ancestors.push(node);
            match node.seek_child(part) {
                Some(child) => node = child,
                None => return (None, ancestors),
            }
        }
        (Some(node), ancestors)
    }

    // ---------------------------------------------------------------------------------------
    // Point lookup
    // ---------------------------------------------------------------------------------------

    /// The values stored at exactly `key`, in insertion order.
    pub fn get(&self, key: &S::Key) -> Result<&[V]> {
        self.get_parts(&self.strategy.to_parts(key))
    }

    pub fn get_parts(&self, parts: &[S::Part]) -> Result<&[V]> {
        Ok(&self.find(parts)?.values)
    }

    /// True when a node exists at exactly `key`.
    pub fn contains_key(&self, key: &S::Key) -> bool {
        self.find(&self.strategy.to_parts(key)).is_ok()
    }

    /// True when some strict ancestor of `key` (the root included) holds at least one value.
    /// The node at `key` itself is not consulted, and a path that breaks before reaching a
    /// value-bearing node answers `false`.
    pub fn has_ancestor(&self, key: &S::Key) -> bool {
        self.has_ancestor_parts(&self.strategy.to_parts(key))
    }

    pub fn has_ancestor_parts(&self, parts: &[S::Part]) -> bool {
        let mut node = &self.root;
        for part in parts {
            if !node.values.is_empty() {
                return true;
            }
            match node.seek_child(part) {
                Some(child) => node = child,
                None => return false,
            }
        }
        false
    }

    // ---------------------------------------------------------------------------------------
    // Enumeration
    // ---------------------------------------------------------------------------------------

    fn resolve_scope(
        &self,
        scope: Scope<Vec<S::Part>>,
    ) -> (Lineage<'_, S::Part, V>, NodeWalk<'_, S::Part, V>) {
        match scope {
            Scope::All => (Lineage::empty(), NodeWalk::new(Some(&self.root), Vec::new())),
            Scope::Prefix(parts) => {
                let node = self.find(&parts).ok();
                (Lineage::empty(), NodeWalk::new(node, parts))
            }
            Scope::Parents(parts) => {
                let (node, nodes) = self.find_with_ancestors(&parts);
                let lineage = Lineage {
                    parts: parts.clone(),
                    nodes,
                };
                (lineage, NodeWalk::new(node, parts))
            }
        }
    }

    /// Keys of the whole trie; the same as `iter_keys(Scope::All)`.
    pub fn iter(&self) -> Keys<'_, S, V> {
        self.iter_keys(Scope::All)
    }

    /// Lazily yields the key of every value-bearing node in `scope`, once per node.
    pub fn iter_keys(&self, scope: Scope<&S::Key>) -> Keys<'_, S, V> {
        self.iter_keys_parts_owned(scope.map(|key| self.strategy.to_parts(key)))
    }

    pub fn iter_keys_parts(&self, scope: Scope<&[S::Part]>) -> Keys<'_, S, V> {
        self.iter_keys_parts_owned(scope.map(<[S::Part]>::to_vec))
    }

    fn iter_keys_parts_owned(&self, scope: Scope<Vec<S::Part>>) -> Keys<'_, S, V> {
        let (lineage, walk) = self.resolve_scope(scope);
        Keys::new(&self.strategy, lineage, walk)
    }

    /// Lazily yields every value in `scope`.
    pub fn iter_values(&self, scope: Scope<&S::Key>) -> Values<'_, S, V> {
        self.iter_values_parts_owned(scope.map(|key| self.strategy.to_parts(key)))
    }

    pub fn iter_values_parts(&self, scope: Scope<&[S::Part]>) -> Values<'_, S, V> {
        self.iter_values_parts_owned(scope.map(<[S::Part]>::to_vec))
    }

    fn iter_values_parts_owned(&self, scope: Scope<Vec<S::Part>>) -> Values<'_, S, V> {
        let (lineage, walk) = self.resolve_scope(scope);
        Values::new(lineage, walk)
    }

    /// Lazily yields a `(key, value)` pair for every value in `scope`.
    pub fn iter_items(&self, scope: Scope<&S::Key>) -> Items<'_, S, V> {
        self.iter_items_parts_owned(scope.map(|key| self.strategy.to_parts(key)))
    }

    pub fn iter_items_parts(&self, scope: Scope<&[S::Part]>) -> Items<'_, S, V> {
        self.iter_items_parts_owned(scope.map(<[S::Part]>::to_vec))
    }

    fn iter_items_parts_owned(&self, scope: Scope<Vec<S::Part>>) -> Items<'_, S, V> {
        let (lineage, walk) = self.resolve_scope(scope);
        Items::new(&self.strategy, lineage, walk)
    }

    /// Eager form of [`iter_keys`](Self::iter_keys).
    pub fn keys(&self, scope: Scope<&S::Key>) -> Vec<S::Key> {
        self.iter_keys(scope).collect()
    }

    /// Eager form of [`iter_values`](Self::iter_values).
    pub fn values(&self, scope: Scope<&S::Key>) -> Vec<&V> {
        self.iter_values(scope).collect()
    }

    /// Eager form of [`iter_items`](Self::iter_items).
    pub fn items(&self, scope: Scope<&S::Key>) -> Vec<(S::Key, &V)> {
        self.iter_items(scope).collect()
    }

    // ---------------------------------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------------------------------

    /// Appends `value` to the values at `key`, creating the path as needed.
    pub fn add(&mut self, key: &S::Key, value: V) {
        let parts = self.strategy.to_parts(key);
        self.add_parts(&parts, value);
    }

    pub fn add_parts(&mut self, parts: &[S::Part], value: V) {
        self.root.path_or_insert(parts).values.push(value);
    }

    /// Removes one occurrence of `value` from `key` and returns it, pruning any nodes the
    /// removal left empty.
    pub fn remove<Q>(&mut self, key: &S::Key, value: &Q) -> Result<V>
    where
        V: PartialEq<Q>,
        Q: ?Sized,
    {
        let parts = self.strategy.to_parts(key);
        self.remove_parts(&parts, value)
    }

    pub fn remove_parts<Q>(&mut self, parts: &[S::Part], value: &Q) -> Result<V>
    where
        V: PartialEq<Q>,
        Q: ?Sized,
    {
        let node = self.find_mut(parts)?;
        let pos = node
            .values
            .iter()
            .position(|v| v == value)
            .ok_or(TrieError::ValueNotFound)?;
        let removed = node.values.remove(pos);
        self.prune(parts);
        Ok(removed)
    }

    /// Moves every value and descendant at `src` under `dest`, merging with whatever is
    /// already there. Nothing at `src` is a no-op.
    ///
    /// The source subtree is detached as a unit before the destination path is created, so
    /// overlapping paths are well defined: moving a key into its own descendant nests the old
    /// subtree under the new location, and moving into an ancestor merges upward.
    pub fn move_subtree(&mut self, src: &S::Key, dest: &S::Key) {
        let src = self.strategy.to_parts(src);
        let dest = self.strategy.to_parts(dest);
        self.move_subtree_parts(&src, &dest);
    }

    pub fn move_subtree_parts(&mut self, src: &[S::Part], dest: &[S::Part]) {
        if src == dest {
            return;
        }
        let Some(subtree) = self.detach(src) else {
            debug!("move: no node at source (depth {}); nothing to do", src.len());
            return;
        };

        self.root.path_or_insert(dest).absorb(subtree);
        debug!(
            "move: relinked subtree from depth {} to depth {}",
            src.len(),
            dest.len()
        );

        self.prune(src);
        self.prune(dest);
    }

    /// Like [`move_subtree`](Self::move_subtree), but only values for which
    /// `predicate(src_key, dest_key, value)` answers `true` migrate. The keys passed are
    /// those of the node the value sits on and of its counterpart under `dest`.
    ///
    /// Rejected values never leave their node, so they keep their order and the source
    /// nodes keep their place among their siblings. Accepted values are appended after
    /// whatever the destination already holds.
    pub fn move_subtree_if<F>(&mut self, src: &S::Key, dest: &S::Key, predicate: F)
    where
        F: FnMut(&S::Key, &S::Key, &V) -> bool,
    {
        let src = self.strategy.to_parts(src);
        let dest = self.strategy.to_parts(dest);
        self.move_subtree_parts_if(&src, &dest, predicate);
    }

    pub fn move_subtree_parts_if<F>(
        &mut self,
        src: &[S::Part],
        dest: &[S::Part],
        mut predicate: F,
    ) where
        F: FnMut(&S::Key, &S::Key, &V) -> bool,
    {
        if src == dest {
            return;
        }
        let Ok(slot) = self.find_mut(src) else {
            debug!("move: no node at source (depth {}); nothing to do", src.len());
            return;
        };

        // Lift the source out of its slot, split it, and put what stays back in the same slot.
        let subtree = std::mem::take(slot);
        let (kept, moved) = split_off_if(
            &self.strategy,
            subtree,
            &mut src.to_vec(),
            &mut dest.to_vec(),
            &mut predicate,
        );
        if let Ok(slot) = self.find_mut(src) {
            *slot = kept;
        }

        if !moved.is_empty() {
            self.root.path_or_insert(dest).absorb(moved);
            debug!(
                "move: merged filtered subtree from depth {} to depth {}",
                src.len(),
                dest.len()
            );
        }

        self.prune(src);
        self.prune(dest);
    }

    /// Removes every value and node, leaving the trie as freshly constructed.
    pub fn clear(&mut self) {
        debug!("clear");
        self.root.clear();
    }

    /// Unlinks the subtree at `parts` from its parent and hands it over. The root cannot be
    /// unlinked, so its contents are taken instead.
    fn detach(&mut self, parts: &[S::Part]) -> Option<Node<S::Part, V>> {
        let Some((last, parent_parts)) = parts.split_last() else {
            return Some(std::mem::take(&mut self.root));
        };
        self.find_mut(parent_parts).ok()?.delete_child(last)
    }

    /// Detaches the nodes along `parts` that hold nothing once the empty nodes below them are
    /// gone. Stops climbing at the first node that still holds something; the root is never
    /// detached. Returns how many nodes were removed.
    fn prune(&mut self, parts: &[S::Part]) -> usize {
        // chain[i] is the node at parts[..=i].
        let mut chain = Vec::with_capacity(parts.len());
        let mut node = &self.root;
        for part in parts {
            match node.seek_child(part) {
                Some(child) => {
                    chain.push(child);
                    node = child;
                }
                None => break,
            }
        }

        let mut cut = None;
        let mut child_cut = false;
        for (i, node) in chain.iter().enumerate().rev() {
            let remaining_children = node.num_children() - usize::from(child_cut);
            if !node.values.is_empty() || remaining_children > 0 {
                break;
            }
            cut = Some(i);
            child_cut = true;
        }
        let Some(cut) = cut else {
            return 0;
        };
        let removed = chain.len() - cut;

        if let Ok(parent) = self.find_mut(&parts[..cut]) {
            parent.delete_child(&parts[cut]);
        }
        trace!("pruned {removed} empty node(s) below depth {cut}");
        removed
    }
}

struct SplitFrame<P, V> {
    part: Option<P>,
    kept: Node<P, V>,
    moved: Node<P, V>,
    pending: std::vec::IntoIter<(P, Node<P, V>)>,
}

impl<P: Clone + Eq + std::hash::Hash, V> SplitFrame<P, V> {
    fn open<S, F>(
        strategy: &S,
        part: Option<P>,
        mut kept: Node<P, V>,
        src_parts: &[P],
        dest_parts: &[P],
        predicate: &mut F,
    ) -> Self
    where
        S: KeyStrategy<Part = P>,
        F: FnMut(&S::Key, &S::Key, &V) -> bool,
    {
        let mut moved = Node::new();
        if !kept.values.is_empty() {
            let src_key = strategy.to_key(src_parts);
            let dest_key = strategy.to_key(dest_parts);
            // Work from a snapshot: survivors are pushed back onto the emptied vector.
            for value in std::mem::take(&mut kept.values) {
                if predicate(&src_key, &dest_key, &value) {
                    moved.values.push(value);
                } else {
                    kept.values.push(value);
                }
            }
        }
        let pending = kept.take_children().into_iter();
        Self {
            part,
            kept,
            moved,
            pending,
        }
    }
}

/// Splits `src` into what `predicate` rejects and what it accepts, walking the subtree
/// pre-order. Both halves keep the original sibling order and neither contains empty nodes
/// below its root.
fn split_off_if<S, V, F>(
    strategy: &S,
    src: Node<S::Part, V>,
    src_parts: &mut Vec<S::Part>,
    dest_parts: &mut Vec<S::Part>,
    predicate: &mut F,
) -> (Node<S::Part, V>, Node<S::Part, V>)
where
    S: KeyStrategy,
    F: FnMut(&S::Key, &S::Key, &V) -> bool,
{
    let root = SplitFrame::open(strategy, None, src, src_parts, dest_parts, predicate);
    let mut stack = vec![root];
    let mut halves = (Node::new(), Node::new());

    while let Some(frame) = stack.last_mut() {
        if let Some((part, child)) = frame.pending.next() {
            src_parts.push(part.clone());
            dest_parts.push(part.clone());
            let child_frame =
                SplitFrame::open(strategy, Some(part), child, src_parts, dest_parts, predicate);
            stack.push(child_frame);
            continue;
        }

        let Some(done) = stack.pop() else {
            break;
        };
        match (stack.last_mut(), done.part) {
            (Some(parent), Some(part)) => {
                src_parts.pop();
                dest_parts.pop();
                if !done.kept.is_empty() {
                    parent.kept.add_child(part.clone(), done.kept);
                }
                if !done.moved.is_empty() {
                    parent.moved.add_child(part, done.moved);
                }
            }
            _ => halves = (done.kept, done.moved),
        }
    }
    halves
}

impl<'a, S: KeyStrategy, V> IntoIterator for &'a MultiTrie<S, V> {
    type Item = S::Key;
    type IntoIter = Keys<'a, S, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: KeyStrategy, V> Extend<(S::Key, V)> for MultiTrie<S, V> {
    fn extend<I: IntoIterator<Item = (S::Key, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(&key, value);
        }
    }
}

impl<S: KeyStrategy + Default, V> FromIterator<(S::Key, V)> for MultiTrie<S, V> {
    fn from_iter<I: IntoIterator<Item = (S::Key, V)>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}

impl<S, V> std::fmt::Debug for MultiTrie<S, V>
where
    S: KeyStrategy,
    S::Key: std::fmt::Debug,
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter_items(Scope::All)).finish()
    }
}
