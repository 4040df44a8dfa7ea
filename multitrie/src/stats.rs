//! Statistics and introspection for multitries.
//!
//! Useful for:
//! - Understanding memory usage and fan-out patterns
//! - Checking that pruning keeps the structure tight
//! - Benchmarking and tuning key strategies

use crate::keys::KeyStrategy;
use crate::node::Node;
use crate::trie::MultiTrie;

pub trait TrieStatsTrait {
    fn get_trie_stats(&self) -> TrieStats;
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TrieStats {
    /// Every node, the root included.
    pub num_nodes: usize,
    /// Nodes holding at least one value.
    pub num_keys: usize,
    pub num_values: usize,
    pub num_keyed_nodes: usize,
    pub num_indexed_nodes: usize,
    /// Nodes other than the root with neither values nor children. Zero whenever no
    /// operation is in progress.
    pub num_empty_nodes: usize,
    /// Number of parts in the longest path from the root.
    pub max_depth: usize,
    pub max_fanout: usize,
    /// Mean number of children over nodes that have any.
    pub mean_fanout: f64,
}

impl<S: KeyStrategy, V> TrieStatsTrait for MultiTrie<S, V> {
    fn get_trie_stats(&self) -> TrieStats {
        let mut stats = TrieStats::default();
        let mut num_parents = 0;
        let mut num_edges = 0;

        let mut stack: Vec<(usize, &Node<S::Part, V>)> = vec![(0, self.root())];
        while let Some((depth, node)) = stack.pop() {
            stats.num_nodes += 1;
            stats.max_depth = stats.max_depth.max(depth);
            if !node.values.is_empty() {
                stats.num_keys += 1;
                stats.num_values += node.values.len();
            }
            if node.is_indexed() {
                stats.num_indexed_nodes += 1;
            } else {
                stats.num_keyed_nodes += 1;
            }
            if depth > 0 && node.is_empty() {
                stats.num_empty_nodes += 1;
            }

            let fanout = node.num_children();
            stats.max_fanout = stats.max_fanout.max(fanout);
            if fanout > 0 {
                num_parents += 1;
                num_edges += fanout;
            }
            stack.extend(node.entries().iter().map(|(_, child)| (depth + 1, child)));
        }

        if num_parents > 0 {
            stats.mean_fanout = num_edges as f64 / num_parents as f64;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use crate::stats::TrieStatsTrait;
    use crate::trie::SequenceTrie;

    #[test]
    fn test_empty_trie_stats() {
        let trie = SequenceTrie::<u8, u8>::new();
        let stats = trie.get_trie_stats();
        assert_eq!(stats.num_nodes, 1);
        assert_eq!(stats.num_values, 0);
        assert_eq!(stats.max_depth, 0);
        assert_eq!(stats.mean_fanout, 0.0);
    }

    #[test]
    fn test_stats_shape() {
        let mut trie = SequenceTrie::<u16, u16>::new();
        for i in 0..20u16 {
            trie.add(&vec![i], i);
            trie.add(&vec![i], i);
        }
        trie.add(&vec![0, 1, 2], 7);

        let stats = trie.get_trie_stats();
        // root + 20 children + [0, 1] + [0, 1, 2]
        assert_eq!(stats.num_nodes, 23);
        assert_eq!(stats.num_keys, 21);
        assert_eq!(stats.num_values, 41);
        assert_eq!(stats.num_indexed_nodes, 1);
        assert_eq!(stats.num_keyed_nodes, 22);
        assert_eq!(stats.num_empty_nodes, 0);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(stats.max_fanout, 20);
        assert_eq!(stats.mean_fanout, 22.0 / 3.0);
    }
}
