//! # multitrie
//!
//! An in-memory prefix trie mapping composite keys to ordered multisets of values.
//!
//! Each key is a path of parts; every node along the path may hold values of its own, so a
//! key is simultaneously an entry and a prefix of deeper entries. On top of point lookup,
//! insertion and removal the trie offers subtree enumeration, inheritance-style ancestor
//! queries, and moving or merging whole subtrees, optionally filtered value by value.
//!
//! ```rust
//! use multitrie::{Scope, SequenceTrie};
//!
//! let mut trie = SequenceTrie::<&str, u32>::new();
//! trie.add(&vec!["a"], 1);
//! trie.add(&vec!["a", "b"], 2);
//! trie.add(&vec!["c"], 3);
//!
//! assert_eq!(trie.keys(Scope::Prefix(&vec!["a"])), vec![vec!["a"], vec!["a", "b"]]);
//!
//! trie.move_subtree(&vec!["a"], &vec!["c"]);
//! assert_eq!(trie.get(&vec!["c"]).unwrap(), &[3, 1]);
//! assert_eq!(trie.get(&vec!["c", "b"]).unwrap(), &[2]);
//! ```
//!
//! A trie is a plain owned value with no internal locking. Share one between threads behind
//! a lock that serializes every operation, moves included.

pub mod error;
pub mod iter;
pub mod keys;
pub mod mapping;
mod node;
pub mod stats;
pub mod trie;

pub use error::{Result, TrieError};
pub use iter::{Items, Keys, Values};
pub use keys::{DelimitedKeys, KeyFns, KeyStrategy, SequenceKeys};
pub use stats::{TrieStats, TrieStatsTrait};
pub use trie::{MultiTrie, PathTrie, Scope, SequenceTrie};
