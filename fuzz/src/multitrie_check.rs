#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use multitrie::{Scope, SequenceTrie, TrieStatsTrait};

#[derive(Arbitrary, Debug)]
enum TrieMethod {
    Get { key: Vec<u8> },
    Add { key: Vec<u8>, val: u8 },
    Remove { key: Vec<u8>, val: u8 },
    Move { src: Vec<u8>, dest: Vec<u8> },
    MoveIf { src: Vec<u8>, dest: Vec<u8>, val: u8 },
    Prefix { key: Vec<u8> },
    Clear,
}

// Keep the part alphabet and depth small so paths share prefixes.
fn norm(key: &[u8]) -> Vec<u8> {
    key.iter().take(5).map(|b| b % 4).collect()
}

fn model_move(model: &mut BTreeMap<Vec<u8>, Vec<u8>>, src: &[u8], dest: &[u8], val: Option<u8>) {
    if src == dest {
        return;
    }
    let under: Vec<Vec<u8>> = model.keys().filter(|k| k.starts_with(src)).cloned().collect();
    let mut moved = Vec::new();
    for k in under {
        let Some(vs) = model.remove(&k) else { continue };
        let (go, stay): (Vec<u8>, Vec<u8>) = match val {
            Some(val) => vs.into_iter().partition(|v| *v == val),
            None => (vs, Vec::new()),
        };
        if !stay.is_empty() {
            model.insert(k.clone(), stay);
        }
        if !go.is_empty() {
            let mut nk = dest.to_vec();
            nk.extend_from_slice(&k[src.len()..]);
            moved.push((nk, go));
        }
    }
    for (k, vs) in moved {
        model.entry(k).or_default().extend(vs);
    }
}

fuzz_target!(|methods: Vec<TrieMethod>| {
    let mut trie = SequenceTrie::<u8, u8>::new();
    let mut bt_map = BTreeMap::<Vec<u8>, Vec<u8>>::new();

    for m in methods.iter().take(4096) {
        match m {
            TrieMethod::Get { key } => {
                let key = norm(key);
                let trie_v = trie.get(&key).ok().filter(|vs| !vs.is_empty());
                let bt_v = bt_map.get(&key).map(|vs| vs.as_slice());
                assert_eq!(trie_v, bt_v);
            }
            TrieMethod::Add { key, val } => {
                let key = norm(key);
                trie.add(&key, *val);
                bt_map.entry(key).or_default().push(*val);
            }
            TrieMethod::Remove { key, val } => {
                let key = norm(key);
                let trie_r = trie.remove(&key, val).ok();
                let bt_r = bt_map.get_mut(&key).and_then(|vs| {
                    let pos = vs.iter().position(|v| v == val)?;
                    Some(vs.remove(pos))
                });
                if bt_map.get(&key).is_some_and(|vs| vs.is_empty()) {
                    bt_map.remove(&key);
                }
                eprintln!("Remove: {:?} {:?} {:?}", key, val, trie_r);
                assert_eq!(trie_r, bt_r);
            }
            TrieMethod::Move { src, dest } => {
                let (src, dest) = (norm(src), norm(dest));
                trie.move_subtree(&src, &dest);
                model_move(&mut bt_map, &src, &dest, None);
            }
            TrieMethod::MoveIf { src, dest, val } => {
                let (src, dest) = (norm(src), norm(dest));
                trie.move_subtree_if(&src, &dest, |_, _, v| v == val);
                model_move(&mut bt_map, &src, &dest, Some(*val));
            }
            TrieMethod::Prefix { key } => {
                let key = norm(key);
                let trie_n = trie.iter_values(Scope::Prefix(&key)).count();
                let bt_n: usize = bt_map
                    .iter()
                    .filter(|(k, _)| k.starts_with(&key))
                    .map(|(_, vs)| vs.len())
                    .sum();
                assert_eq!(trie_n, bt_n);
            }
            TrieMethod::Clear => {
                trie.clear();
                bt_map.clear();
            }
        }
        assert_eq!(trie.get_trie_stats().num_empty_nodes, 0);
    }

    for (k, expected) in bt_map.iter() {
        let result = trie.get(k);
        eprintln!("Cmp key {:?} {:?} {:?}", k, result, expected);
        assert_eq!(result, Ok(expected.as_slice()), "values differ for key {:?}", k);
    }
    assert_eq!(trie.keys(Scope::All).len(), bt_map.len());
});
