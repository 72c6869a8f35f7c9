// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use crate::canonical::canonical_map_bytes;
use fscache_types::FsEntry;
use xxhash_rust::xxh64::Xxh64;

/// Seed for the streaming XXH64 hasher. Fixed for the life of a deployment --
/// clients hold their own replica and depend on the server computing hashes
/// the same way release over release.
const HASH_SEED: u64 = 0;

/// Computes a node's Merkle hash from its own metadata and its children's
/// already-computed hashes. Deterministic regardless of the order
/// `children_hashes` is passed in: the hashes are sorted before being fed
/// into the digest.
pub fn hash_node(fs_entry: &FsEntry, children_hashes: &[String]) -> String {
    let mut hasher = Xxh64::new(HASH_SEED);
    hasher.update(&canonical_map_bytes(&fs_entry.metadata));

    let mut sorted: Vec<&str> = children_hashes.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    for child_hash in sorted {
        hasher.update(child_hash.as_bytes());
    }

    hasher.digest().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn entry_with_uid(uid: &str) -> FsEntry {
        let mut map = Map::new();
        map.insert("uid".into(), uid.into());
        FsEntry::new(map)
    }

    #[test]
    fn deterministic_for_same_input() {
        let entry = entry_with_uid("n1");
        let h1 = hash_node(&entry, &["a".into(), "b".into()]);
        let h2 = hash_node(&entry, &["a".into(), "b".into()]);
        assert_eq!(h1, h2);
    }

    #[test]
    fn independent_of_children_hash_order() {
        let entry = entry_with_uid("n1");
        let h1 = hash_node(&entry, &["aaa".into(), "bbb".into(), "ccc".into()]);
        let h2 = hash_node(&entry, &["ccc".into(), "aaa".into(), "bbb".into()]);
        assert_eq!(h1, h2);
    }

    #[test]
    fn different_metadata_yields_different_hash() {
        let h1 = hash_node(&entry_with_uid("n1"), &[]);
        let h2 = hash_node(&entry_with_uid("n2"), &[]);
        assert_ne!(h1, h2);
    }

    #[test]
    fn is_a_decimal_u64() {
        let h = hash_node(&entry_with_uid("n1"), &[]);
        h.parse::<u64>().expect("hash must render as an unsigned decimal integer");
    }

    #[test]
    fn stable_under_random_permutation() {
        use rand::seq::SliceRandom;
        use rand::thread_rng;

        let entry = entry_with_uid("n1");
        let children: Vec<String> = (0..20).map(|i| format!("child-hash-{i}")).collect();
        let baseline = hash_node(&entry, &children);

        let mut shuffled = children.clone();
        shuffled.shuffle(&mut thread_rng());
        assert_eq!(baseline, hash_node(&entry, &shuffled));
    }
}
