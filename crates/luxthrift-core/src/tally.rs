//! Count-and-rank helper shared by the insight queries.

use std::collections::HashMap;
use std::hash::Hash;

/// Counts occurrences of each key and returns `(key, count)` pairs sorted by
/// count, highest first.
///
/// Keys with equal counts keep the order in which they were first seen.
pub fn rank_by_count<K, I>(keys: I) -> Vec<(K, u64)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut ranked: Vec<(K, u64)> = Vec::new();

    for key in keys {
        if let Some(&slot) = index.get(&key) {
            ranked[slot].1 += 1;
        } else {
            index.insert(key.clone(), ranked.len());
            ranked.push((key, 1));
        }
    }

    // `sort_by` is stable, so first-seen order breaks ties.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}
