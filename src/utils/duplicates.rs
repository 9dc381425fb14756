//! Duplicate key detection for submitted id lists.

use std::collections::HashSet;
use std::hash::Hash;

/// Returns `true` if two or more items map to the same key.
///
/// The key is produced by `key_fn`; pass `|x| *x` (or `Clone::clone`) to
/// compare the items themselves. An empty collection has no duplicates.
///
/// # Examples
///
/// ```ignore
/// assert!(contains_duplicates(&[1, 2, 1], |x| **x));
/// assert!(!contains_duplicates(&[(1, 5), (2, 5)], |(id, _)| *id));
/// ```
pub fn contains_duplicates<I, K, F>(items: I, mut key_fn: F) -> bool
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> K,
    K: Eq + Hash,
{
    let mut seen = HashSet::new();

    items.into_iter().any(|item| !seen.insert(key_fn(&item)))
}
