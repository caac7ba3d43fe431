//! Three-way comparison of keyed collections.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::hash::Hash;

use indexmap::IndexMap;
use spanner_ddl_core::ast::OptionList;

/// A key present on both sides with differing values.
#[derive(Debug, Clone, Copy)]
pub struct ValueDifference<'a, K, V> {
    /// The shared key.
    pub key: &'a K,
    /// Value in the original collection.
    pub old: &'a V,
    /// Value in the new collection.
    pub new: &'a V,
}

/// Result of comparing two keyed collections.
///
/// `removed` and `changed` follow the original collection's order;
/// `added` follows the new collection's order. Unchanged entries are not
/// materialized.
#[derive(Debug, Clone)]
pub struct MapDifference<'a, K, V> {
    /// Entries only in the original collection.
    pub removed: Vec<(&'a K, &'a V)>,
    /// Entries only in the new collection.
    pub added: Vec<(&'a K, &'a V)>,
    /// Entries in both whose values differ.
    pub changed: Vec<ValueDifference<'a, K, V>>,
}

impl<K, V> MapDifference<'_, K, V> {
    /// Returns true if the two collections are equal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty() && self.changed.is_empty()
    }
}

/// Compares two collections using `equal` on values sharing a key.
pub fn diff_maps<'a, K, V, F>(
    original: &'a IndexMap<K, V>,
    new: &'a IndexMap<K, V>,
    equal: F,
) -> MapDifference<'a, K, V>
where
    K: Hash + Eq,
    F: Fn(&V, &V) -> bool,
{
    let mut removed = Vec::new();
    let mut changed = Vec::new();
    for (key, old) in original {
        match new.get(key) {
            None => removed.push((key, old)),
            Some(new_value) if !equal(old, new_value) => changed.push(ValueDifference {
                key,
                old,
                new: new_value,
            }),
            Some(_) => {}
        }
    }
    let added = new
        .iter()
        .filter(|(key, _)| !original.contains_key(*key))
        .collect();

    MapDifference {
        removed,
        added,
        changed,
    }
}

/// Compares two collections by canonical rendering.
pub fn diff_rendered<'a, K, V>(
    original: &'a IndexMap<K, V>,
    new: &'a IndexMap<K, V>,
) -> MapDifference<'a, K, V>
where
    K: Hash + Eq,
    V: Display,
{
    diff_maps(original, new, |a, b| a.to_string() == b.to_string())
}

/// Builds the `k=v,...` body of a `SET OPTIONS (...)` clause.
///
/// Keys removed in `new` are set to `NULL`; keys added or changed take
/// their new value. Entries are sorted by key. Returns `None` when the two
/// maps are equal.
#[must_use]
pub fn options_delta(
    old: &BTreeMap<String, String>,
    new: &BTreeMap<String, String>,
) -> Option<String> {
    let mut delta: BTreeMap<&str, &str> = BTreeMap::new();
    for key in old.keys() {
        if !new.contains_key(key) {
            delta.insert(key, "NULL");
        }
    }
    for (key, value) in new {
        if old.get(key) != Some(value) {
            delta.insert(key, value);
        }
    }
    if delta.is_empty() {
        return None;
    }
    Some(
        delta
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(","),
    )
}

/// [`options_delta`] over optional `OPTIONS` clauses.
#[must_use]
pub fn option_list_delta(old: Option<&OptionList>, new: Option<&OptionList>) -> Option<String> {
    let to_map = |list: Option<&OptionList>| list.map(OptionList::to_map).unwrap_or_default();
    options_delta(&to_map(old), &to_map(new))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> IndexMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn options(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_three_way_partition() {
        let original = map(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let new = map(&[("d", "4"), ("c", "30"), ("a", "1")]);
        let diff = diff_rendered(&original, &new);

        let removed: Vec<_> = diff.removed.iter().map(|(k, _)| k.as_str()).collect();
        let added: Vec<_> = diff.added.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(removed, vec!["b"]);
        assert_eq!(added, vec!["d"]);
        assert_eq!(diff.changed.len(), 1);
        assert_eq!(diff.changed[0].key, "c");
        assert_eq!(diff.changed[0].old, "3");
        assert_eq!(diff.changed[0].new, "30");
    }

    #[test]
    fn test_equal_maps() {
        let original = map(&[("a", "1")]);
        assert!(diff_rendered(&original, &original.clone()).is_empty());
    }

    #[test]
    fn test_order_follows_each_side() {
        let original = map(&[("z", "1"), ("y", "1"), ("x", "1")]);
        let new = map(&[("c", "1"), ("b", "1"), ("a", "1")]);
        let diff = diff_rendered(&original, &new);
        let removed: Vec<_> = diff.removed.iter().map(|(k, _)| k.as_str()).collect();
        let added: Vec<_> = diff.added.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(removed, vec!["z", "y", "x"]);
        assert_eq!(added, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_options_delta() {
        let old = options(&[("b", "1"), ("a", "2"), ("gone", "TRUE")]);
        let new = options(&[("b", "1"), ("a", "3"), ("added", "'x'")]);
        assert_eq!(
            options_delta(&old, &new).as_deref(),
            Some("a=3,added='x',gone=NULL")
        );
        assert_eq!(options_delta(&old, &old), None);
    }
}
