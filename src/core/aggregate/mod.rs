//! Pure aggregations over normalized source records
//!
//! Nothing here performs I/O or retries: every function takes records
//! and returns owned view models ready for serialization.
//!
//! - [`usage`] - usage-analytics summaries shared by both acquisition modes
//! - [`insider`] - marketing-automation event and parameter analysis
//! - [`gtm`] - tag-management container analysis

pub mod gtm;
pub mod insider;
pub mod usage;

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Value → occurrence count, serialized as a JSON object
pub type Counts = BTreeMap<String, usize>;

/// One entry of a ranked (most common first) list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCount {
    pub name: String,
    pub count: usize,
}

/// Counts every value, empty strings included
pub fn tally<'a, I>(values: I) -> Counts
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = Counts::new();
    for value in values {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Counts every non-empty value
pub fn tally_non_empty<'a, I>(values: I) -> Counts
where
    I: IntoIterator<Item = &'a str>,
{
    tally(values.into_iter().filter(|v| !v.is_empty()))
}

/// Groups values by key, keeping keys in first-encounter order
pub fn group_in_order<K, T, I>(items: I) -> Vec<(K, Vec<T>)>
where
    K: Eq + std::hash::Hash + Clone,
    I: IntoIterator<Item = (K, T)>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();
    for (key, item) in items {
        match index.get(&key) {
            Some(&position) => groups[position].1.push(item),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![item]));
            }
        }
    }
    groups
}

/// The `limit` most frequent values, ties kept in first-encounter order
pub fn most_common<'a, I>(values: I, limit: usize) -> Vec<RankedCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ranked: Vec<RankedCount> = group_in_order(values.into_iter().map(|v| (v, ())))
        .into_iter()
        .map(|(name, hits)| RankedCount {
            name: name.to_string(),
            count: hits.len(),
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_keeps_empty_values() {
        let counts = tally(["a", "", "a"]);
        assert_eq!(counts.get("a"), Some(&2));
        assert_eq!(counts.get(""), Some(&1));
    }

    #[test]
    fn test_tally_non_empty() {
        let counts = tally_non_empty(["a", "", "b", "a"]);
        assert_eq!(counts.len(), 2);
        assert!(!counts.contains_key(""));
    }

    #[test]
    fn test_most_common_breaks_ties_by_first_encounter() {
        let ranked = most_common(["carol", "alice", "bob", "alice", "bob", "dave"], 3);
        assert_eq!(
            ranked,
            vec![
                RankedCount { name: "alice".to_string(), count: 2 },
                RankedCount { name: "bob".to_string(), count: 2 },
                RankedCount { name: "carol".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_group_in_order() {
        let groups = group_in_order([("b", 1), ("a", 2), ("b", 3)]);
        assert_eq!(groups, vec![("b", vec![1, 3]), ("a", vec![2])]);
    }
}
