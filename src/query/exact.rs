//! Exact per-symbol counts used as ground truth by queries

#[cfg(feature = "std")]
use std::{collections::BTreeMap, vec::Vec};

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeMap, vec::Vec};

/// Exact counts, total and ranks of a stream
///
/// Produced by whoever generated the stream and injected into queries; the
/// counters themselves never look at it. Ranks are 1-based, ordered by count
/// descending with ties broken by symbol ascending.
///
/// # Example
///
/// ```
/// use lossycount::query::ExactCounts;
///
/// let exact: ExactCounts<char> = "banana".chars().collect();
///
/// assert_eq!(exact.total(), 6);
/// assert_eq!(exact.count(&'a'), 3);
/// assert_eq!(exact.rank(&'a'), Some(1));
/// assert_eq!(exact.rank(&'n'), Some(2));
/// assert_eq!(exact.rank(&'z'), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExactCounts<T: Ord + Clone> {
    counts: BTreeMap<T, u64>,
    ranks: BTreeMap<T, usize>,
    total: u64,
}

impl<T: Ord + Clone> ExactCounts<T> {
    /// Count every symbol of a stream
    pub fn from_stream<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut counts = BTreeMap::new();
        let mut total = 0u64;
        for item in items {
            *counts.entry(item).or_insert(0u64) += 1;
            total += 1;
        }
        Self::build(counts, total)
    }

    /// Use externally computed counts and stream length
    ///
    /// `total` is taken as given even if it disagrees with the sum of counts.
    /// Repeated symbols have their counts added.
    pub fn from_counts<I>(counts: I, total: u64) -> Self
    where
        I: IntoIterator<Item = (T, u64)>,
    {
        let mut map = BTreeMap::new();
        for (item, count) in counts {
            *map.entry(item).or_insert(0u64) += count;
        }
        Self::build(map, total)
    }

    fn build(counts: BTreeMap<T, u64>, total: u64) -> Self {
        let mut order: Vec<(&T, &u64)> = counts.iter().collect();
        // BTreeMap iteration is already by symbol, a stable sort keeps ties ordered
        order.sort_by(|a, b| b.1.cmp(a.1));
        let ranks = order
            .into_iter()
            .enumerate()
            .map(|(i, (item, _))| (item.clone(), i + 1))
            .collect();

        Self {
            counts,
            ranks,
            total,
        }
    }

    /// Exact count of a symbol (0 if never seen)
    pub fn count(&self, item: &T) -> u64 {
        self.counts.get(item).copied().unwrap_or(0)
    }

    /// Exact rank of a symbol
    pub fn rank(&self, item: &T) -> Option<usize> {
        self.ranks.get(item).copied()
    }

    /// Exact frequency of a symbol as a fraction of the total
    ///
    /// Returns 0.0 for an empty stream.
    pub fn frequency(&self, item: &T) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.count(item) as f64 / self.total as f64
        }
    }

    /// Exact stream length
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct symbols
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if no symbol was counted
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Symbols with their counts, in rank order
    pub fn ranked(&self) -> Vec<(&T, u64)> {
        let mut order: Vec<(&T, u64)> = self.counts.iter().map(|(k, &v)| (k, v)).collect();
        order.sort_by(|a, b| b.1.cmp(&a.1));
        order
    }
}

impl<T: Ord + Clone> FromIterator<T> for ExactCounts<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_stream(iter)
    }
}
