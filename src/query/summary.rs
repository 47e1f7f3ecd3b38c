//! Aggregate error metrics and side-by-side comparison of the two variants

use super::frequent::{ItemMetrics, QueryResult};

#[cfg(feature = "std")]
use std::{collections::BTreeMap, vec::Vec};

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeMap, vec::Vec};

/// Averaged error metrics of one query result
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ErrorSummary {
    /// Number of reported symbols
    pub reported: usize,
    /// Mean absolute error, in percentage points
    pub mean_absolute_error: f64,
    /// Mean relative error over symbols where it is defined (NaN if none)
    pub mean_relative_error: f64,
    /// Number of false positives
    pub false_positives: usize,
    /// Share of reported symbols that are false positives, in percent
    pub false_positive_pct: f64,
    /// Share of reported symbols whose estimated rank is wrong, in percent
    pub rank_misplacement_pct: f64,
}

impl ErrorSummary {
    /// Average a set of per-symbol metrics, `None` if empty
    pub fn from_metrics<'a, I>(metrics: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a ItemMetrics>,
    {
        let mut reported = 0usize;
        let mut abs_sum = 0.0;
        let mut rel_sum = 0.0;
        let mut rel_defined = 0usize;
        let mut false_positives = 0usize;
        let mut misplaced = 0usize;

        for m in metrics {
            reported += 1;
            abs_sum += m.absolute_error;
            if m.has_relative_error() {
                rel_sum += m.relative_error;
                rel_defined += 1;
            }
            if m.false_positive {
                false_positives += 1;
            }
            if m.rank_misplaced() {
                misplaced += 1;
            }
        }

        if reported == 0 {
            return None;
        }

        let n = reported as f64;
        Some(Self {
            reported,
            mean_absolute_error: abs_sum / n,
            mean_relative_error: if rel_defined == 0 {
                f64::NAN
            } else {
                rel_sum / rel_defined as f64
            },
            false_positives,
            false_positive_pct: 100.0 * false_positives as f64 / n,
            rank_misplacement_pct: 100.0 * misplaced as f64 / n,
        })
    }
}

/// One symbol's metrics under both variants
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ComparisonRow<T> {
    /// The symbol
    pub item: T,
    /// Exact rank, if the symbol appears in the exact counts
    pub exact_rank: Option<usize>,
    /// Metrics from the individual-delta counter, if reported there
    pub individual: Option<ItemMetrics>,
    /// Metrics from the shared-delta counter, if reported there
    pub shared: Option<ItemMetrics>,
}

/// Side-by-side view of the individual-delta and shared-delta results
///
/// Rows cover every symbol reported by either variant, ordered by exact rank;
/// symbols missing from the exact counts come last, by symbol.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VariantComparison<T> {
    rows: Vec<ComparisonRow<T>>,
}

impl<T: Ord + Clone> VariantComparison<T> {
    /// Line up two results computed for the same threshold
    pub fn new(individual: &QueryResult<T>, shared: &QueryResult<T>) -> Self {
        let mut merged: BTreeMap<T, ComparisonRow<T>> = BTreeMap::new();

        for (item, m) in individual.iter() {
            merged
                .entry(item.clone())
                .or_insert_with(|| ComparisonRow::empty(item.clone(), m.exact_rank))
                .individual = Some(*m);
        }
        for (item, m) in shared.iter() {
            merged
                .entry(item.clone())
                .or_insert_with(|| ComparisonRow::empty(item.clone(), m.exact_rank))
                .shared = Some(*m);
        }

        let mut rows: Vec<_> = merged.into_values().collect();
        // BTreeMap order is by symbol, so the stable sort keeps unranked rows ordered
        rows.sort_by_key(|row| row.exact_rank.unwrap_or(usize::MAX));

        Self { rows }
    }

    /// All rows, in exact-rank order
    pub fn rows(&self) -> &[ComparisonRow<T>] {
        &self.rows
    }

    /// Row of a symbol
    pub fn get(&self, item: &T) -> Option<&ComparisonRow<T>> {
        self.rows.iter().find(|row| &row.item == item)
    }

    /// Number of symbols reported by either variant
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if neither variant reported anything
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Symbols reported by only one of the variants
    pub fn disagreements(&self) -> Vec<&T> {
        self.rows
            .iter()
            .filter(|row| row.individual.is_some() != row.shared.is_some())
            .map(|row| &row.item)
            .collect()
    }
}

impl<T> ComparisonRow<T> {
    fn empty(item: T, exact_rank: Option<usize>) -> Self {
        Self {
            item,
            exact_rank,
            individual: None,
            shared: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{IndividualDeltaCounter, SharedDeltaCounter};
    use crate::query::ExactCounts;
    use crate::traits::LossyCounter;

    fn metrics(rank: usize, exact_rank: Option<usize>, abs: f64, rel: f64, fp: bool) -> ItemMetrics {
        ItemMetrics {
            estimated_count: 1,
            estimated_rank: rank,
            estimated_frequency: 0.0,
            exact_rank,
            exact_frequency: 0.0,
            false_positive: fp,
            absolute_error: abs,
            relative_error: rel,
        }
    }

    #[test]
    fn test_summary_averages() {
        let all = [
            metrics(1, Some(1), 1.0, 0.1, false),
            metrics(2, Some(3), 3.0, 0.3, true),
            metrics(3, Some(2), 2.0, f64::NAN, false),
            metrics(4, Some(4), 2.0, 0.2, true),
        ];

        let s = ErrorSummary::from_metrics(all.iter()).unwrap();
        assert_eq!(s.reported, 4);
        assert!((s.mean_absolute_error - 2.0).abs() < 1e-12);
        assert!((s.mean_relative_error - 0.2).abs() < 1e-12);
        assert_eq!(s.false_positives, 2);
        assert!((s.false_positive_pct - 50.0).abs() < 1e-12);
        assert!((s.rank_misplacement_pct - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_summary_empty() {
        assert!(ErrorSummary::from_metrics(core::iter::empty()).is_none());
    }

    #[test]
    fn test_summary_all_undefined_relative() {
        let all = [metrics(1, None, 4.0, f64::NAN, true)];
        let s = ErrorSummary::from_metrics(all.iter()).unwrap();
        assert!(s.mean_relative_error.is_nan());
        assert!((s.rank_misplacement_pct - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_comparison_of_variants() {
        let stream = "aaabbc";
        let exact = ExactCounts::from_stream(stream.chars());

        let mut shared = SharedDeltaCounter::new(0.5).unwrap();
        let mut individual = IndividualDeltaCounter::new(0.5).unwrap();
        shared.ingest_all(stream.chars());
        individual.ingest_all(stream.chars());

        let cmp = VariantComparison::new(
            &individual.query(0.5, &exact).unwrap(),
            &shared.query(0.5, &exact).unwrap(),
        );

        assert_eq!(cmp.len(), 3);
        let order: Vec<char> = cmp.rows().iter().map(|r| r.item).collect();
        assert_eq!(order, vec!['a', 'b', 'c']);
        assert!(cmp.rows().iter().all(|r| r.individual.is_none() && r.shared.is_some()));
        assert_eq!(cmp.disagreements().len(), 3);
        assert_eq!(cmp.get(&'b').unwrap().exact_rank, Some(2));
    }

    #[test]
    fn test_comparison_agrees_on_heavy_item() {
        let stream: Vec<u32> = (0..2000u32).map(|i| if i % 3 == 0 { 7 } else { i }).collect();
        let exact: ExactCounts<u32> = stream.iter().copied().collect();

        let mut shared = SharedDeltaCounter::new(0.01).unwrap();
        let mut individual = IndividualDeltaCounter::new(0.01).unwrap();
        shared.ingest_all(stream.iter().copied());
        individual.ingest_all(stream.iter().copied());

        let cmp = VariantComparison::new(
            &individual.query(0.2, &exact).unwrap(),
            &shared.query(0.2, &exact).unwrap(),
        );

        let row = cmp.get(&7).unwrap();
        assert_eq!(row.exact_rank, Some(1));
        assert!(row.individual.is_some());
        assert!(row.shared.is_some());
        assert_eq!(cmp.rows()[0].item, 7);
    }
}
