//! Threshold queries over a finished count table

use core::hash::Hash;

use super::exact::ExactCounts;
use super::summary::ErrorSummary;
use crate::config::LossyConfig;
use crate::frequency::CountTable;
use crate::math;
use crate::traits::QueryError;

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Exact-versus-estimated comparison for one reported symbol
///
/// Frequencies and absolute error are percentages of the respective stream
/// lengths. `relative_error` is `absolute_error / exact_frequency` and is NaN
/// when the exact frequency is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ItemMetrics {
    /// Count held in the table
    pub estimated_count: u64,
    /// 1-based rank among all tracked symbols
    pub estimated_rank: usize,
    /// `100 * count / n`
    pub estimated_frequency: f64,
    /// Rank in the exact counts, `None` if the symbol is missing there
    pub exact_rank: Option<usize>,
    /// `100 * exact_count / exact_total`
    pub exact_frequency: f64,
    /// Reported although the true frequency is below the threshold
    pub false_positive: bool,
    /// `|exact_frequency - estimated_frequency|`
    pub absolute_error: f64,
    /// `absolute_error / exact_frequency`
    pub relative_error: f64,
}

impl ItemMetrics {
    /// Check if the estimated rank differs from the exact one
    pub fn rank_misplaced(&self) -> bool {
        self.exact_rank != Some(self.estimated_rank)
    }

    /// Check if the relative error is defined
    pub fn has_relative_error(&self) -> bool {
        !self.relative_error.is_nan()
    }
}

/// A validated frequency query
///
/// Reports every tracked symbol whose count reaches `(s - ε) * n`. For
/// `s > ε` any symbol with true frequency at least `s` is reported; symbols
/// with true frequency in `[s - ε, s)` may show up as false positives. At
/// `s == ε` every tracked symbol passes the filter, but a symbol with true
/// frequency exactly `ε` may already have been pruned.
///
/// # Example
///
/// ```
/// use lossycount::query::{ExactCounts, FrequencyQuery};
/// use lossycount::frequency::IndividualDeltaCounter;
/// use lossycount::traits::LossyCounter;
///
/// let stream: Vec<char> = "aaaaaaaaaabbbbbcd".chars().collect();
/// let exact: ExactCounts<char> = stream.iter().copied().collect();
///
/// let mut lc = IndividualDeltaCounter::new(0.05).unwrap();
/// lc.ingest_all(stream);
///
/// let query = FrequencyQuery::new(0.05, 0.25).unwrap();
/// let result = query.run(lc.table(), lc.stream_len(), &exact);
///
/// assert_eq!(result.symbols(), vec![&'a', &'b']);
/// assert!(!result.get(&'a').unwrap().false_positive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyQuery {
    epsilon: f64,
    threshold: f64,
}

impl FrequencyQuery {
    /// Validate a threshold against a counter's epsilon
    ///
    /// # Errors
    ///
    /// - [`QueryError::InvalidEpsilon`] if `epsilon` is not in (0, 1)
    /// - [`QueryError::InvalidThreshold`] if `threshold` is not in (0, 1)
    /// - [`QueryError::ThresholdBelowEpsilon`] if `threshold < epsilon`
    pub fn new(epsilon: f64, threshold: f64) -> Result<Self, QueryError> {
        if LossyConfig::new(epsilon).is_err() {
            #[cfg(feature = "tracing")]
            tracing::debug!(epsilon, "rejected frequency query");
            return Err(QueryError::InvalidEpsilon(epsilon));
        }
        if !(threshold > 0.0 && threshold < 1.0) {
            #[cfg(feature = "tracing")]
            tracing::debug!(threshold, "rejected frequency query");
            return Err(QueryError::InvalidThreshold(threshold));
        }
        if threshold < epsilon {
            #[cfg(feature = "tracing")]
            tracing::debug!(threshold, epsilon, "rejected frequency query below epsilon");
            return Err(QueryError::ThresholdBelowEpsilon { threshold, epsilon });
        }
        Ok(Self { epsilon, threshold })
    }

    /// Requested frequency threshold `s`
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Epsilon of the counter being queried
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Smallest count reported for a stream of length `n`
    pub fn min_count(&self, stream_len: u64) -> f64 {
        (self.threshold - self.epsilon) * stream_len as f64
    }

    /// Run the query over a table built from `stream_len` symbols
    ///
    /// `stream_len` must be the stream position of the counter that owns
    /// `table`. A zero length yields estimated frequencies of zero.
    pub fn run<T>(
        &self,
        table: &CountTable<T>,
        stream_len: u64,
        exact: &ExactCounts<T>,
    ) -> QueryResult<T>
    where
        T: Hash + Ord + Clone + core::fmt::Debug,
    {
        let min_count = self.min_count(stream_len);

        let items = table
            .ranked()
            .into_iter()
            .enumerate()
            .filter(|(_, (_, entry))| entry.count as f64 >= min_count)
            .map(|(i, (item, entry))| {
                let metrics = self.measure(item, entry.count, i + 1, stream_len, exact);
                (item.clone(), metrics)
            })
            .collect();

        QueryResult {
            threshold: self.threshold,
            epsilon: self.epsilon,
            stream_len,
            items,
        }
    }

    fn measure<T: Ord + Clone>(
        &self,
        item: &T,
        count: u64,
        rank: usize,
        stream_len: u64,
        exact: &ExactCounts<T>,
    ) -> ItemMetrics {
        let estimated_frequency = if stream_len == 0 {
            0.0
        } else {
            100.0 * count as f64 / stream_len as f64
        };
        let exact_fraction = exact.frequency(item);
        let exact_frequency = 100.0 * exact_fraction;
        let absolute_error = math::abs(exact_frequency - estimated_frequency);
        let relative_error = if exact_frequency == 0.0 {
            f64::NAN
        } else {
            absolute_error / exact_frequency
        };

        ItemMetrics {
            estimated_count: count,
            estimated_rank: rank,
            estimated_frequency,
            exact_rank: exact.rank(item),
            exact_frequency,
            false_positive: exact_fraction < self.threshold,
            absolute_error,
            relative_error,
        }
    }
}

/// Symbols reported by a [`FrequencyQuery`], in estimated-rank order
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QueryResult<T> {
    threshold: f64,
    epsilon: f64,
    stream_len: u64,
    items: Vec<(T, ItemMetrics)>,
}

impl<T: PartialEq> QueryResult<T> {
    /// Threshold the result was computed for
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Epsilon of the queried counter
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Stream length of the queried counter
    pub fn stream_len(&self) -> u64 {
        self.stream_len
    }

    /// Metrics of a reported symbol
    pub fn get(&self, item: &T) -> Option<&ItemMetrics> {
        self.items.iter().find(|(k, _)| k == item).map(|(_, m)| m)
    }

    /// Check if a symbol was reported
    pub fn contains(&self, item: &T) -> bool {
        self.get(item).is_some()
    }

    /// Iterate over reported symbols and their metrics
    pub fn iter(&self) -> impl Iterator<Item = (&T, &ItemMetrics)> {
        self.items.iter().map(|(k, m)| (k, m))
    }

    /// Reported symbols, most frequent first
    pub fn symbols(&self) -> Vec<&T> {
        self.items.iter().map(|(k, _)| k).collect()
    }

    /// Reported symbols whose true frequency is below the threshold
    pub fn false_positives(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|(_, m)| m.false_positive)
            .map(|(k, _)| k)
            .collect()
    }

    /// Number of reported symbols
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing was reported
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Averaged error metrics, `None` when nothing was reported
    pub fn summary(&self) -> Option<ErrorSummary> {
        ErrorSummary::from_metrics(self.items.iter().map(|(_, m)| m))
    }
}
