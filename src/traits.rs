//! Core traits and error types for lossy counting
//!
//! Both counter variants implement [`LossyCounter`]; they share the same
//! [`CountTable`] shape and differ only in their insertion and prune rules.

use core::fmt::Debug;
use core::hash::Hash;

use crate::frequency::CountTable;
use crate::query::{ExactCounts, FrequencyQuery, QueryResult};

/// Error raised when a counter is configured with invalid parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Epsilon must lie strictly between 0 and 1
    InvalidEpsilon(f64),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidEpsilon(eps) => {
                write!(f, "invalid epsilon {}: must be in (0, 1)", eps)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Error raised when a frequency query cannot honor its guarantees
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryError {
    /// Epsilon must lie strictly between 0 and 1
    InvalidEpsilon(f64),
    /// Threshold must lie strictly between 0 and 1
    InvalidThreshold(f64),
    /// Threshold is below the counter's epsilon, so `(s - ε) * n` filters nothing
    ThresholdBelowEpsilon { threshold: f64, epsilon: f64 },
}

impl core::fmt::Display for QueryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            QueryError::InvalidEpsilon(e) => {
                write!(f, "invalid epsilon {}: must be in (0, 1)", e)
            }
            QueryError::InvalidThreshold(s) => {
                write!(f, "invalid threshold {}: must be in (0, 1)", s)
            }
            QueryError::ThresholdBelowEpsilon { threshold, epsilon } => {
                write!(
                    f,
                    "threshold {} is below epsilon {}: no meaningful filtering possible",
                    threshold, epsilon
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for QueryError {}

/// Error bounds for a count estimate
///
/// Lossy counting bounds are deterministic, so counters report them with a
/// confidence of 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorBounds {
    /// Lower bound of the true count
    pub lower: f64,
    /// Point estimate
    pub estimate: f64,
    /// Upper bound of the true count
    pub upper: f64,
    /// Confidence level (1.0 for hard guarantees)
    pub confidence: f64,
}

impl ErrorBounds {
    /// Create new error bounds
    pub fn new(lower: f64, estimate: f64, upper: f64, confidence: f64) -> Self {
        Self {
            lower,
            estimate,
            upper,
            confidence,
        }
    }

    /// Bounds that always hold
    pub fn certain(lower: u64, estimate: u64, upper: u64) -> Self {
        Self::new(lower as f64, estimate as f64, upper as f64, 1.0)
    }

    /// Check if a value falls within bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Width of the interval
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Relative width (width / estimate)
    pub fn relative_width(&self) -> f64 {
        if self.estimate == 0.0 {
            0.0
        } else {
            self.width() / self.estimate
        }
    }
}

/// Common interface of the lossy counting variants
///
/// A counter owns its [`CountTable`] for exactly one pass over a stream.
/// Callers feed symbols with [`ingest`](LossyCounter::ingest) and simply stop
/// when the stream is exhausted; the table is then a valid result for the
/// consumed prefix.
pub trait LossyCounter: Clone + Debug {
    /// The symbol type being counted
    type Item: Hash + Ord + Clone + Debug;

    /// Consume one symbol from the stream
    fn ingest(&mut self, item: Self::Item);

    /// The current count table
    fn table(&self) -> &CountTable<Self::Item>;

    /// Maximum tolerated frequency error
    fn epsilon(&self) -> f64;

    /// Bucket width `k = ceil(1/ε)`
    fn bucket_width(&self) -> u64;

    /// Number of symbols ingested so far
    fn stream_len(&self) -> u64;

    /// Error term attributed to a tracked item, `None` if untracked
    fn delta(&self, item: &Self::Item) -> Option<u64>;

    /// Interval guaranteed to contain the true count of a tracked item
    fn bounds(&self, item: &Self::Item) -> Option<ErrorBounds>;

    /// Largest number of entries held at any point of the pass
    fn peak_tracked(&self) -> usize;

    /// Start a fresh pass with the same epsilon
    fn clear(&mut self);

    /// Approximate memory usage in bytes
    fn size_bytes(&self) -> usize;

    /// Consume every symbol of a stream in order
    fn ingest_all<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = Self::Item>,
    {
        for item in items {
            self.ingest(item);
        }
    }

    /// Number of full buckets elapsed, `floor(n / k)`
    fn completed_buckets(&self) -> u64 {
        self.stream_len() / self.bucket_width()
    }

    /// Maximum error of any estimate at the current position
    ///
    /// Also bounds the true count of any symbol absent from the table.
    fn error_bound(&self) -> u64 {
        self.completed_buckets()
    }

    /// Approximate count of an item (0 if untracked)
    fn estimate(&self, item: &Self::Item) -> u64 {
        self.table().get(item).map(|e| e.count).unwrap_or(0)
    }

    /// Check if an item is currently tracked
    fn contains(&self, item: &Self::Item) -> bool {
        self.table().contains(item)
    }

    /// Number of tracked items
    fn num_tracked(&self) -> usize {
        self.table().len()
    }

    /// Check if nothing has been ingested
    fn is_empty(&self) -> bool {
        self.stream_len() == 0
    }

    /// Report candidate frequent items for threshold `s`
    ///
    /// Fails if `s` is outside (0, 1) or below epsilon.
    fn query(
        &self,
        threshold: f64,
        exact: &ExactCounts<Self::Item>,
    ) -> Result<QueryResult<Self::Item>, QueryError> {
        let query = FrequencyQuery::new(self.epsilon(), threshold)?;
        Ok(query.run(self.table(), self.stream_len(), exact))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_bounds() {
        let bounds = ErrorBounds::new(90.0, 100.0, 110.0, 0.95);

        assert!(bounds.contains(100.0));
        assert!(bounds.contains(90.0));
        assert!(bounds.contains(110.0));
        assert!(!bounds.contains(89.0));
        assert!(!bounds.contains(111.0));

        assert_eq!(bounds.width(), 20.0);
        assert!((bounds.relative_width() - 0.2).abs() < 0.001);
    }

    #[test]
    fn test_certain_bounds() {
        let bounds = ErrorBounds::certain(3, 5, 5);
        assert_eq!(bounds.confidence, 1.0);
        assert!(bounds.contains(3.0));
        assert!(!bounds.contains(6.0));
        assert_eq!(ErrorBounds::certain(0, 0, 0).relative_width(), 0.0);
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::InvalidEpsilon(1.5);
        assert!(err.to_string().contains("1.5"));

        let err = QueryError::ThresholdBelowEpsilon {
            threshold: 0.01,
            epsilon: 0.1,
        };
        let msg = err.to_string();
        assert!(msg.contains("0.01"));
        assert!(msg.contains("0.1"));
    }
}
