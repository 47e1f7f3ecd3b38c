//! Lossy Counting with per-entry deltas
//!
//! The Manku-Motwani formulation: every entry remembers the bucket it entered
//! in, so its error term never grows after insertion.

use core::hash::Hash;

use super::table::{CountEntry, CountTable};
use crate::config::{self, LossyConfig};
use crate::traits::{ConfigError, ErrorBounds, LossyCounter};

/// Lossy counter whose entries carry their own delta
///
/// Each entry stores `delta = current_bucket - 1` from the moment it was
/// inserted. At every bucket boundary, entries with
/// `count + delta <= current_bucket` are dropped.
///
/// For every tracked symbol with true count `f` at stream position `n`:
///
/// - `count <= f <= count + delta`, with `delta <= floor(n / k) <= ε·n`
/// - an untracked symbol has `f <= floor(n / k)`
///
/// # Example
///
/// ```
/// use lossycount::frequency::IndividualDeltaCounter;
/// use lossycount::traits::LossyCounter;
///
/// let mut lc = IndividualDeltaCounter::new(0.01).unwrap();
///
/// for i in 0..10_000u32 {
///     // "hot" shows up in 1 of every 4 positions
///     lc.ingest(if i % 4 == 0 { 0 } else { i });
/// }
///
/// let hot = lc.estimate(&0);
/// assert!(hot <= 2500 && hot >= 2500 - 100);
/// ```
#[derive(Clone, Debug)]
pub struct IndividualDeltaCounter<T: Hash + Ord + Clone + core::fmt::Debug> {
    /// Maximum tolerated frequency error
    epsilon: f64,
    /// Bucket width k = ceil(1/epsilon)
    bucket_width: u64,
    /// Symbols ingested so far
    stream_len: u64,
    /// 1-based index of the bucket being filled
    current_bucket: u64,
    /// Tracked symbols
    table: CountTable<T>,
    /// Largest table size observed
    peak_tracked: usize,
}

impl<T: Hash + Ord + Clone + core::fmt::Debug> IndividualDeltaCounter<T> {
    /// Create a counter with the given epsilon
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEpsilon`] if epsilon is not in (0, 1).
    pub fn new(epsilon: f64) -> Result<Self, ConfigError> {
        Self::from_config(&LossyConfig::new(epsilon)?)
    }

    /// Create a counter from a configuration
    pub fn from_config(cfg: &LossyConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let bucket_width = config::bucket_width(cfg.epsilon());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            epsilon = cfg.epsilon(),
            bucket_width,
            "created individual-delta lossy counter"
        );

        Ok(Self {
            epsilon: cfg.epsilon(),
            bucket_width,
            stream_len: 0,
            current_bucket: 1,
            table: CountTable::new(),
            peak_tracked: 0,
        })
    }

    /// 1-based index of the bucket currently being filled
    pub fn current_bucket(&self) -> u64 {
        self.current_bucket
    }

    /// Add one occurrence of a symbol
    pub fn add(&mut self, item: T) {
        self.stream_len += 1;

        let insert_delta = self.current_bucket - 1;
        self.table.upsert(item, |entry| match entry {
            Some(e) => CountEntry::new(e.count + 1, e.delta),
            None => CountEntry::new(1, insert_delta),
        });
        self.peak_tracked = self.peak_tracked.max(self.table.len());

        if self.stream_len % self.bucket_width == 0 {
            self.prune();
            self.current_bucket += 1;
        }
    }

    /// Drop every entry that cannot exceed the closing bucket index
    fn prune(&mut self) {
        let bucket = self.current_bucket;
        #[cfg(feature = "tracing")]
        let before = self.table.len();
        self.table.retain(|_, e| e.count + e.delta > bucket);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            variant = "individual",
            stream_len = self.stream_len,
            bucket,
            removed = before - self.table.len(),
            retained = self.table.len(),
            "pruned count table"
        );
    }
}

impl<T: Hash + Ord + Clone + core::fmt::Debug> LossyCounter for IndividualDeltaCounter<T> {
    type Item = T;

    fn ingest(&mut self, item: T) {
        self.add(item);
    }

    fn table(&self) -> &CountTable<T> {
        &self.table
    }

    fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn bucket_width(&self) -> u64 {
        self.bucket_width
    }

    fn stream_len(&self) -> u64 {
        self.stream_len
    }

    fn delta(&self, item: &T) -> Option<u64> {
        self.table.get(item).map(|e| e.delta)
    }

    fn bounds(&self, item: &T) -> Option<ErrorBounds> {
        self.table
            .get(item)
            .map(|e| ErrorBounds::certain(e.count, e.count, e.count + e.delta))
    }

    fn peak_tracked(&self) -> usize {
        self.peak_tracked
    }

    fn clear(&mut self) {
        self.table.clear();
        self.stream_len = 0;
        self.current_bucket = 1;
        self.peak_tracked = 0;
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>() + self.table.size_bytes()
    }
}

#[cfg(feature = "serde")]
impl<T: Hash + Ord + Clone + core::fmt::Debug + serde::Serialize> serde::Serialize
    for IndividualDeltaCounter<T>
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("IndividualDeltaCounter", 5)?;
        state.serialize_field("epsilon", &self.epsilon)?;
        state.serialize_field("bucket_width", &self.bucket_width)?;
        state.serialize_field("stream_len", &self.stream_len)?;
        state.serialize_field("current_bucket", &self.current_bucket)?;
        state.serialize_field("table", &self.table)?;
        state.end()
    }
}
