//! Lossy Counting with one shared delta
//!
//! A single error term, `floor(n / k)`, is shared by every entry and advances
//! once per bucket. New symbols are inserted already charged with the current
//! delta, so counts here err on the high side.

use core::hash::Hash;

use super::table::{CountEntry, CountTable};
use crate::config::{self, LossyConfig};
use crate::traits::{ConfigError, ErrorBounds, LossyCounter};

/// Lossy counter whose entries share the engine's delta
///
/// For every tracked symbol with true count `f` at stream position `n`:
///
/// - `count - delta <= f <= count`, with `delta = floor(n / k) <= ε·n`
/// - an untracked symbol has `f <= floor(n / k)`
///
/// # Example
///
/// ```
/// use lossycount::frequency::SharedDeltaCounter;
/// use lossycount::traits::LossyCounter;
///
/// let mut lc = SharedDeltaCounter::new(0.1).unwrap();
///
/// for c in "abracadabra".chars() {
///     lc.ingest(c);
/// }
///
/// assert_eq!(lc.stream_len(), 11);
/// assert!(lc.estimate(&'a') >= 5);
/// ```
#[derive(Clone, Debug)]
pub struct SharedDeltaCounter<T: Hash + Ord + Clone + core::fmt::Debug> {
    /// Maximum tolerated frequency error
    epsilon: f64,
    /// Bucket width k = ceil(1/epsilon)
    bucket_width: u64,
    /// Symbols ingested so far
    stream_len: u64,
    /// Current shared delta, floor(n / k)
    delta: u64,
    /// Tracked symbols
    table: CountTable<T>,
    /// Largest table size observed
    peak_tracked: usize,
}

impl<T: Hash + Ord + Clone + core::fmt::Debug> SharedDeltaCounter<T> {
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
            "created shared-delta lossy counter"
        );

        Ok(Self {
            epsilon: cfg.epsilon(),
            bucket_width,
            stream_len: 0,
            delta: 0,
            table: CountTable::new(),
            peak_tracked: 0,
        })
    }

    /// Current shared delta
    pub fn shared_delta(&self) -> u64 {
        self.delta
    }

    /// Add one occurrence of a symbol
    pub fn add(&mut self, item: T) {
        self.stream_len += 1;

        let delta = self.delta;
        self.table.upsert(item, |entry| match entry {
            Some(e) => CountEntry::new(e.count + 1, e.delta),
            None => CountEntry::new(1 + delta, delta),
        });
        self.peak_tracked = self.peak_tracked.max(self.table.len());

        let candidate = self.stream_len / self.bucket_width;
        if candidate != self.delta {
            self.delta = candidate;
            self.prune();
        }
    }

    /// Drop every entry whose count fell below the shared delta
    fn prune(&mut self) {
        let delta = self.delta;
        #[cfg(feature = "tracing")]
        let before = self.table.len();
        self.table.retain(|_, e| e.count >= delta);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            variant = "shared",
            stream_len = self.stream_len,
            delta,
            removed = before - self.table.len(),
            retained = self.table.len(),
            "pruned count table"
        );
    }
}

impl<T: Hash + Ord + Clone + core::fmt::Debug> LossyCounter for SharedDeltaCounter<T> {
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
        self.table.get(item).map(|_| self.delta)
    }

    fn bounds(&self, item: &T) -> Option<ErrorBounds> {
        self.table.get(item).map(|e| {
            ErrorBounds::certain(e.count.saturating_sub(self.delta), e.count, e.count)
        })
    }

    fn peak_tracked(&self) -> usize {
        self.peak_tracked
    }

    fn clear(&mut self) {
        self.table.clear();
        self.stream_len = 0;
        self.delta = 0;
        self.peak_tracked = 0;
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>() + self.table.size_bytes()
    }
}

#[cfg(feature = "serde")]
impl<T: Hash + Ord + Clone + core::fmt::Debug + serde::Serialize> serde::Serialize
    for SharedDeltaCounter<T>
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("SharedDeltaCounter", 5)?;
        state.serialize_field("epsilon", &self.epsilon)?;
        state.serialize_field("bucket_width", &self.bucket_width)?;
        state.serialize_field("stream_len", &self.stream_len)?;
        state.serialize_field("delta", &self.delta)?;
        state.serialize_field("table", &self.table)?;
        state.end()
    }
}
