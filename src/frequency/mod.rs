//! Lossy Counting frequency estimation
//!
//! This module provides the two lossy counting variants and the count table
//! they share.
//!
//! # Algorithms
//!
//! - [`SharedDeltaCounter`]: one global delta, advanced per bucket; new entries
//!   start at `1 + delta`
//! - [`IndividualDeltaCounter`]: each entry keeps the delta of its insertion
//!   bucket; tighter per-item bounds at one extra integer per entry
//!
//! Both variants split the stream into buckets of `k = ceil(1/ε)` items and
//! prune the table at bucket boundaries, so the error of any estimate stays
//! within `ε·n`.
//!
//! # Example
//!
//! ```
//! use lossycount::frequency::{IndividualDeltaCounter, SharedDeltaCounter};
//! use lossycount::traits::LossyCounter;
//!
//! let stream = "mississippi".chars();
//!
//! let mut shared = SharedDeltaCounter::new(0.2).unwrap();
//! let mut individual = IndividualDeltaCounter::new(0.2).unwrap();
//! shared.ingest_all(stream.clone());
//! individual.ingest_all(stream);
//!
//! // Shared counts never undercount, individual counts never overcount
//! assert!(shared.estimate(&'s') >= 4);
//! assert!(individual.estimate(&'s') <= 4);
//! ```

mod individual_delta;
mod shared_delta;
mod table;

pub use individual_delta::IndividualDeltaCounter;
pub use shared_delta::SharedDeltaCounter;
pub use table::{CountEntry, CountTable};
