//! # Lossycount
//!
//! Approximate frequent-item counting over data streams in bounded memory.
//!
//! Lossycount implements the Lossy Counting algorithm (Manku & Motwani) in two
//! variants that share a count table but differ in how they track the error
//! term of each entry.
//!
//! ## Features
//!
//! - **Shared delta**: one global delta, new entries charged with it up front
//! - **Individual delta**: each entry keeps the delta of its insertion bucket
//! - **Deterministic bounds**: every estimate is within `ε·n` of the true count
//! - **Threshold queries**: frequent items with exact-versus-estimated metrics
//!
//! ## Quick Start
//!
//! ```rust
//! use lossycount::prelude::*;
//!
//! let stream = "to be or not to be that is the question".split(' ');
//!
//! let mut lc = IndividualDeltaCounter::new(0.1).unwrap();
//! lc.ingest_all(stream.clone());
//!
//! let exact = ExactCounts::from_stream(stream);
//! let frequent = lc.query(0.2, &exact).unwrap();
//!
//! assert!(frequent.contains(&"to"));
//! assert!(frequent.contains(&"be"));
//! ```
//!
//! ## Choosing a variant
//!
//! Both counters implement [`LossyCounter`](traits::LossyCounter), so code can
//! be written once against the trait:
//!
//! ```rust
//! use lossycount::prelude::*;
//!
//! fn tracked_after<C: LossyCounter<Item = u32>>(mut counter: C) -> usize {
//!     counter.ingest_all((0..1000).map(|i| i % 50));
//!     counter.num_tracked()
//! }
//!
//! assert!(tracked_after(SharedDeltaCounter::new(0.01).unwrap()) <= 50);
//! assert!(tracked_after(IndividualDeltaCounter::new(0.01).unwrap()) <= 50);
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Standard library support; hashed count tables
//! - `serde`: Serialization of counters, tables, configs and query results
//! - `tracing`: Debug/trace events for construction, pruning and rejected queries

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod math;

pub mod config;
pub mod frequency;
pub mod query;
pub mod traits;

pub mod prelude {
    pub use crate::config::LossyConfig;
    pub use crate::frequency::{CountEntry, CountTable, IndividualDeltaCounter, SharedDeltaCounter};
    pub use crate::query::{
        ErrorSummary, ExactCounts, FrequencyQuery, ItemMetrics, QueryResult, VariantComparison,
    };
    pub use crate::traits::*;
}

pub use config::LossyConfig;
pub use frequency::{IndividualDeltaCounter, SharedDeltaCounter};
