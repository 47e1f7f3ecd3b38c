//! Frequent-item queries and error metrics
//!
//! Queries run over a finished [`CountTable`](crate::frequency::CountTable)
//! and compare its estimates with externally supplied exact counts.
//!
//! # Example
//!
//! ```
//! use lossycount::prelude::*;
//!
//! let stream: Vec<char> = "abcabcaaaaddddddddd".chars().collect();
//! let exact = ExactCounts::from_stream(stream.iter().copied());
//!
//! let mut lc = IndividualDeltaCounter::new(0.1).unwrap();
//! lc.ingest_all(stream);
//!
//! let result = lc.query(0.3, &exact).unwrap();
//! assert!(result.contains(&'d'));
//!
//! if let Some(summary) = result.summary() {
//!     println!("mean absolute error: {:.3}%", summary.mean_absolute_error);
//! }
//!
//! // Thresholds below epsilon cannot be honored
//! assert!(lc.query(0.05, &exact).is_err());
//! ```

mod exact;
mod frequent;
mod summary;

pub use exact::ExactCounts;
pub use frequent::{FrequencyQuery, ItemMetrics, QueryResult};
pub use summary::{ComparisonRow, ErrorSummary, VariantComparison};
