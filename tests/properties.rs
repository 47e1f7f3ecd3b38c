//! Property-based tests for the lossy counting guarantees.
//!
//! Epsilons and thresholds are powers of two (or small multiples of them) so
//! that `(s - ε) * n` is computed exactly and the boundary cases are real.
//!
//! 1. Bounds: every tracked count brackets the true count; untracked symbols
//!    never exceed `floor(n / k)`.
//! 2. Direction: individual-delta counts never overestimate, shared-delta
//!    counts never underestimate.
//! 3. No false negatives for `s > ε`.
//! 4. Nothing far below the threshold is reported.
//! 5. Runs are deterministic.

use std::collections::HashMap;

use lossycount::frequency::{IndividualDeltaCounter, SharedDeltaCounter};
use lossycount::query::ExactCounts;
use lossycount::traits::LossyCounter;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn stream_strategy() -> impl Strategy<Value = Vec<u8>> {
    (2u8..24).prop_flat_map(|alphabet| prop::collection::vec(0..alphabet, 0..1500))
}

fn epsilon_strategy() -> impl Strategy<Value = f64> {
    prop::sample::select(vec![0.5, 0.25, 0.125, 0.0625, 0.03125])
}

/// `(epsilon, threshold)` with `threshold > epsilon`, both dyadic
fn query_strategy() -> impl Strategy<Value = (f64, f64)> {
    (2u32..=5, 5u32..16).prop_map(|(e, j)| (1.0 / f64::from(1u32 << e), f64::from(j) / 16.0))
}

fn truth(stream: &[u8]) -> HashMap<u8, u64> {
    let mut counts = HashMap::new();
    for &x in stream {
        *counts.entry(x).or_insert(0u64) += 1;
    }
    counts
}

fn check_bounds<C: LossyCounter<Item = u8>>(counter: &C, counts: &HashMap<u8, u64>) -> Result<(), TestCaseError> {
    for (symbol, &f) in counts {
        match counter.bounds(symbol) {
            Some(b) => {
                prop_assert!(b.contains(f as f64), "{:?} misses {} for {}", b, f, symbol);
                prop_assert!(b.width() <= counter.error_bound() as f64);
            }
            None => prop_assert!(
                f <= counter.error_bound(),
                "untracked {} has count {} above {}",
                symbol,
                f,
                counter.error_bound()
            ),
        }
    }
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1–2. Bounds and direction of error
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn shared_delta_bounds(stream in stream_strategy(), eps in epsilon_strategy()) {
        let mut lc = SharedDeltaCounter::new(eps).unwrap();
        lc.ingest_all(stream.iter().copied());
        let counts = truth(&stream);

        check_bounds(&lc, &counts)?;
        for (symbol, entry) in lc.table().iter() {
            prop_assert!(entry.count >= counts[symbol]);
        }
    }

    #[test]
    fn individual_delta_bounds(stream in stream_strategy(), eps in epsilon_strategy()) {
        let mut lc = IndividualDeltaCounter::new(eps).unwrap();
        lc.ingest_all(stream.iter().copied());
        let counts = truth(&stream);

        check_bounds(&lc, &counts)?;
        for (symbol, entry) in lc.table().iter() {
            prop_assert!(entry.count <= counts[symbol]);
            prop_assert!(entry.delta <= lc.error_bound());
        }
    }

    #[test]
    fn bounds_hold_at_every_prefix(stream in prop::collection::vec(0u8..6, 0..300), eps in epsilon_strategy()) {
        let mut shared = SharedDeltaCounter::new(eps).unwrap();
        let mut individual = IndividualDeltaCounter::new(eps).unwrap();

        for (i, &x) in stream.iter().enumerate() {
            shared.ingest(x);
            individual.ingest(x);
            let counts = truth(&stream[..=i]);
            check_bounds(&shared, &counts)?;
            check_bounds(&individual, &counts)?;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3–4. Query guarantees
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn no_false_negatives((eps, s) in query_strategy(), stream in stream_strategy()) {
        let exact = ExactCounts::from_stream(stream.iter().copied());
        let n = stream.len() as f64;

        let mut shared = SharedDeltaCounter::new(eps).unwrap();
        let mut individual = IndividualDeltaCounter::new(eps).unwrap();
        shared.ingest_all(stream.iter().copied());
        individual.ingest_all(stream.iter().copied());

        let by_shared = shared.query(s, &exact).unwrap();
        let by_individual = individual.query(s, &exact).unwrap();

        for (symbol, f) in exact.ranked() {
            if f as f64 >= s * n {
                prop_assert!(by_shared.contains(symbol), "shared missed {}", symbol);
                prop_assert!(by_individual.contains(symbol), "individual missed {}", symbol);
            }
        }
    }

    #[test]
    fn nothing_reported_below_floor((eps, s) in query_strategy(), stream in stream_strategy()) {
        let exact = ExactCounts::from_stream(stream.iter().copied());
        let n = stream.len() as f64;

        let mut individual = IndividualDeltaCounter::new(eps).unwrap();
        individual.ingest_all(stream.iter().copied());
        for (symbol, _) in individual.query(s, &exact).unwrap().iter() {
            prop_assert!(exact.count(symbol) as f64 >= (s - eps) * n);
        }

        // Shared-delta counts may run ahead of the truth by the shared delta
        let mut shared = SharedDeltaCounter::new(eps).unwrap();
        shared.ingest_all(stream.iter().copied());
        let slack = shared.error_bound() as f64;
        for (symbol, _) in shared.query(s, &exact).unwrap().iter() {
            prop_assert!(exact.count(symbol) as f64 >= (s - eps) * n - slack);
        }
    }

    #[test]
    fn false_positive_flag_matches_truth((eps, s) in query_strategy(), stream in stream_strategy()) {
        let exact = ExactCounts::from_stream(stream.iter().copied());
        let mut lc = SharedDeltaCounter::new(eps).unwrap();
        lc.ingest_all(stream.iter().copied());

        for (symbol, m) in lc.query(s, &exact).unwrap().iter() {
            prop_assert_eq!(m.false_positive, exact.frequency(symbol) < s);
            prop_assert!(m.relative_error >= 0.0);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn runs_are_deterministic(stream in stream_strategy(), eps in epsilon_strategy()) {
        let run_shared = || {
            let mut lc = SharedDeltaCounter::new(eps).unwrap();
            lc.ingest_all(stream.iter().copied());
            lc.table().iter().map(|(k, e)| (*k, *e)).collect::<Vec<_>>()
        };
        let run_individual = || {
            let mut lc = IndividualDeltaCounter::new(eps).unwrap();
            lc.ingest_all(stream.iter().copied());
            lc.table().iter().map(|(k, e)| (*k, *e)).collect::<Vec<_>>()
        };

        prop_assert_eq!(run_shared(), run_shared());
        prop_assert_eq!(run_individual(), run_individual());
    }
}
