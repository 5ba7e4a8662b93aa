//! Drift-free elapsed-time accumulator.
//!
//! Elapsed time is never built up by adding per-tick deltas. The accumulator
//! stores a frozen base plus the instant the current run started, and derives
//! elapsed time from those two values and the caller's "now". Polling cadence
//! therefore has no effect on the result: a host callback that is delayed,
//! skipped or batched simply computes the correct value on its next call.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapsedAccumulator {
    accumulated_ms: u64,
    /// Present exactly while running.
    run_started_at_ms: Option<u64>,
    /// Set by the first start after a reset, even if no time has passed.
    #[serde(default)]
    started: bool,
}

impl ElapsedAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.run_started_at_ms.is_some()
    }

    /// Elapsed time folded in by previous pauses.
    pub fn accumulated_ms(&self) -> u64 {
        self.accumulated_ms
    }

    pub fn run_started_at_ms(&self) -> Option<u64> {
        self.run_started_at_ms
    }

    /// True once started since the last reset.
    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Start a run. Returns `false` if already running.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.is_running() {
            return false;
        }
        self.run_started_at_ms = Some(now_ms);
        self.started = true;
        true
    }

    /// Fold the current run into the base. Returns `false` if not running.
    pub fn pause(&mut self, now_ms: u64) -> bool {
        match self.run_started_at_ms.take() {
            Some(started) => {
                self.accumulated_ms = self
                    .accumulated_ms
                    .saturating_add(now_ms.saturating_sub(started));
                true
            }
            None => false,
        }
    }

    /// Stop and pin the base to `elapsed_ms`, discarding the live run.
    pub fn freeze_at(&mut self, elapsed_ms: u64) {
        self.accumulated_ms = elapsed_ms;
        self.run_started_at_ms = None;
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0;
        self.run_started_at_ms = None;
        self.started = false;
    }

    /// Total elapsed time at `now_ms`.
    ///
    /// A `now_ms` earlier than the run start (clock stepped back) contributes
    /// nothing, so the result never goes below the frozen base.
    pub fn elapsed(&self, now_ms: u64) -> u64 {
        let live = self
            .run_started_at_ms
            .map(|started| now_ms.saturating_sub(started))
            .unwrap_or(0);
        self.accumulated_ms.saturating_add(live)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fresh_accumulator_is_idle_at_zero() {
        let acc = ElapsedAccumulator::new();
        assert!(!acc.is_running());
        assert_eq!(acc.elapsed(123_456), 0);
    }

    #[test]
    fn pause_folds_elapsed_into_base() {
        let mut acc = ElapsedAccumulator::new();
        assert!(acc.start(1_000));
        assert_eq!(acc.elapsed(1_500), 500);
        assert!(acc.pause(1_700));
        assert_eq!(acc.accumulated_ms(), 700);
        assert!(acc.run_started_at_ms().is_none());
        assert_eq!(acc.elapsed(99_999), 700);
    }

    #[test]
    fn redundant_transitions_are_no_ops() {
        let mut acc = ElapsedAccumulator::new();
        assert!(!acc.pause(10));
        assert!(acc.start(10));
        assert!(!acc.start(50));
        assert_eq!(acc.run_started_at_ms(), Some(10));
    }

    #[test]
    fn reset_clears_everything() {
        let mut acc = ElapsedAccumulator::new();
        acc.start(0);
        acc.pause(400);
        acc.start(500);
        acc.reset();
        assert_eq!(acc, ElapsedAccumulator::new());
    }

    #[test]
    fn pause_at_start_instant_still_counts_as_started() {
        let mut acc = ElapsedAccumulator::new();
        acc.start(500);
        acc.pause(500);
        assert_eq!(acc.elapsed(900), 0);
        assert!(acc.has_started());
        acc.reset();
        assert!(!acc.has_started());
    }

    #[test]
    fn freeze_at_pins_elapsed() {
        let mut acc = ElapsedAccumulator::new();
        acc.start(0);
        acc.freeze_at(1_000);
        assert!(!acc.is_running());
        assert_eq!(acc.elapsed(60_000), 1_000);
    }

    #[test]
    fn backwards_clock_does_not_run_elapsed_backwards() {
        let mut acc = ElapsedAccumulator::new();
        acc.start(0);
        acc.pause(300);
        acc.start(1_000);
        assert_eq!(acc.elapsed(900), 300);
    }

    proptest! {
        #[test]
        fn prop_double_start_matches_single_start(
            t0 in 0u64..1_000_000,
            gap in 0u64..10_000,
            polls in proptest::collection::vec(0u64..2_000_000, 0..20),
            probe in 0u64..2_000_000,
        ) {
            let mut once = ElapsedAccumulator::new();
            once.start(t0);

            let mut twice = ElapsedAccumulator::new();
            twice.start(t0);
            for p in &polls {
                let _ = twice.elapsed(*p);
            }
            twice.start(t0 + gap);

            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(once.elapsed(probe), twice.elapsed(probe));
        }

        #[test]
        fn prop_pause_resume_is_additive(
            t0 in 0u64..1_000_000,
            run1 in 0u64..100_000,
            idle in 0u64..100_000,
            run2 in 0u64..100_000,
            poll_count in 0usize..50,
        ) {
            let (t1, t2) = (t0 + run1, t0 + run1 + idle);
            let t3 = t2 + run2;
            let mut acc = ElapsedAccumulator::new();
            acc.start(t0);
            for i in 0..poll_count {
                let _ = acc.elapsed(t0 + i as u64);
            }
            acc.pause(t1);
            acc.start(t2);
            acc.pause(t3);
            prop_assert_eq!(acc.elapsed(t3), (t1 - t0) + (t3 - t2));
        }

        #[test]
        fn prop_elapsed_is_monotonic_in_now(
            start in 0u64..1_000_000,
            a in 0u64..2_000_000,
            b in 0u64..2_000_000,
        ) {
            let mut acc = ElapsedAccumulator::new();
            acc.start(start);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(acc.elapsed(lo) <= acc.elapsed(hi));
        }
    }
}
