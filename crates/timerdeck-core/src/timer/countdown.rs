//! Countdown timer.
//!
//! ```text
//! Idle -> Running <-> Paused -> Finished -> (reset) Idle
//! ```
//!
//! Remaining time is `duration - elapsed`, clamped at zero. The transition to
//! `Finished` happens on the first `tick` that observes zero while running and
//! is reported exactly once.

use serde::{Deserialize, Serialize};

use super::accumulator::ElapsedAccumulator;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Reject zero-length durations.
pub(crate) fn validate_duration(
    field: &'static str,
    duration_ms: u64,
) -> Result<u64, ValidationError> {
    if duration_ms == 0 {
        return Err(ValidationError::InvalidDuration {
            field,
            value_ms: duration_ms,
        });
    }
    Ok(duration_ms)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    duration_ms: u64,
    acc: ElapsedAccumulator,
    finished: bool,
}

impl Countdown {
    /// # Errors
    /// Returns [`ValidationError::InvalidDuration`] for a zero duration.
    pub fn new(duration_ms: u64) -> Result<Self, ValidationError> {
        Ok(Self {
            duration_ms: validate_duration("duration_ms", duration_ms)?,
            acc: ElapsedAccumulator::new(),
            finished: false,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn is_running(&self) -> bool {
        self.acc.is_running()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn state(&self) -> TimerState {
        if self.finished {
            TimerState::Finished
        } else if self.acc.is_running() {
            TimerState::Running
        } else if self.acc.has_started() {
            TimerState::Paused
        } else {
            TimerState::Idle
        }
    }

    pub fn elapsed(&self, now_ms: u64) -> u64 {
        self.acc.elapsed(now_ms)
    }

    pub fn remaining(&self, now_ms: u64) -> u64 {
        if self.finished {
            return 0;
        }
        self.duration_ms.saturating_sub(self.acc.elapsed(now_ms))
    }

    /// 0.0 .. 1.0 progress towards zero.
    pub fn progress(&self, now_ms: u64) -> f64 {
        1.0 - (self.remaining(now_ms) as f64 / self.duration_ms as f64)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Returns `false` when already running or finished.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.finished {
            return false;
        }
        self.acc.start(now_ms)
    }

    pub fn pause(&mut self, now_ms: u64) -> bool {
        self.acc.pause(now_ms)
    }

    /// Re-arm to the full configured duration.
    pub fn reset(&mut self) {
        self.acc.reset();
        self.finished = false;
    }

    /// Poll against `now_ms`. Returns `true` exactly once, on the poll that
    /// observes the countdown reaching zero while running. Elapsed time is
    /// pinned to the duration however late that poll arrives.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.finished || !self.acc.is_running() {
            return false;
        }
        if self.remaining(now_ms) > 0 {
            return false;
        }
        self.acc.freeze_at(self.duration_ms);
        self.finished = true;
        true
    }

    /// Change the configured duration and re-arm.
    ///
    /// Returns `Ok(false)` without touching anything while running.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidDuration`] for a zero duration.
    pub fn set_duration(&mut self, duration_ms: u64) -> Result<bool, ValidationError> {
        let duration_ms = validate_duration("duration_ms", duration_ms)?;
        if self.acc.is_running() {
            return Ok(false);
        }
        self.duration_ms = duration_ms;
        self.reset();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_duration_is_rejected() {
        assert!(matches!(
            Countdown::new(0),
            Err(ValidationError::InvalidDuration { value_ms: 0, .. })
        ));
    }

    #[test]
    fn pause_freezes_remaining() {
        let mut cd = Countdown::new(5_000).unwrap();
        cd.start(0);
        assert!(!cd.tick(3_000));
        assert_eq!(cd.remaining(3_000), 2_000);
        cd.pause(3_000);
        assert!(!cd.tick(10_000));
        assert_eq!(cd.remaining(10_000), 2_000);
        assert_eq!(cd.state(), TimerState::Paused);
        cd.start(10_000);
        assert!(cd.tick(12_000));
        assert_eq!(cd.remaining(12_000), 0);
        assert!(cd.is_finished());
    }

    #[test]
    fn finish_signal_fires_once() {
        let mut cd = Countdown::new(1_000).unwrap();
        cd.start(0);
        let mut fired = 0;
        for now in [
            999, 1_000, 1_001, 1_100, 1_200, 1_300, 1_400, 1_500, 1_600, 1_700, 1_800, 1_900,
        ] {
            if cd.tick(now) {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert_eq!(cd.state(), TimerState::Finished);
        assert!(!cd.is_running());
    }

    #[test]
    fn late_poll_still_finishes() {
        let mut cd = Countdown::new(1_000).unwrap();
        cd.start(0);
        assert!(cd.tick(60_000));
        assert_eq!(cd.remaining(60_000), 0);
        assert_eq!(cd.elapsed(60_000), 1_000);
        assert_eq!(cd.elapsed(120_000), 1_000);
        assert_eq!(cd.progress(120_000), 1.0);
    }

    #[test]
    fn pause_at_start_instant_is_paused_not_idle() {
        let mut cd = Countdown::new(1_000).unwrap();
        cd.start(200);
        cd.pause(200);
        assert_eq!(cd.state(), TimerState::Paused);
        assert_eq!(cd.remaining(900), 1_000);
        cd.reset();
        assert_eq!(cd.state(), TimerState::Idle);
    }

    #[test]
    fn start_is_ignored_once_finished_until_reset() {
        let mut cd = Countdown::new(100).unwrap();
        cd.start(0);
        cd.tick(100);
        assert!(!cd.start(200));
        cd.reset();
        assert_eq!(cd.state(), TimerState::Idle);
        assert_eq!(cd.remaining(500), 100);
        assert!(cd.start(500));
    }

    #[test]
    fn set_duration_rearms_when_stopped_and_is_rejected_while_running() {
        let mut cd = Countdown::new(1_000).unwrap();
        cd.start(0);
        assert_eq!(cd.set_duration(3_000), Ok(false));
        assert_eq!(cd.duration_ms(), 1_000);
        cd.pause(400);
        assert_eq!(cd.remaining(400), 600);
        assert_eq!(cd.set_duration(3_000), Ok(true));
        assert_eq!(cd.remaining(400), 3_000);
        assert_eq!(cd.state(), TimerState::Idle);
        assert!(cd.set_duration(0).is_err());
        assert_eq!(cd.duration_ms(), 3_000);
    }

    #[test]
    fn progress_runs_from_zero_to_one() {
        let mut cd = Countdown::new(1_000).unwrap();
        assert_eq!(cd.progress(0), 0.0);
        cd.start(0);
        assert!((cd.progress(250) - 0.25).abs() < f64::EPSILON);
        assert_eq!(cd.progress(5_000), 1.0);
    }

    proptest! {
        #[test]
        fn prop_remaining_never_exceeds_duration(
            duration in 1u64..100_000,
            start in 0u64..1_000_000,
            probe in 0u64..2_000_000,
        ) {
            let mut cd = Countdown::new(duration).unwrap();
            cd.start(start);
            cd.tick(probe);
            prop_assert!(cd.remaining(probe) <= duration);
        }
    }
}
