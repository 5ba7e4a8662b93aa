//! Pomodoro work/break cycling.
//!
//! Two countdowns, one active at a time. When the active one finishes the
//! mode flips and the other is re-armed but left paused; the caller starts
//! the next interval explicitly.

use serde::{Deserialize, Serialize};

use super::countdown::{Countdown, TimerState};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PomodoroMode {
    Work,
    Break,
}

impl PomodoroMode {
    pub fn flipped(self) -> Self {
        match self {
            PomodoroMode::Work => PomodoroMode::Break,
            PomodoroMode::Break => PomodoroMode::Work,
        }
    }
}

/// Result of the active interval finishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSwitch {
    pub from: PomodoroMode,
    pub to: PomodoroMode,
    pub completed_cycles: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroCycle {
    work: Countdown,
    #[serde(rename = "break")]
    rest: Countdown,
    mode: PomodoroMode,
    completed_cycles: u32,
}

impl PomodoroCycle {
    /// # Errors
    /// Returns [`ValidationError::InvalidDuration`] if either duration is zero.
    pub fn new(work_duration_ms: u64, break_duration_ms: u64) -> Result<Self, ValidationError> {
        let work = Countdown::new(work_duration_ms).map_err(|_| ValidationError::InvalidDuration {
            field: "work_duration_ms",
            value_ms: work_duration_ms,
        })?;
        let rest = Countdown::new(break_duration_ms).map_err(|_| ValidationError::InvalidDuration {
            field: "break_duration_ms",
            value_ms: break_duration_ms,
        })?;
        Ok(Self {
            work,
            rest,
            mode: PomodoroMode::Work,
            completed_cycles: 0,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> PomodoroMode {
        self.mode
    }

    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    pub fn active(&self) -> &Countdown {
        match self.mode {
            PomodoroMode::Work => &self.work,
            PomodoroMode::Break => &self.rest,
        }
    }

    fn active_mut(&mut self) -> &mut Countdown {
        match self.mode {
            PomodoroMode::Work => &mut self.work,
            PomodoroMode::Break => &mut self.rest,
        }
    }

    pub fn work_duration_ms(&self) -> u64 {
        self.work.duration_ms()
    }

    pub fn break_duration_ms(&self) -> u64 {
        self.rest.duration_ms()
    }

    pub fn state(&self) -> TimerState {
        self.active().state()
    }

    pub fn is_running(&self) -> bool {
        self.active().is_running()
    }

    pub fn remaining(&self, now_ms: u64) -> u64 {
        self.active().remaining(now_ms)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, now_ms: u64) -> bool {
        self.active_mut().start(now_ms)
    }

    pub fn pause(&mut self, now_ms: u64) -> bool {
        self.active_mut().pause(now_ms)
    }

    /// Back to a fresh work interval with the cycle counter cleared.
    pub fn reset(&mut self) {
        self.work.reset();
        self.rest.reset();
        self.mode = PomodoroMode::Work;
        self.completed_cycles = 0;
    }

    /// Poll the active countdown; flips mode when it finishes.
    pub fn tick(&mut self, now_ms: u64) -> Option<ModeSwitch> {
        if !self.active_mut().tick(now_ms) {
            return None;
        }
        let from = self.mode;
        let to = from.flipped();
        if from == PomodoroMode::Work {
            self.completed_cycles = self.completed_cycles.saturating_add(1);
        }
        self.active_mut().reset();
        self.mode = to;
        self.active_mut().reset();
        Some(ModeSwitch {
            from,
            to,
            completed_cycles: self.completed_cycles,
        })
    }

    /// Returns `Ok(false)` while the work countdown is running.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidDuration`] for a zero duration.
    pub fn set_work_duration(&mut self, duration_ms: u64) -> Result<bool, ValidationError> {
        self.work
            .set_duration(duration_ms)
            .map_err(|_| ValidationError::InvalidDuration {
                field: "work_duration_ms",
                value_ms: duration_ms,
            })
    }

    /// Returns `Ok(false)` while the break countdown is running.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidDuration`] for a zero duration.
    pub fn set_break_duration(&mut self, duration_ms: u64) -> Result<bool, ValidationError> {
        self.rest
            .set_duration(duration_ms)
            .map_err(|_| ValidationError::InvalidDuration {
                field: "break_duration_ms",
                value_ms: duration_ms,
            })
    }
}
