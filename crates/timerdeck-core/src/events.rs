use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::branding::TimerBranding;
use crate::timer::{LapRecord, PomodoroMode, TimerId};

/// Which timer an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    Stopwatch,
    Countdown,
    Pomodoro,
    Multi(TimerId),
}

/// Every state change in the engine produces an Event.
/// Adapters drain them to render alerts; nothing in the engine depends on
/// whether anyone consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        timer: TimerKind,
        at_ms: u64,
    },
    TimerPaused {
        timer: TimerKind,
        elapsed_ms: u64,
        at_ms: u64,
    },
    TimerReset {
        timer: TimerKind,
    },
    LapRecorded {
        lap: LapRecord,
    },
    DurationChanged {
        timer: TimerKind,
        mode: Option<PomodoroMode>,
        duration_ms: u64,
    },
    /// The one-shot completion signal.
    TimerFinished {
        timer: TimerKind,
        at_ms: u64,
    },
    PomodoroModeChanged {
        from: PomodoroMode,
        to: PomodoroMode,
        completed_cycles: u32,
        at_ms: u64,
    },
    MultiTimerAdded {
        id: TimerId,
        name: String,
        duration_ms: u64,
    },
    MultiTimerRemoved {
        id: TimerId,
        name: String,
    },
    EventTargetSet {
        target_date: DateTime<Utc>,
        label: String,
    },
    EventTargetCleared,
    BrandingChanged {
        branding: TimerBranding,
    },
}

impl Event {
    /// True for the completion signal that should trigger an alert.
    pub fn is_completion(&self) -> bool {
        matches!(self, Event::TimerFinished { .. })
    }
}
