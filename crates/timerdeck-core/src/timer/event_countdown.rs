//! Countdown to a fixed calendar date.
//!
//! Unlike the accumulator-based timers this has no pause concept: the target
//! is an absolute instant and remaining time is recomputed from "now" on
//! every read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SECOND_MS: u64 = 1_000;
const MINUTE_MS: u64 = 60 * SECOND_MS;
const HOUR_MS: u64 = 60 * MINUTE_MS;
const DAY_MS: u64 = 24 * HOUR_MS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTarget {
    pub target_date: DateTime<Utc>,
    pub label: String,
}

/// Remaining time split into display units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownParts {
    pub total_ms: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl CountdownParts {
    pub fn from_ms(total_ms: u64) -> Self {
        Self {
            total_ms,
            days: total_ms / DAY_MS,
            hours: (total_ms % DAY_MS) / HOUR_MS,
            minutes: (total_ms % HOUR_MS) / MINUTE_MS,
            seconds: (total_ms % MINUTE_MS) / SECOND_MS,
        }
    }
}

impl EventTarget {
    pub fn new(target_date: DateTime<Utc>, label: impl Into<String>) -> Self {
        Self {
            target_date,
            label: label.into(),
        }
    }

    fn target_ms(&self) -> i64 {
        self.target_date.timestamp_millis()
    }

    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        let now = i64::try_from(now_ms).unwrap_or(i64::MAX);
        self.target_ms().saturating_sub(now).max(0) as u64
    }

    pub fn remaining(&self, now_ms: u64) -> CountdownParts {
        CountdownParts::from_ms(self.remaining_ms(now_ms))
    }

    pub fn is_past(&self, now_ms: u64) -> bool {
        let now = i64::try_from(now_ms).unwrap_or(i64::MAX);
        now >= self.target_ms()
    }
}

/// Holder for the optional event target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCountdown {
    target: Option<EventTarget>,
}

impl EventCountdown {
    pub fn new(target: Option<EventTarget>) -> Self {
        Self { target }
    }

    pub fn target(&self) -> Option<&EventTarget> {
        self.target.as_ref()
    }

    /// Replace any existing target.
    pub fn set_target(&mut self, target_date: DateTime<Utc>, label: impl Into<String>) {
        self.target = Some(EventTarget::new(target_date, label));
    }

    /// Back to unset. Returns the removed target.
    pub fn clear(&mut self) -> Option<EventTarget> {
        self.target.take()
    }

    /// `None` when no target is set.
    pub fn remaining(&self, now_ms: u64) -> Option<CountdownParts> {
        self.target.as_ref().map(|t| t.remaining(now_ms))
    }

    pub fn is_past(&self, now_ms: u64) -> Option<bool> {
        self.target.as_ref().map(|t| t.is_past(now_ms))
    }
}
