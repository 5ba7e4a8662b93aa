//! Named collection of independent countdowns.
//!
//! Each entry owns its own countdown; no operation on one entry reads or
//! writes another. Operations on unknown ids are silent no-ops since a
//! removal can race with pending UI intents.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::countdown::{Countdown, TimerState};
use crate::error::ValidationError;

/// Registry-assigned identifier. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEntry {
    name: String,
    countdown: Countdown,
}

impl TimerEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn duration_ms(&self) -> u64 {
        self.countdown.duration_ms()
    }

    pub fn state(&self) -> TimerState {
        self.countdown.state()
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn elapsed(&self, now_ms: u64) -> u64 {
        self.countdown.elapsed(now_ms)
    }

    pub fn remaining(&self, now_ms: u64) -> u64 {
        self.countdown.remaining(now_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MultiTimerRegistry {
    entries: IndexMap<TimerId, TimerEntry>,
    next_id: u64,
}

impl MultiTimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: TimerId) -> Option<&TimerEntry> {
        self.entries.get(&id)
    }

    /// Entries in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (TimerId, &TimerEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Create a new stopped entry.
    ///
    /// Blank names become "Timer N".
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidDuration`] for a zero duration.
    pub fn add(&mut self, name: &str, duration_ms: u64) -> Result<TimerId, ValidationError> {
        let countdown = Countdown::new(duration_ms)?;
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let name = match name.trim() {
            "" => format!("Timer {}", id.0),
            trimmed => trimmed.to_string(),
        };
        self.entries.insert(id, TimerEntry { name, countdown });
        Ok(id)
    }

    /// Drop an entry permanently, preserving the order of the rest.
    pub fn remove(&mut self, id: TimerId) -> Option<TimerEntry> {
        self.entries.shift_remove(&id)
    }

    pub fn start(&mut self, id: TimerId, now_ms: u64) -> bool {
        self.entries
            .get_mut(&id)
            .is_some_and(|e| e.countdown.start(now_ms))
    }

    pub fn pause(&mut self, id: TimerId, now_ms: u64) -> bool {
        self.entries
            .get_mut(&id)
            .is_some_and(|e| e.countdown.pause(now_ms))
    }

    pub fn reset(&mut self, id: TimerId) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.countdown.reset();
                true
            }
            None => false,
        }
    }

    /// Poll every entry; returns the ids that finished on this poll.
    pub fn tick(&mut self, now_ms: u64) -> Vec<TimerId> {
        self.entries
            .iter_mut()
            .filter_map(|(id, entry)| entry.countdown.tick(now_ms).then_some(*id))
            .collect()
    }
}
