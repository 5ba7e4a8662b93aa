//! Count-up stopwatch with laps.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::accumulator::ElapsedAccumulator;
use super::TimerState;

/// Immutable checkpoint of cumulative elapsed time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapRecord {
    pub id: Uuid,
    pub cumulative_elapsed_ms: u64,
    pub captured_at_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stopwatch {
    acc: ElapsedAccumulator,
    laps: Vec<LapRecord>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TimerState {
        if self.acc.is_running() {
            TimerState::Running
        } else if self.acc.has_started() {
            TimerState::Paused
        } else {
            TimerState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.acc.is_running()
    }

    pub fn elapsed(&self, now_ms: u64) -> u64 {
        self.acc.elapsed(now_ms)
    }

    /// Laps in capture order.
    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }

    pub fn start(&mut self, now_ms: u64) -> bool {
        self.acc.start(now_ms)
    }

    pub fn pause(&mut self, now_ms: u64) -> bool {
        self.acc.pause(now_ms)
    }

    /// Back to idle; drops all laps.
    pub fn reset(&mut self) {
        self.acc.reset();
        self.laps.clear();
    }

    /// Record a lap. Only possible while running.
    pub fn lap(&mut self, now_ms: u64) -> Option<&LapRecord> {
        if !self.acc.is_running() {
            return None;
        }
        // A backwards clock step must not produce a lap below its predecessor.
        let floor = self
            .laps
            .last()
            .map(|l| l.cumulative_elapsed_ms)
            .unwrap_or(0);
        self.laps.push(LapRecord {
            id: Uuid::new_v4(),
            cumulative_elapsed_ms: self.acc.elapsed(now_ms).max(floor),
            captured_at_ms: now_ms,
        });
        self.laps.last()
    }

    /// Time between lap `index` and the lap before it.
    pub fn split_ms(&self, index: usize) -> Option<u64> {
        let current = self.laps.get(index)?.cumulative_elapsed_ms;
        let previous = match index {
            0 => 0,
            i => self.laps[i - 1].cumulative_elapsed_ms,
        };
        Some(current - previous)
    }
}
