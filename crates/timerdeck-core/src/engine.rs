//! Timer engine.
//!
//! Owns every timer plus branding and the event target, and exposes the
//! intent surface adapters drive. The engine never schedules anything: the
//! caller invokes intents when the user acts and `tick()` at whatever cadence
//! it refreshes the display. All timing is derived from the injected
//! [`Clock`], so a delayed or skipped tick changes nothing but latency.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::restore(SystemClock, gateway.load(&defaults))?;
//! engine.start_countdown();
//! // In the display loop:
//! for event in engine.tick() {
//!     // alert on Event::TimerFinished
//! }
//! gateway.sync(&mut engine);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::branding::{BrandingUpdate, TimerBranding};
use crate::clock::Clock;
use crate::error::ValidationError;
use crate::events::{Event, TimerKind};
use crate::storage::PersistedState;
use crate::timer::{
    Countdown, CountdownParts, EventCountdown, MultiTimerRegistry, PomodoroCycle, PomodoroMode,
    Stopwatch, TimerId, TimerState,
};

pub struct TimerEngine<C: Clock> {
    clock: C,
    stopwatch: Stopwatch,
    countdown: Countdown,
    pomodoro: PomodoroCycle,
    timers: MultiTimerRegistry,
    event: EventCountdown,
    branding: TimerBranding,
    default_branding: TimerBranding,
    /// Set when a persisted field changes; cleared by `take_dirty`.
    dirty: bool,
}

impl<C: Clock> TimerEngine<C> {
    /// Build an engine from persisted settings. Every timer starts stopped.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidDuration`] if a persisted duration is zero.
    pub fn restore(clock: C, state: PersistedState) -> Result<Self, ValidationError> {
        let countdown = Countdown::new(state.countdown_duration_ms).map_err(|_| {
            ValidationError::InvalidDuration {
                field: "countdown_duration_ms",
                value_ms: state.countdown_duration_ms,
            }
        })?;
        let pomodoro = PomodoroCycle::new(
            state.pomodoro_work_duration_ms,
            state.pomodoro_break_duration_ms,
        )?;
        Ok(Self {
            clock,
            stopwatch: Stopwatch::new(),
            countdown,
            pomodoro,
            timers: MultiTimerRegistry::new(),
            event: EventCountdown::new(state.event_target),
            branding: state.branding,
            default_branding: TimerBranding::default(),
            dirty: false,
        })
    }

    /// Branding that `reset_branding` restores.
    pub fn with_default_branding(mut self, branding: TimerBranding) -> Self {
        self.default_branding = branding;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn pomodoro(&self) -> &PomodoroCycle {
        &self.pomodoro
    }

    pub fn timers(&self) -> &MultiTimerRegistry {
        &self.timers
    }

    pub fn event_countdown(&self) -> &EventCountdown {
        &self.event
    }

    pub fn branding(&self) -> &TimerBranding {
        &self.branding
    }

    /// The whitelist that survives a reload.
    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            branding: self.branding.clone(),
            countdown_duration_ms: self.countdown.duration_ms(),
            pomodoro_work_duration_ms: self.pomodoro.work_duration_ms(),
            pomodoro_break_duration_ms: self.pomodoro.break_duration_ms(),
            event_target: self.event.target().cloned(),
        }
    }

    /// Returns whether persisted settings changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Render-ready view of everything at the current instant.
    pub fn snapshot(&self) -> EngineSnapshot {
        let now = self.clock.now_ms();
        let sw = &self.stopwatch;
        let laps = sw
            .laps()
            .iter()
            .enumerate()
            .map(|(i, lap)| LapView {
                number: i + 1,
                cumulative_elapsed_ms: lap.cumulative_elapsed_ms,
                split_ms: sw.split_ms(i).unwrap_or(0),
            })
            .collect();
        EngineSnapshot {
            at_ms: now,
            stopwatch: StopwatchView {
                state: sw.state(),
                elapsed_ms: sw.elapsed(now),
                laps,
            },
            countdown: CountdownView::of(&self.countdown, now),
            pomodoro: PomodoroView {
                mode: self.pomodoro.mode(),
                completed_cycles: self.pomodoro.completed_cycles(),
                work_duration_ms: self.pomodoro.work_duration_ms(),
                break_duration_ms: self.pomodoro.break_duration_ms(),
                active: CountdownView::of(self.pomodoro.active(), now),
            },
            timers: self
                .timers
                .iter()
                .map(|(id, entry)| MultiTimerView {
                    id,
                    name: entry.name().to_string(),
                    timer: CountdownView::of(entry.countdown(), now),
                })
                .collect(),
            event: self.event.target().map(|t| EventView {
                label: t.label.clone(),
                target_date: t.target_date,
                remaining: t.remaining(now),
                is_past: t.is_past(now),
            }),
            branding: self.branding.clone(),
        }
    }

    // ── Polling ──────────────────────────────────────────────────────

    /// Poll every countdown-like timer. Returns the completion and mode
    /// change events raised by this poll; each finish is reported once.
    pub fn tick(&mut self) -> Vec<Event> {
        let now = self.clock.now_ms();
        let mut events = Vec::new();

        if self.countdown.tick(now) {
            tracing::info!("countdown finished");
            events.push(Event::TimerFinished {
                timer: TimerKind::Countdown,
                at_ms: now,
            });
        }

        if let Some(switch) = self.pomodoro.tick(now) {
            tracing::info!(
                from = ?switch.from,
                to = ?switch.to,
                cycles = switch.completed_cycles,
                "pomodoro interval finished"
            );
            events.push(Event::TimerFinished {
                timer: TimerKind::Pomodoro,
                at_ms: now,
            });
            events.push(Event::PomodoroModeChanged {
                from: switch.from,
                to: switch.to,
                completed_cycles: switch.completed_cycles,
                at_ms: now,
            });
        }

        for id in self.timers.tick(now) {
            tracing::info!(%id, "multi-timer finished");
            events.push(Event::TimerFinished {
                timer: TimerKind::Multi(id),
                at_ms: now,
            });
        }

        events
    }

    // ── Stopwatch intents ────────────────────────────────────────────

    pub fn start_stopwatch(&mut self) -> Option<Event> {
        let now = self.clock.now_ms();
        self.stopwatch
            .start(now)
            .then(|| started(TimerKind::Stopwatch, now))
    }

    pub fn pause_stopwatch(&mut self) -> Option<Event> {
        let now = self.clock.now_ms();
        self.stopwatch.pause(now).then(|| Event::TimerPaused {
            timer: TimerKind::Stopwatch,
            elapsed_ms: self.stopwatch.elapsed(now),
            at_ms: now,
        })
    }

    pub fn reset_stopwatch(&mut self) -> Option<Event> {
        self.stopwatch.reset();
        tracing::debug!("stopwatch reset");
        Some(Event::TimerReset {
            timer: TimerKind::Stopwatch,
        })
    }

    /// `None` unless the stopwatch is running.
    pub fn add_lap(&mut self) -> Option<Event> {
        let now = self.clock.now_ms();
        let lap = self.stopwatch.lap(now)?.clone();
        Some(Event::LapRecorded { lap })
    }

    // ── Countdown intents ────────────────────────────────────────────

    /// `Ok(None)` while the countdown is running.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidDuration`] for a zero duration.
    pub fn set_countdown_duration(
        &mut self,
        duration_ms: u64,
    ) -> Result<Option<Event>, ValidationError> {
        if !self.countdown.set_duration(duration_ms)? {
            tracing::debug!("countdown running, duration change ignored");
            return Ok(None);
        }
        self.dirty = true;
        Ok(Some(Event::DurationChanged {
            timer: TimerKind::Countdown,
            mode: None,
            duration_ms,
        }))
    }

    pub fn start_countdown(&mut self) -> Option<Event> {
        let now = self.clock.now_ms();
        self.countdown
            .start(now)
            .then(|| started(TimerKind::Countdown, now))
    }

    pub fn pause_countdown(&mut self) -> Option<Event> {
        let now = self.clock.now_ms();
        self.countdown.pause(now).then(|| Event::TimerPaused {
            timer: TimerKind::Countdown,
            elapsed_ms: self.countdown.elapsed(now),
            at_ms: now,
        })
    }

    pub fn reset_countdown(&mut self) -> Option<Event> {
        self.countdown.reset();
        Some(Event::TimerReset {
            timer: TimerKind::Countdown,
        })
    }

    // ── Pomodoro intents ─────────────────────────────────────────────

    /// `Ok(None)` while the work interval is running.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidDuration`] for a zero duration.
    pub fn set_pomodoro_work_duration(
        &mut self,
        duration_ms: u64,
    ) -> Result<Option<Event>, ValidationError> {
        if !self.pomodoro.set_work_duration(duration_ms)? {
            return Ok(None);
        }
        self.dirty = true;
        Ok(Some(Event::DurationChanged {
            timer: TimerKind::Pomodoro,
            mode: Some(PomodoroMode::Work),
            duration_ms,
        }))
    }

    /// `Ok(None)` while the break interval is running.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidDuration`] for a zero duration.
    pub fn set_pomodoro_break_duration(
        &mut self,
        duration_ms: u64,
    ) -> Result<Option<Event>, ValidationError> {
        if !self.pomodoro.set_break_duration(duration_ms)? {
            return Ok(None);
        }
        self.dirty = true;
        Ok(Some(Event::DurationChanged {
            timer: TimerKind::Pomodoro,
            mode: Some(PomodoroMode::Break),
            duration_ms,
        }))
    }

    pub fn start_pomodoro(&mut self) -> Option<Event> {
        let now = self.clock.now_ms();
        self.pomodoro
            .start(now)
            .then(|| started(TimerKind::Pomodoro, now))
    }

    pub fn pause_pomodoro(&mut self) -> Option<Event> {
        let now = self.clock.now_ms();
        self.pomodoro.pause(now).then(|| Event::TimerPaused {
            timer: TimerKind::Pomodoro,
            elapsed_ms: self.pomodoro.active().elapsed(now),
            at_ms: now,
        })
    }

    pub fn reset_pomodoro(&mut self) -> Option<Event> {
        self.pomodoro.reset();
        Some(Event::TimerReset {
            timer: TimerKind::Pomodoro,
        })
    }

    // ── Multi-timer intents ──────────────────────────────────────────

    /// Returns the new id together with the `MultiTimerAdded` event, whose
    /// name is the stored (trimmed or generated) one.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidDuration`] for a zero duration.
    pub fn add_multi_timer(
        &mut self,
        name: &str,
        duration_ms: u64,
    ) -> Result<(TimerId, Event), ValidationError> {
        let id = self.timers.add(name, duration_ms)?;
        let name = self
            .timers
            .get(id)
            .map(|entry| entry.name().to_string())
            .unwrap_or_default();
        tracing::debug!(%id, name = %name, duration_ms, "multi-timer added");
        Ok((
            id,
            Event::MultiTimerAdded {
                id,
                name,
                duration_ms,
            },
        ))
    }

    pub fn remove_multi_timer(&mut self, id: TimerId) -> Option<Event> {
        let entry = self.timers.remove(id)?;
        Some(Event::MultiTimerRemoved {
            id,
            name: entry.name().to_string(),
        })
    }

    pub fn start_multi_timer(&mut self, id: TimerId) -> Option<Event> {
        let now = self.clock.now_ms();
        self.timers
            .start(id, now)
            .then(|| started(TimerKind::Multi(id), now))
    }

    pub fn pause_multi_timer(&mut self, id: TimerId) -> Option<Event> {
        let now = self.clock.now_ms();
        if !self.timers.pause(id, now) {
            return None;
        }
        let elapsed_ms = self.timers.get(id).map(|e| e.elapsed(now)).unwrap_or(0);
        Some(Event::TimerPaused {
            timer: TimerKind::Multi(id),
            elapsed_ms,
            at_ms: now,
        })
    }

    pub fn reset_multi_timer(&mut self, id: TimerId) -> Option<Event> {
        self.timers.reset(id).then_some(Event::TimerReset {
            timer: TimerKind::Multi(id),
        })
    }

    // ── Event countdown intents ──────────────────────────────────────

    pub fn set_event_target(&mut self, target_date: DateTime<Utc>, label: &str) -> Event {
        self.event.set_target(target_date, label);
        self.dirty = true;
        Event::EventTargetSet {
            target_date,
            label: label.to_string(),
        }
    }

    pub fn clear_event(&mut self) -> Option<Event> {
        self.event.clear()?;
        self.dirty = true;
        Some(Event::EventTargetCleared)
    }

    // ── Branding intents ─────────────────────────────────────────────

    pub fn set_branding(&mut self, update: BrandingUpdate) -> Event {
        self.branding.apply(update);
        self.dirty = true;
        Event::BrandingChanged {
            branding: self.branding.clone(),
        }
    }

    pub fn reset_branding(&mut self) -> Event {
        self.branding = self.default_branding.clone();
        self.dirty = true;
        Event::BrandingChanged {
            branding: self.branding.clone(),
        }
    }
}

fn started(timer: TimerKind, at_ms: u64) -> Event {
    tracing::debug!(?timer, at_ms, "timer started");
    Event::TimerStarted { timer, at_ms }
}

// ── Snapshot types ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub at_ms: u64,
    pub stopwatch: StopwatchView,
    pub countdown: CountdownView,
    pub pomodoro: PomodoroView,
    pub timers: Vec<MultiTimerView>,
    pub event: Option<EventView>,
    pub branding: TimerBranding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopwatchView {
    pub state: TimerState,
    pub elapsed_ms: u64,
    pub laps: Vec<LapView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapView {
    pub number: usize,
    pub cumulative_elapsed_ms: u64,
    pub split_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownView {
    pub state: TimerState,
    pub duration_ms: u64,
    pub remaining_ms: u64,
    pub progress: f64,
}

impl CountdownView {
    fn of(countdown: &Countdown, now_ms: u64) -> Self {
        Self {
            state: countdown.state(),
            duration_ms: countdown.duration_ms(),
            remaining_ms: countdown.remaining(now_ms),
            progress: countdown.progress(now_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroView {
    pub mode: PomodoroMode,
    pub completed_cycles: u32,
    pub work_duration_ms: u64,
    pub break_duration_ms: u64,
    pub active: CountdownView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiTimerView {
    pub id: TimerId,
    pub name: String,
    #[serde(flatten)]
    pub timer: CountdownView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventView {
    pub label: String,
    pub target_date: DateTime<Utc>,
    pub remaining: CountdownParts,
    pub is_past: bool,
}
