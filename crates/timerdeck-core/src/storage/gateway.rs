//! Persistence gateway.
//!
//! Only a whitelist of settings is stored: branding, the configured
//! durations and the event target. Running flags, in-progress elapsed time,
//! laps and multi-timer entries are session-only, so a reload never
//! resurrects a timer as running.
//!
//! Storage failures never reach timer logic. The first failed read or write
//! logs a warning and switches the gateway to in-memory operation for the
//! rest of the session.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::branding::TimerBranding;
use crate::clock::Clock;
use crate::engine::TimerEngine;
use crate::error::DatabaseError;
use crate::timer::EventTarget;

/// Key the settings blob is stored under.
pub const STATE_KEY: &str = "timer_engine";

/// Durable key-value storage.
pub trait StateStore {
    fn read(&self, key: &str) -> Result<Option<String>, DatabaseError>;
    fn write(&self, key: &str, value: &str) -> Result<(), DatabaseError>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: StateStore + ?Sized> StateStore for &S {
    fn read(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        (**self).write(key, value)
    }
}

impl<S: StateStore + ?Sized> StateStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        (**self).write(key, value)
    }
}

/// The persisted subset of engine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub branding: TimerBranding,
    #[serde(default)]
    pub countdown_duration_ms: u64,
    #[serde(default)]
    pub pomodoro_work_duration_ms: u64,
    #[serde(default)]
    pub pomodoro_break_duration_ms: u64,
    #[serde(default)]
    pub event_target: Option<EventTarget>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            branding: TimerBranding::default(),
            countdown_duration_ms: 5 * 60_000,
            pomodoro_work_duration_ms: 25 * 60_000,
            pomodoro_break_duration_ms: 5 * 60_000,
            event_target: None,
        }
    }
}

impl PersistedState {
    /// Replace zero durations with the matching value from `defaults`.
    pub fn sanitized(mut self, defaults: &PersistedState) -> Self {
        let fallback = |value: &mut u64, default: u64, field: &str| {
            if *value == 0 {
                tracing::warn!(field, "persisted duration missing or zero, using default");
                *value = default;
            }
        };
        fallback(
            &mut self.countdown_duration_ms,
            defaults.countdown_duration_ms,
            "countdown_duration_ms",
        );
        fallback(
            &mut self.pomodoro_work_duration_ms,
            defaults.pomodoro_work_duration_ms,
            "pomodoro_work_duration_ms",
        );
        fallback(
            &mut self.pomodoro_break_duration_ms,
            defaults.pomodoro_break_duration_ms,
            "pomodoro_break_duration_ms",
        );
        self
    }
}

pub struct PersistenceGateway<S> {
    store: S,
    degraded: bool,
}

impl<S: StateStore> PersistenceGateway<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            degraded: false,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// True once a storage failure has switched this session to memory-only.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Rehydrate settings, falling back to `defaults` for anything missing
    /// or unreadable.
    pub fn load(&mut self, defaults: &PersistedState) -> PersistedState {
        if self.degraded {
            return defaults.clone();
        }
        let raw = match self.store.read(STATE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return defaults.clone(),
            Err(e) => {
                self.degrade("read", &e);
                return defaults.clone();
            }
        };
        match serde_json::from_str::<PersistedState>(&raw) {
            Ok(state) => state.sanitized(defaults),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable persisted state");
                defaults.clone()
            }
        }
    }

    /// Write the whole blob. Returns `true` if it reached storage.
    pub fn save(&mut self, state: &PersistedState) -> bool {
        if self.degraded {
            return false;
        }
        let json = match serde_json::to_string(state) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize persisted state");
                return false;
            }
        };
        match self.store.write(STATE_KEY, &json) {
            Ok(()) => {
                tracing::debug!("persisted timer settings");
                true
            }
            Err(e) => {
                self.degrade("write", &e);
                false
            }
        }
    }

    /// Save iff the engine's persisted settings changed since the last sync.
    pub fn sync<C: Clock>(&mut self, engine: &mut TimerEngine<C>) -> bool {
        if !engine.take_dirty() {
            return false;
        }
        self.save(&engine.persisted_state())
    }

    fn degrade(&mut self, op: &str, err: &DatabaseError) {
        tracing::warn!(op, error = %err, "storage unavailable, continuing in memory only");
        self.degraded = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::cell::Cell;

    struct FlakyStore {
        fail_reads: bool,
        writes: Cell<u32>,
    }

    impl StateStore for FlakyStore {
        fn read(&self, _key: &str) -> Result<Option<String>, DatabaseError> {
            if self.fail_reads {
                Err(DatabaseError::Unavailable("disk gone".into()))
            } else {
                Ok(None)
            }
        }

        fn write(&self, _key: &str, _value: &str) -> Result<(), DatabaseError> {
            self.writes.set(self.writes.get() + 1);
            Err(DatabaseError::Unavailable("quota exceeded".into()))
        }
    }

    fn sample_state() -> PersistedState {
        PersistedState {
            branding: TimerBranding {
                company_name: Some("Acme".into()),
                ..TimerBranding::default()
            },
            countdown_duration_ms: 90_000,
            pomodoro_work_duration_ms: 1_500_000,
            pomodoro_break_duration_ms: 300_000,
            event_target: Some(EventTarget::new(
                Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
                "New Year",
            )),
        }
    }

    #[test]
    fn save_then_load_roundtrips() {
        let mut gw = PersistenceGateway::new(MemoryStore::new());
        let state = sample_state();
        assert!(gw.save(&state));
        assert_eq!(gw.load(&PersistedState::default()), state);
    }

    #[test]
    fn empty_store_yields_defaults() {
        let mut gw = PersistenceGateway::new(MemoryStore::new());
        assert_eq!(gw.load(&PersistedState::default()), PersistedState::default());
        assert!(!gw.is_degraded());
    }

    #[test]
    fn corrupt_blob_falls_back_without_degrading() {
        let store = MemoryStore::new();
        store.write(STATE_KEY, "not json").unwrap();
        let mut gw = PersistenceGateway::new(store);
        assert_eq!(gw.load(&PersistedState::default()), PersistedState::default());
        assert!(!gw.is_degraded());
    }

    #[test]
    fn zero_durations_are_replaced_per_field() {
        let store = MemoryStore::new();
        store
            .write(STATE_KEY, r#"{"countdown_duration_ms":0,"pomodoro_work_duration_ms":60000}"#)
            .unwrap();
        let mut gw = PersistenceGateway::new(store);
        let state = gw.load(&PersistedState::default());
        assert_eq!(state.countdown_duration_ms, 5 * 60_000);
        assert_eq!(state.pomodoro_work_duration_ms, 60_000);
        assert_eq!(state.pomodoro_break_duration_ms, 5 * 60_000);
    }

    #[test]
    fn read_failure_degrades_to_memory_only() {
        let mut gw = PersistenceGateway::new(FlakyStore {
            fail_reads: true,
            writes: Cell::new(0),
        });
        assert_eq!(gw.load(&PersistedState::default()), PersistedState::default());
        assert!(gw.is_degraded());
        assert!(!gw.save(&sample_state()));
        assert_eq!(gw.store().writes.get(), 0);
    }

    #[test]
    fn write_failure_degrades_after_first_attempt() {
        let mut gw = PersistenceGateway::new(FlakyStore {
            fail_reads: false,
            writes: Cell::new(0),
        });
        assert!(!gw.save(&sample_state()));
        assert!(gw.is_degraded());
        assert!(!gw.save(&sample_state()));
        assert_eq!(gw.store().writes.get(), 1);
    }
}
