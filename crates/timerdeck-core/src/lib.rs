//! # Timerdeck Core Library
//!
//! This library provides the timer engine behind the Timerdeck stopwatch,
//! countdown, Pomodoro, multi-timer and event-countdown tools. Adapters (the
//! CLI, or any GUI) hold a [`TimerEngine`] and send it intents; the engine
//! never runs its own loop.
//!
//! ## Architecture
//!
//! - **Clock**: the only impure input; injected so tests can drive time
//! - **Timers**: drift-free state machines built on [`ElapsedAccumulator`],
//!   which derives elapsed time from a start instant rather than summing ticks
//! - **Engine**: owns all timers, branding and the event target
//! - **Storage**: TOML configuration, SQLite key-value store and the
//!   persistence gateway that degrades to memory-only on failure
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Intent surface and polling entry point
//! - [`PersistenceGateway`]: Whitelisted settings persistence
//! - [`Config`]: Application configuration management
//! - [`Event`]: Transition and completion notifications

pub mod branding;
pub mod clock;
pub mod engine;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use branding::{BrandingUpdate, TimerBranding};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{EngineSnapshot, TimerEngine};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::{Event, TimerKind};
pub use storage::{Config, Database, MemoryStore, PersistedState, PersistenceGateway, StateStore};
pub use timer::{
    Countdown, CountdownParts, ElapsedAccumulator, EventCountdown, EventTarget, LapRecord,
    MultiTimerRegistry, PomodoroCycle, PomodoroMode, Stopwatch, TimerId, TimerState,
};
