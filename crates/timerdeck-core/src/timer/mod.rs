mod accumulator;
mod countdown;
mod event_countdown;
mod pomodoro;
mod registry;
mod stopwatch;

pub use accumulator::ElapsedAccumulator;
pub use countdown::{Countdown, TimerState};
pub use event_countdown::{CountdownParts, EventCountdown, EventTarget};
pub use pomodoro::{ModeSwitch, PomodoroCycle, PomodoroMode};
pub use registry::{MultiTimerRegistry, TimerEntry, TimerId};
pub use stopwatch::{LapRecord, Stopwatch};
