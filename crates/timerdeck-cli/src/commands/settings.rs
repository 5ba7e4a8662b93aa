use clap::Subcommand;

use super::{print_json, Workspace};
use crate::duration::parse_duration;

#[derive(Subcommand)]
pub enum CountdownAction {
    /// Set the countdown duration (e.g. "90s", "25m", "1h30m")
    Set {
        duration: String,
    },
    /// Show the configured duration
    Show,
}

#[derive(Subcommand)]
pub enum PomodoroAction {
    /// Set the work interval duration
    Work {
        duration: String,
    },
    /// Set the break interval duration
    Break {
        duration: String,
    },
    /// Show the configured durations
    Show,
}

pub fn run_countdown(action: CountdownAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ws = Workspace::open()?;
    match action {
        CountdownAction::Set { duration } => {
            let ms = parse_duration(&duration)?;
            if let Some(event) = ws.engine.set_countdown_duration(ms)? {
                print_json(&event)?;
            }
        }
        CountdownAction::Show => {
            print_json(&ws.engine.snapshot().countdown)?;
        }
    }
    ws.finish();
    Ok(())
}

pub fn run_pomodoro(action: PomodoroAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ws = Workspace::open()?;
    match action {
        PomodoroAction::Work { duration } => {
            let ms = parse_duration(&duration)?;
            if let Some(event) = ws.engine.set_pomodoro_work_duration(ms)? {
                print_json(&event)?;
            }
        }
        PomodoroAction::Break { duration } => {
            let ms = parse_duration(&duration)?;
            if let Some(event) = ws.engine.set_pomodoro_break_duration(ms)? {
                print_json(&event)?;
            }
        }
        PomodoroAction::Show => {
            print_json(&ws.engine.snapshot().pomodoro)?;
        }
    }
    ws.finish();
    Ok(())
}
