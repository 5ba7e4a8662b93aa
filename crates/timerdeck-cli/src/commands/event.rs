use chrono::{DateTime, Utc};
use clap::Subcommand;

use super::{print_json, Workspace};

#[derive(Subcommand)]
pub enum EventAction {
    /// Count down to a date (RFC 3339, e.g. "2030-01-01T00:00:00Z")
    Set {
        date: DateTime<Utc>,
        /// Label shown with the countdown
        label: String,
    },
    /// Remove the event target
    Clear,
    /// Show time remaining until the event
    Show,
}

pub fn run(action: EventAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ws = Workspace::open()?;
    match action {
        EventAction::Set { date, label } => {
            print_json(&ws.engine.set_event_target(date, &label))?;
        }
        EventAction::Clear => match ws.engine.clear_event() {
            Some(event) => print_json(&event)?,
            None => println!("no event set"),
        },
        EventAction::Show => match ws.engine.snapshot().event {
            Some(view) => print_json(&view)?,
            None => println!("no event set"),
        },
    }
    ws.finish();
    Ok(())
}
