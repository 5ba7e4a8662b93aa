//! Interactive session.
//!
//! Reads one intent per line from stdin while a display interval polls the
//! engine. The interval only decides how often the status line refreshes;
//! timer values come from the engine's clock, so a late or skipped interval
//! tick never shifts them.

use std::time::Duration;

use timerdeck_core::{Clock, EngineSnapshot, Event, TimerEngine, TimerId, TimerKind, TimerState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use super::Workspace;
use crate::duration::{format_ms, parse_duration};

const HELP: &str = "\
intents:
  sw start|pause|reset|lap
  cd start|pause|reset|set <duration>
  pomo start|pause|reset|work <duration>|break <duration>
  add <name> <duration>      add a multi-timer
  start|pause|reset|rm <id>  control a multi-timer
  show                       print a JSON snapshot
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    StopwatchStart,
    StopwatchPause,
    StopwatchReset,
    Lap,
    CountdownStart,
    CountdownPause,
    CountdownReset,
    CountdownSet(u64),
    PomodoroStart,
    PomodoroPause,
    PomodoroReset,
    PomodoroWork(u64),
    PomodoroBreak(u64),
    Add { name: String, duration_ms: u64 },
    Remove(TimerId),
    Start(TimerId),
    Pause(TimerId),
    Reset(TimerId),
    Show,
    Help,
    Quit,
}

fn parse_id(word: Option<&str>) -> Result<TimerId, String> {
    let word = word.ok_or("missing timer id")?;
    word.parse::<u64>()
        .map(TimerId)
        .map_err(|_| format!("invalid timer id '{word}'"))
}

fn parse_duration_arg(word: Option<&str>) -> Result<u64, String> {
    parse_duration(word.ok_or("missing duration")?)
}

pub fn parse_intent(line: &str) -> Result<Intent, String> {
    let mut words = line.split_whitespace();
    let head = words.next().ok_or("empty input")?;
    let sub = words.next();
    let intent = match (head, sub) {
        ("sw", Some("start")) => Intent::StopwatchStart,
        ("sw", Some("pause")) => Intent::StopwatchPause,
        ("sw", Some("reset")) => Intent::StopwatchReset,
        ("sw", Some("lap")) | ("lap", None) => Intent::Lap,
        ("cd", Some("start")) => Intent::CountdownStart,
        ("cd", Some("pause")) => Intent::CountdownPause,
        ("cd", Some("reset")) => Intent::CountdownReset,
        ("cd", Some("set")) => Intent::CountdownSet(parse_duration_arg(words.next())?),
        ("pomo", Some("start")) => Intent::PomodoroStart,
        ("pomo", Some("pause")) => Intent::PomodoroPause,
        ("pomo", Some("reset")) => Intent::PomodoroReset,
        ("pomo", Some("work")) => Intent::PomodoroWork(parse_duration_arg(words.next())?),
        ("pomo", Some("break")) => Intent::PomodoroBreak(parse_duration_arg(words.next())?),
        ("add", Some(_)) => {
            // The last word is the duration; everything before it is the name.
            let rest: Vec<&str> = line.split_whitespace().skip(1).collect();
            let (duration, name) = rest.split_last().ok_or("missing duration")?;
            Intent::Add {
                name: name.join(" "),
                duration_ms: parse_duration(duration)?,
            }
        }
        ("start", id) => Intent::Start(parse_id(id)?),
        ("pause", id) => Intent::Pause(parse_id(id)?),
        ("reset", id) => Intent::Reset(parse_id(id)?),
        ("rm", id) => Intent::Remove(parse_id(id)?),
        ("show", None) => Intent::Show,
        ("help", None) => Intent::Help,
        ("quit" | "exit", None) => Intent::Quit,
        _ => return Err(format!("unknown intent '{}'", line.trim())),
    };
    Ok(intent)
}

/// Route an intent to the engine. `Ok(None)` means the intent was a no-op.
pub fn apply<C: Clock>(
    engine: &mut TimerEngine<C>,
    intent: Intent,
) -> Result<Option<Event>, timerdeck_core::ValidationError> {
    let event = match intent {
        Intent::StopwatchStart => engine.start_stopwatch(),
        Intent::StopwatchPause => engine.pause_stopwatch(),
        Intent::StopwatchReset => engine.reset_stopwatch(),
        Intent::Lap => engine.add_lap(),
        Intent::CountdownStart => engine.start_countdown(),
        Intent::CountdownPause => engine.pause_countdown(),
        Intent::CountdownReset => engine.reset_countdown(),
        Intent::CountdownSet(ms) => engine.set_countdown_duration(ms)?,
        Intent::PomodoroStart => engine.start_pomodoro(),
        Intent::PomodoroPause => engine.pause_pomodoro(),
        Intent::PomodoroReset => engine.reset_pomodoro(),
        Intent::PomodoroWork(ms) => engine.set_pomodoro_work_duration(ms)?,
        Intent::PomodoroBreak(ms) => engine.set_pomodoro_break_duration(ms)?,
        Intent::Add { name, duration_ms } => {
            let (_, event) = engine.add_multi_timer(&name, duration_ms)?;
            Some(event)
        }
        Intent::Remove(id) => engine.remove_multi_timer(id),
        Intent::Start(id) => engine.start_multi_timer(id),
        Intent::Pause(id) => engine.pause_multi_timer(id),
        Intent::Reset(id) => engine.reset_multi_timer(id),
        Intent::Show | Intent::Help | Intent::Quit => None,
    };
    Ok(event)
}

fn state_mark(state: TimerState) -> &'static str {
    match state {
        TimerState::Idle => "-",
        TimerState::Running => ">",
        TimerState::Paused => "=",
        TimerState::Finished => "!",
    }
}

/// One-line summary used as the refreshing display.
pub fn status_line(snap: &EngineSnapshot) -> String {
    let mut parts = vec![
        format!(
            "sw {}{}",
            state_mark(snap.stopwatch.state),
            format_ms(snap.stopwatch.elapsed_ms)
        ),
        format!(
            "cd {}{}",
            state_mark(snap.countdown.state),
            format_ms(snap.countdown.remaining_ms)
        ),
        format!(
            "pomo {:?} {}{} #{}",
            snap.pomodoro.mode,
            state_mark(snap.pomodoro.active.state),
            format_ms(snap.pomodoro.active.remaining_ms),
            snap.pomodoro.completed_cycles
        ),
    ];
    for t in &snap.timers {
        parts.push(format!(
            "[{}] {} {}{}",
            t.id,
            t.name,
            state_mark(t.timer.state),
            format_ms(t.timer.remaining_ms)
        ));
    }
    if let Some(ev) = &snap.event {
        parts.push(format!(
            "{}: {}d {:02}:{:02}:{:02}",
            ev.label,
            ev.remaining.days,
            ev.remaining.hours,
            ev.remaining.minutes,
            ev.remaining.seconds
        ));
    }
    parts.join(" | ")
}

fn alert(event: &Event) {
    if let Event::TimerFinished { timer, .. } = event {
        let what = match timer {
            TimerKind::Stopwatch => "stopwatch".to_string(),
            TimerKind::Countdown => "countdown".to_string(),
            TimerKind::Pomodoro => "pomodoro interval".to_string(),
            TimerKind::Multi(id) => format!("timer {id}"),
        };
        println!("\x07*** {what} finished ***");
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session())
}

async fn session() -> Result<(), Box<dyn std::error::Error>> {
    let Workspace {
        config,
        mut gateway,
        mut engine,
    } = Workspace::open()?;

    let refresh = Duration::from_millis(config.display.refresh_ms.max(10));
    let mut interval = tokio::time::interval(refresh);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_line = String::new();

    println!("{HELP}");
    loop {
        tokio::select! {
            _ = interval.tick() => {
                for event in engine.tick() {
                    alert(&event);
                }
                let line = status_line(&engine.snapshot());
                if line != last_line {
                    println!("{line}");
                    last_line = line;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_intent(&line) {
                    Ok(Intent::Quit) => break,
                    Ok(Intent::Help) => println!("{HELP}"),
                    Ok(Intent::Show) => {
                        println!("{}", serde_json::to_string_pretty(&engine.snapshot())?)
                    }
                    Ok(intent) => match apply(&mut engine, intent) {
                        Ok(Some(event)) => println!("{}", serde_json::to_string(&event)?),
                        Ok(None) => tracing::debug!("intent had no effect"),
                        Err(e) => eprintln!("rejected: {e}"),
                    },
                    Err(e) => eprintln!("{e} (type 'help')"),
                }
                gateway.sync(&mut engine);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    gateway.sync(&mut engine);
    if gateway.is_degraded() {
        eprintln!("warning: storage unavailable, settings from this session were not saved");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use timerdeck_core::{ManualClock, PersistedState};

    #[test]
    fn parses_timer_intents() {
        assert_eq!(parse_intent("sw start"), Ok(Intent::StopwatchStart));
        assert_eq!(parse_intent("lap"), Ok(Intent::Lap));
        assert_eq!(parse_intent("cd set 90s"), Ok(Intent::CountdownSet(90_000)));
        assert_eq!(parse_intent("pomo break 5m"), Ok(Intent::PomodoroBreak(300_000)));
        assert_eq!(parse_intent("pause 3"), Ok(Intent::Pause(TimerId(3))));
        assert_eq!(parse_intent("quit"), Ok(Intent::Quit));
    }

    #[test]
    fn add_takes_multi_word_names() {
        assert_eq!(
            parse_intent("add Boiled eggs 7m"),
            Ok(Intent::Add {
                name: "Boiled eggs".into(),
                duration_ms: 420_000
            })
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_intent("").is_err());
        assert!(parse_intent("dance").is_err());
        assert!(parse_intent("start x").is_err());
        assert!(parse_intent("cd set").is_err());
    }

    #[test]
    fn apply_routes_to_engine() {
        let clock = ManualClock::new(0);
        let mut engine = TimerEngine::restore(&clock, PersistedState::default()).unwrap();
        let added = apply(
            &mut engine,
            Intent::Add {
                name: "Pasta".into(),
                duration_ms: 60_000,
            },
        )
        .unwrap();
        let id = match added {
            Some(Event::MultiTimerAdded { id, .. }) => id,
            other => panic!("expected add event, got {other:?}"),
        };
        assert!(apply(&mut engine, Intent::Start(id)).unwrap().is_some());
        assert!(apply(&mut engine, Intent::Start(id)).unwrap().is_none());
        assert!(apply(&mut engine, Intent::CountdownSet(0)).is_err());

        clock.advance(60_000);
        let events = engine.tick();
        assert!(events.iter().any(Event::is_completion));
    }

    #[test]
    fn status_line_lists_every_timer() {
        let clock = ManualClock::new(0);
        let mut engine = TimerEngine::restore(&clock, PersistedState::default()).unwrap();
        engine.add_multi_timer("Rice", 1_200_000).unwrap();
        let line = status_line(&engine.snapshot());
        assert!(line.starts_with("sw -00:00 | cd -05:00 | pomo Work -25:00 #0"));
        assert!(line.contains("[1] Rice -20:00"));
    }
}
