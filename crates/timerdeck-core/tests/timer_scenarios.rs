//! Integration tests for the end-to-end timer scenarios.

use timerdeck_core::{
    Clock, Event, ManualClock, PersistedState, PomodoroMode, TimerEngine, TimerKind, TimerState,
};

fn engine(clock: &ManualClock) -> TimerEngine<&ManualClock> {
    TimerEngine::restore(clock, PersistedState::default()).unwrap()
}

#[test]
fn test_countdown_pause_holds_remaining_across_idle_time() {
    let clock = ManualClock::new(0);
    let mut e = engine(&clock);
    e.set_countdown_duration(5_000).unwrap();
    e.start_countdown();

    clock.set(3_000);
    assert!(e.tick().is_empty());
    assert_eq!(e.countdown().remaining(clock.now_ms()), 2_000);
    assert!(!e.countdown().is_finished());
    e.pause_countdown();

    clock.set(10_000);
    assert!(e.tick().is_empty());
    assert_eq!(e.snapshot().countdown.remaining_ms, 2_000);

    e.start_countdown();
    clock.set(12_000);
    let events = e.tick();
    assert_eq!(e.countdown().remaining(clock.now_ms()), 0);
    assert!(e.countdown().is_finished());
    assert_eq!(
        events,
        vec![Event::TimerFinished {
            timer: TimerKind::Countdown,
            at_ms: 12_000
        }]
    );
}

#[test]
fn test_multi_timers_do_not_interfere() {
    let clock = ManualClock::new(0);
    let mut e = engine(&clock);
    let pasta = e.add_multi_timer("Pasta", 60_000).unwrap().0;
    let rice = e.add_multi_timer("Rice", 1_200_000).unwrap().0;

    e.start_multi_timer(pasta);
    clock.advance(60_000);
    let events = e.tick();

    let rice_entry = e.timers().get(rice).unwrap();
    assert_eq!(rice_entry.elapsed(clock.now_ms()), 0);
    assert!(!rice_entry.is_running());
    assert_eq!(rice_entry.state(), TimerState::Idle);

    assert_eq!(e.timers().get(pasta).unwrap().state(), TimerState::Finished);
    assert_eq!(
        events,
        vec![Event::TimerFinished {
            timer: TimerKind::Multi(pasta),
            at_ms: 60_000
        }]
    );
}

#[test]
fn test_pomodoro_counts_two_cycles() {
    let clock = ManualClock::new(0);
    let mut e = engine(&clock);
    e.set_pomodoro_work_duration(1_000).unwrap();
    e.set_pomodoro_break_duration(500).unwrap();

    // work
    e.start_pomodoro();
    clock.advance(1_000);
    e.tick();
    assert_eq!(e.pomodoro().mode(), PomodoroMode::Break);
    assert!(!e.pomodoro().is_running());

    // break
    e.start_pomodoro();
    clock.advance(500);
    e.tick();
    assert_eq!(e.pomodoro().mode(), PomodoroMode::Work);

    // work
    e.start_pomodoro();
    clock.advance(1_000);
    e.tick();

    assert_eq!(e.pomodoro().completed_cycles(), 2);
    assert_eq!(e.snapshot().pomodoro.completed_cycles, 2);

    e.reset_pomodoro();
    assert_eq!(e.pomodoro().completed_cycles(), 0);
    assert_eq!(e.pomodoro().mode(), PomodoroMode::Work);
}

#[test]
fn test_finish_signal_fires_once_under_repeated_polling() {
    let clock = ManualClock::new(5_000);
    let mut e = engine(&clock);
    e.set_countdown_duration(1_000).unwrap();
    e.start_countdown();
    clock.advance(1_000);

    let mut completions = e.tick().iter().filter(|ev| ev.is_completion()).count();
    for _ in 0..10 {
        clock.advance(10);
        completions += e.tick().iter().filter(|ev| ev.is_completion()).count();
    }
    assert_eq!(completions, 1);
}

#[test]
fn test_stopwatch_ignores_tick_cadence() {
    let coarse_clock = ManualClock::new(0);
    let fine_clock = ManualClock::new(0);
    let mut coarse = engine(&coarse_clock);
    let mut fine = engine(&fine_clock);
    coarse.start_stopwatch();
    fine.start_stopwatch();

    // One engine is polled every 10 ms, the other once after a throttled gap.
    for _ in 0..1_000 {
        fine_clock.advance(10);
        fine.tick();
    }
    coarse_clock.advance(10_000);
    coarse.tick();

    assert_eq!(
        fine.stopwatch().elapsed(fine_clock.now_ms()),
        coarse.stopwatch().elapsed(coarse_clock.now_ms())
    );
    assert_eq!(coarse.snapshot().stopwatch.elapsed_ms, 10_000);
}

#[test]
fn test_removed_timer_intents_are_ignored() {
    let clock = ManualClock::new(0);
    let mut e = engine(&clock);
    let id = e.add_multi_timer("Eggs", 420_000).unwrap().0;
    e.start_multi_timer(id);
    assert!(e.remove_multi_timer(id).is_some());

    assert!(e.pause_multi_timer(id).is_none());
    assert!(e.reset_multi_timer(id).is_none());
    assert!(e.remove_multi_timer(id).is_none());
    clock.advance(420_000);
    assert!(e.tick().is_empty());

    let next = e.add_multi_timer("Toast", 1_000).unwrap().0;
    assert_ne!(id, next);
}
