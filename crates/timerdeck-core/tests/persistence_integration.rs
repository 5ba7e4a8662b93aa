//! Integration tests for settings persistence through SQLite.

use chrono::{TimeZone, Utc};
use timerdeck_core::{
    BrandingUpdate, Config, Database, ManualClock, PersistenceGateway, TimerEngine, TimerState,
};

#[test]
fn test_settings_survive_reload_but_running_state_does_not() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timerdeck.db");
    let defaults = Config::default().persisted_defaults();
    let clock = ManualClock::new(1_000);

    {
        let mut gateway = PersistenceGateway::new(Database::open_at(&path).unwrap());
        let mut engine = TimerEngine::restore(&clock, gateway.load(&defaults)).unwrap();

        engine.set_countdown_duration(90_000).unwrap();
        engine.set_pomodoro_work_duration(50 * 60_000).unwrap();
        engine.set_pomodoro_break_duration(10 * 60_000).unwrap();
        engine.set_branding(BrandingUpdate {
            company_name: Some(Some("Acme".into())),
            ..BrandingUpdate::default()
        });
        engine.set_event_target(Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap(), "Launch");

        engine.start_countdown();
        engine.start_stopwatch();
        engine.add_multi_timer("Pasta", 60_000).unwrap();
        clock.advance(5_000);
        engine.add_lap();

        assert!(gateway.sync(&mut engine));
        assert!(!gateway.sync(&mut engine));
    }

    let mut gateway = PersistenceGateway::new(Database::open_at(&path).unwrap());
    let engine = TimerEngine::restore(&clock, gateway.load(&defaults)).unwrap();

    assert_eq!(engine.countdown().duration_ms(), 90_000);
    assert_eq!(engine.pomodoro().work_duration_ms(), 50 * 60_000);
    assert_eq!(engine.pomodoro().break_duration_ms(), 10 * 60_000);
    assert_eq!(engine.branding().company_name.as_deref(), Some("Acme"));
    assert_eq!(engine.event_countdown().target().unwrap().label, "Launch");

    assert_eq!(engine.countdown().state(), TimerState::Idle);
    assert_eq!(engine.stopwatch().state(), TimerState::Idle);
    assert!(engine.stopwatch().laps().is_empty());
    assert!(engine.timers().is_empty());
}

#[test]
fn test_clearing_event_is_persisted() {
    let db = Database::open_memory().unwrap();
    let defaults = Config::default().persisted_defaults();
    let clock = ManualClock::new(0);
    let mut gateway = PersistenceGateway::new(&db);

    let mut engine = TimerEngine::restore(&clock, gateway.load(&defaults)).unwrap();
    engine.set_event_target(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(), "Party");
    gateway.sync(&mut engine);
    engine.clear_event();
    gateway.sync(&mut engine);

    let reloaded = gateway.load(&defaults);
    assert!(reloaded.event_target.is_none());
}
