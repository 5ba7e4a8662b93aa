pub mod branding;
pub mod config;
pub mod event;
pub mod session;
pub mod settings;
pub mod status;

use timerdeck_core::{
    Config, Database, MemoryStore, PersistenceGateway, StateStore, SystemClock, TimerEngine,
};

pub type Gateway = PersistenceGateway<Box<dyn StateStore>>;

/// Everything a command needs: configuration, the persistence gateway and an
/// engine rehydrated from it.
pub struct Workspace {
    pub config: Config,
    pub gateway: Gateway,
    pub engine: TimerEngine<SystemClock>,
}

impl Workspace {
    /// # Errors
    /// Returns an error if the persisted durations cannot build an engine.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load_or_default();
        let store: Box<dyn StateStore> = match Database::open() {
            Ok(db) => Box::new(db),
            Err(e) => {
                tracing::warn!(error = %e, "database unavailable, settings will not be saved");
                Box::new(MemoryStore::new())
            }
        };
        let mut gateway = PersistenceGateway::new(store);
        let state = gateway.load(&config.persisted_defaults());
        let engine = TimerEngine::restore(SystemClock, state)?
            .with_default_branding(config.default_branding());
        Ok(Self {
            config,
            gateway,
            engine,
        })
    }

    /// Persist any settings the command changed.
    pub fn finish(mut self) {
        if self.engine.take_dirty() && !self.gateway.save(&self.engine.persisted_state()) {
            eprintln!("warning: settings were not saved");
        }
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
