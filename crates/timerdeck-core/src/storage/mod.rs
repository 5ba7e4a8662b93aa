mod config;
pub mod database;
pub mod gateway;

pub use config::{BrandingConfig, Config, DefaultsConfig, DisplayConfig};
pub use database::Database;
pub use gateway::{MemoryStore, PersistedState, PersistenceGateway, StateStore};

use std::path::PathBuf;

/// Returns `~/.config/timerdeck[-dev]/` based on TIMERDECK_ENV.
///
/// Set TIMERDECK_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TIMERDECK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("timerdeck-dev")
    } else {
        base_dir.join("timerdeck")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
