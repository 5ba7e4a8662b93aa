//! TOML-based application configuration.
//!
//! Stores defaults used before any settings have been persisted:
//! - Countdown and Pomodoro durations
//! - The fixed branding that `reset_branding` restores
//! - Display refresh cadence for interactive adapters
//!
//! Configuration is stored at `~/.config/timerdeck/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use super::gateway::PersistedState;
use crate::branding::{TimerBranding, DEFAULT_THEME_COLOR};
use crate::error::{ConfigError, CoreError};

const MINUTE_MS: u64 = 60_000;

/// Default durations, in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_countdown_min")]
    pub countdown_min: u64,
    #[serde(default = "default_pomodoro_work_min")]
    pub pomodoro_work_min: u64,
    #[serde(default = "default_pomodoro_break_min")]
    pub pomodoro_break_min: u64,
}

/// Fixed branding restored on reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandingConfig {
    #[serde(default = "default_theme_color")]
    pub theme_color: String,
    #[serde(default)]
    pub logo_ref: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Interval between display refreshes in interactive sessions.
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/timerdeck/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub branding: BrandingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_countdown_min() -> u64 {
    5
}
fn default_pomodoro_work_min() -> u64 {
    25
}
fn default_pomodoro_break_min() -> u64 {
    5
}
fn default_theme_color() -> String {
    DEFAULT_THEME_COLOR.into()
}
fn default_refresh_ms() -> u64 {
    100
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            countdown_min: default_countdown_min(),
            pomodoro_work_min: default_pomodoro_work_min(),
            pomodoro_break_min: default_pomodoro_break_min(),
        }
    }
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            theme_color: default_theme_color(),
            logo_ref: None,
            company_name: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_ms: default_refresh_ms(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the default file if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::path()?)
    }

    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                CoreError::from(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(CoreError::from(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    ///
    /// See [`Config::save`].
    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Unknown keys and zero durations
    /// are rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        let d = &updated.defaults;
        if [d.countdown_min, d.pomodoro_work_min, d.pomodoro_break_min].contains(&0) {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "duration must be positive".into(),
            });
        }
        *self = updated;
        Ok(())
    }

    /// Branding restored by `reset_branding`.
    pub fn default_branding(&self) -> TimerBranding {
        TimerBranding {
            logo_ref: self.branding.logo_ref.clone(),
            theme_color: self.branding.theme_color.clone(),
            company_name: self.branding.company_name.clone(),
        }
    }

    /// Settings used when nothing has been persisted yet.
    pub fn persisted_defaults(&self) -> PersistedState {
        let minutes = |m: u64| m.max(1).saturating_mul(MINUTE_MS);
        PersistedState {
            branding: self.default_branding(),
            countdown_duration_ms: minutes(self.defaults.countdown_min),
            pomodoro_work_duration_ms: minutes(self.defaults.pomodoro_work_min),
            pomodoro_break_duration_ms: minutes(self.defaults.pomodoro_break_min),
            event_target: None,
        }
    }
}
