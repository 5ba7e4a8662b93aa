//! Branding shown alongside the timers.

use serde::{Deserialize, Serialize};

pub const DEFAULT_THEME_COLOR: &str = "#3b82f6";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerBranding {
    #[serde(default)]
    pub logo_ref: Option<String>,
    #[serde(default = "default_theme_color")]
    pub theme_color: String,
    #[serde(default)]
    pub company_name: Option<String>,
}

fn default_theme_color() -> String {
    DEFAULT_THEME_COLOR.into()
}

impl Default for TimerBranding {
    fn default() -> Self {
        Self {
            logo_ref: None,
            theme_color: default_theme_color(),
            company_name: None,
        }
    }
}

/// Partial update. `None` leaves a field as is; `Some(None)` clears an
/// optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandingUpdate {
    #[serde(default)]
    pub logo_ref: Option<Option<String>>,
    #[serde(default)]
    pub theme_color: Option<String>,
    #[serde(default)]
    pub company_name: Option<Option<String>>,
}

impl TimerBranding {
    /// Merge `update` onto the current values.
    pub fn apply(&mut self, update: BrandingUpdate) {
        if let Some(logo_ref) = update.logo_ref {
            self.logo_ref = logo_ref;
        }
        if let Some(theme_color) = update.theme_color {
            self.theme_color = theme_color;
        }
        if let Some(company_name) = update.company_name {
            self.company_name = company_name;
        }
    }
}
