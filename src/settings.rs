//! Game settings and preferences
//!
//! Persisted separately from the profile and mental state.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_YARDS, MIN_YARDS, MULTIPLIER_CAP, MULTIPLIER_FLOOR};
use crate::persistence::{self, Storage};

/// Risk selector: trades crash exposure for growth speed and ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RiskMode {
    #[default]
    Calm,
    Aggressive,
}

impl RiskMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskMode::Calm => "calm",
            RiskMode::Aggressive => "aggressive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "calm" => Some(RiskMode::Calm),
            "aggressive" | "aggro" => Some(RiskMode::Aggressive),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub risk_mode: RiskMode,

    /// Stop the flight automatically once the multiplier reaches this value
    pub auto_cashout: Option<f32>,

    /// Distance the target line sits at (yards)
    pub target_yards: u32,

    /// Scale live distance by impact quality
    pub impact_scaling: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            risk_mode: RiskMode::Calm,
            auto_cashout: None,
            target_yards: 300,
            impact_scaling: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "long_drive_settings";

    /// Effective auto cash-out target, clamped to the playable multiplier range
    pub fn effective_auto_cashout(&self) -> Option<f32> {
        self.auto_cashout
            .filter(|x| x.is_finite())
            .map(|x| x.clamp(MULTIPLIER_FLOOR, MULTIPLIER_CAP))
    }

    /// Load settings, falling back to defaults
    pub fn load(storage: &dyn Storage) -> Self {
        match persistence::load_json::<Settings>(storage, Self::STORAGE_KEY) {
            Some(mut settings) => {
                settings.target_yards = settings.target_yards.clamp(MIN_YARDS, MAX_YARDS);
                log::info!("Loaded settings ({})", settings.risk_mode.as_str());
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        if persistence::save_json(storage, Self::STORAGE_KEY, self) {
            log::info!("Settings saved");
        }
    }
}
