//! Scene Settings
//!
//! Tunables read from `settings.toml` at the root of the data directory.
//! Every field has a default so a partial (or missing) file is fine.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{parse_toml, read_file, LoadError};

/// Harness tick rate used when the settings file does not set one
pub const DEFAULT_TICK_RATE: f32 = 60.0;

/// Upper bound that keeps the tick period above zero
pub const MAX_TICK_RATE: f32 = 1000.0;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dialogue: DialogueSettings,
    pub inventory: InventorySettings,
    pub harness: HarnessSettings,
}

/// Typewriter and panel timings, in seconds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DialogueSettings {
    /// Delay between two revealed characters
    pub typing_interval: f32,
    /// Delay between the last line and hiding the panel
    pub fade_out_delay: f32,
    /// Display time of a temporary message
    pub message_duration: f32,
}

impl Default for DialogueSettings {
    fn default() -> Self {
        Self {
            typing_interval: 0.03,
            fade_out_delay: 1.5,
            message_duration: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InventorySettings {
    pub capacity: usize,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            capacity: crate::inventory::DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarnessSettings {
    /// Ticks per second
    pub tick_rate: f32,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
        }
    }
}

impl Settings {
    /// Load `settings.toml` from the data directory, falling back to defaults
    pub fn load(data_dir: &Path) -> Result<Self, LoadError> {
        let path = data_dir.join("settings.toml");
        if !path.exists() {
            warn!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = read_file(&path)?;
        let settings: Settings = parse_toml(&path, &content)?;
        settings.validate()?;
        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    fn validate(&self) -> Result<(), LoadError> {
        let timings = [
            self.dialogue.typing_interval,
            self.dialogue.fade_out_delay,
            self.dialogue.message_duration,
        ];
        if !timings.iter().all(|t| t.is_finite() && *t >= 0.0) {
            return Err(LoadError::invalid(
                "settings",
                "dialogue",
                "timings must be finite and not negative",
            ));
        }
        if self.inventory.capacity == 0 {
            return Err(LoadError::invalid("settings", "inventory", "capacity must be at least 1"));
        }
        let tick_rate = self.harness.tick_rate;
        if !(tick_rate.is_finite() && tick_rate > 0.0 && tick_rate <= MAX_TICK_RATE) {
            return Err(LoadError::invalid(
                "settings",
                "harness",
                "tick_rate must be positive and at most 1000",
            ));
        }
        Ok(())
    }
}
