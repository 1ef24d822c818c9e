//! Lock Definitions
//!
//! ```toml
//! [[lock]]
//! id = "study_safe"
//! wheels = ["safe_wheel_0", "safe_wheel_1", "safe_wheel_2"]
//! start_values = [7, 7, 7]
//! target = [1, 2, 3]
//! door_parameter = "OpenDoor"
//! reward = { name = "Cellar Map" }
//!
//! [lock.render_surface]
//! object = "safe_screen"
//! camera = "safe_camera"
//! width = 512
//! height = 512
//! ```

use serde::Deserialize;
use tracing::warn;

use crate::error::LoadError;
use crate::input::KeyCode;
use crate::inventory::ItemReward;
use crate::quest::QuestHooks;

/// Positions per wheel
pub const WHEEL_POSITIONS: u8 = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct LockConfig {
    pub id: String,
    /// Scene object names of the wheels, in combination order
    pub wheels: Vec<String>,
    /// Defaults to 7 on every wheel
    #[serde(default)]
    pub start_values: Vec<i32>,
    pub target: Vec<u8>,
    #[serde(default = "default_rotation_per_step")]
    pub rotation_per_step: f32,
    /// Visual wheel angles at load time; zero when absent
    #[serde(default)]
    pub initial_angles: Option<Vec<f32>>,
    #[serde(default)]
    pub interact_key: KeyCode,
    /// Farthest pointer hit that turns a wheel
    #[serde(default = "default_max_reach")]
    pub max_reach: f32,
    #[serde(default)]
    pub reward: Option<ItemReward>,
    #[serde(default)]
    pub quests: QuestHooks,
    /// Clip played on the lock object when it opens
    #[serde(default)]
    pub unlock_animation: Option<String>,
    /// Animator bool set true on the lock object when it opens
    #[serde(default)]
    pub door_parameter: Option<String>,
    #[serde(default)]
    pub render_surface: Option<RenderSurface>,
}

/// A surface showing the lock camera's render texture. Clicks on it are
/// re-cast into the lock scene.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderSurface {
    pub object: String,
    pub camera: String,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_surface_distance")]
    pub max_distance: f32,
}

fn default_rotation_per_step() -> f32 {
    45.0
}

fn default_max_reach() -> f32 {
    5.0
}

fn default_surface_distance() -> f32 {
    10.0
}

impl LockConfig {
    pub fn new(id: &str, wheels: &[&str], start_values: &[i32], target: &[u8]) -> Self {
        Self {
            id: id.to_string(),
            wheels: wheels.iter().map(|w| w.to_string()).collect(),
            start_values: start_values.to_vec(),
            target: target.to_vec(),
            rotation_per_step: default_rotation_per_step(),
            initial_angles: None,
            interact_key: KeyCode::default(),
            max_reach: default_max_reach(),
            reward: None,
            quests: QuestHooks::default(),
            unlock_animation: None,
            door_parameter: None,
            render_surface: None,
        }
    }

    /// Reject shape mismatches, then return start values clamped into
    /// wheel range.
    pub fn validate(&self) -> Result<Vec<u8>, LoadError> {
        let count = self.wheels.len();
        if count == 0 {
            return Err(LoadError::invalid("lock", &self.id, "no wheels"));
        }
        if self.target.len() != count {
            return Err(LoadError::invalid(
                "lock",
                &self.id,
                format!("{} wheels but {} target values", count, self.target.len()),
            ));
        }
        if !self.start_values.is_empty() && self.start_values.len() != count {
            return Err(LoadError::invalid(
                "lock",
                &self.id,
                format!("{} wheels but {} start values", count, self.start_values.len()),
            ));
        }
        if let Some(angles) = &self.initial_angles {
            if angles.len() != count {
                return Err(LoadError::invalid(
                    "lock",
                    &self.id,
                    format!("{} wheels but {} initial angles", count, angles.len()),
                ));
            }
        }
        if let Some(value) = self.target.iter().find(|&&v| v >= WHEEL_POSITIONS) {
            return Err(LoadError::invalid(
                "lock",
                &self.id,
                format!("target value {} is out of range 0..=7", value),
            ));
        }
        if let Some(surface) = &self.render_surface {
            if surface.width == 0 || surface.height == 0 {
                return Err(LoadError::invalid("lock", &self.id, "render surface has zero size"));
            }
        }

        let max = i32::from(WHEEL_POSITIONS - 1);
        let values = if self.start_values.is_empty() {
            vec![WHEEL_POSITIONS - 1; count]
        } else {
            self.start_values
                .iter()
                .map(|&v| {
                    let clamped = v.clamp(0, max);
                    if clamped != v {
                        warn!("Lock '{}' start value {} clamped to {}", self.id, v, clamped);
                    }
                    // In 0..=7 after the clamp
                    clamped as u8
                })
                .collect()
        };
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_start_values() {
        let config = LockConfig::new("safe", &["a", "b", "c"], &[-2, 3, 12], &[1, 2, 3]);
        assert_eq!(config.validate().unwrap(), vec![0, 3, 7]);
    }

    #[test]
    fn test_default_start_values() {
        let config = LockConfig::new("safe", &["a", "b"], &[], &[1, 2]);
        assert_eq!(config.validate().unwrap(), vec![7, 7]);
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let config = LockConfig::new("safe", &["a", "b", "c"], &[7, 7, 7], &[1, 2]);
        assert!(matches!(config.validate(), Err(LoadError::Invalid { .. })));

        let config = LockConfig::new("safe", &["a", "b"], &[7, 7, 7], &[1, 2]);
        assert!(config.validate().is_err());

        let mut config = LockConfig::new("safe", &["a"], &[7], &[1]);
        config.initial_angles = Some(vec![0.0, 0.0]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_target_out_of_range() {
        let config = LockConfig::new("safe", &["a"], &[0], &[8]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse() {
        #[derive(Deserialize)]
        struct File {
            lock: Vec<LockConfig>,
        }

        let file: File = toml::from_str(
            r#"
[[lock]]
id = "safe"
wheels = ["w0", "w1"]
target = [4, 5]
door_parameter = "OpenDoor"

[lock.quests]
complete = "crack_safe"

[lock.render_surface]
object = "screen"
camera = "safe_cam"
width = 256
height = 128
"#,
        )
        .unwrap();

        let lock = &file.lock[0];
        assert!((lock.rotation_per_step - 45.0).abs() < f32::EPSILON);
        assert!((lock.max_reach - 5.0).abs() < f32::EPSILON);
        assert_eq!(lock.quests.complete.as_deref(), Some("crack_safe"));
        let surface = lock.render_surface.as_ref().unwrap();
        assert_eq!(surface.width, 256);
        assert!((surface.max_distance - 10.0).abs() < f32::EPSILON);
    }
}
