//! Per-tick input snapshot and world queries supplied by the host.

use serde::{Deserialize, Serialize};

/// A keyboard key, identified by a lowercase name ("e", "space", "escape")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct KeyCode(String);

impl KeyCode {
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for KeyCode {
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

impl From<KeyCode> for String {
    fn from(key: KeyCode) -> Self {
        key.0
    }
}

impl Default for KeyCode {
    fn default() -> Self {
        Self::new("e")
    }
}

/// Result of a world intersection under the pointer
#[derive(Debug, Clone, PartialEq)]
pub struct PointerHit {
    /// Identity of the nearest blocking object that was hit
    pub object: String,
    /// Distance from the ray origin
    pub distance: f32,
    /// Texture coordinate on the hit surface, when it has one
    pub uv: Option<(f32, f32)>,
}

impl PointerHit {
    pub fn new(object: &str, distance: f32) -> Self {
        Self {
            object: object.to_string(),
            distance,
            uv: None,
        }
    }

    pub fn with_uv(mut self, u: f32, v: f32) -> Self {
        self.uv = Some((u, v));
        self
    }
}

/// Discrete input events that happened since the previous tick
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub keys_down: Vec<KeyCode>,
    /// Primary button pressed this tick
    pub primary_click: bool,
    /// What the pointer ray hits this tick, if anything
    pub pointer_hit: Option<PointerHit>,
}

impl FrameInput {
    pub fn key(name: &str) -> Self {
        Self {
            keys_down: vec![KeyCode::new(name)],
            ..Default::default()
        }
    }

    pub fn click() -> Self {
        Self {
            primary_click: true,
            ..Default::default()
        }
    }

    pub fn click_on(hit: PointerHit) -> Self {
        Self {
            primary_click: true,
            pointer_hit: Some(hit),
            ..Default::default()
        }
    }

    pub fn key_down(&self, key: &KeyCode) -> bool {
        self.keys_down.iter().any(|k| k == key)
    }

    pub fn clear(&mut self) {
        self.keys_down.clear();
        self.primary_click = false;
        self.pointer_hit = None;
    }
}

/// Casts rays into scenes the core cannot see, such as the one rendered by a
/// lock's own camera.
pub trait Raycaster {
    fn cast_from_screen(&self, camera: &str, pixel: (f32, f32), max_distance: f32) -> Option<PointerHit>;
}

/// Raycaster for hosts without secondary cameras
pub struct NoRaycast;

impl Raycaster for NoRaycast {
    fn cast_from_screen(&self, _camera: &str, _pixel: (f32, f32), _max_distance: f32) -> Option<PointerHit> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_normalized() {
        assert_eq!(KeyCode::new(" E "), KeyCode::new("e"));
        let input = FrameInput::key("E");
        assert!(input.key_down(&KeyCode::default()));
        assert!(!input.key_down(&KeyCode::new("f")));
    }

    #[test]
    fn test_key_deserializes_from_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            key: KeyCode,
        }
        let wrapper: Wrapper = toml::from_str("key = \"Space\"").unwrap();
        assert_eq!(wrapper.key.as_str(), "space");
    }
}
