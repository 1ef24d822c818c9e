//! Presentation Cues
//!
//! Everything the core wants shown, played or animated goes through
//! [`Presenter`]. Calls are fire-and-forget: the core never reads anything
//! back, and every method defaults to doing nothing so a host only
//! implements what it can display.

use tracing::info;

use crate::inventory::InventorySlot;

#[allow(unused_variables)]
pub trait Presenter {
    // Interaction prompt and note panel
    fn set_prompt_text(&mut self, object: &str, text: &str) {}
    fn set_prompt_alpha(&mut self, object: &str, alpha: f32) {}
    fn show_note(&mut self, object: &str, text: &str) {}
    fn hide_note(&mut self, object: &str) {}

    // Dialogue panel
    fn show_dialogue_panel(&mut self) {}
    fn hide_dialogue_panel(&mut self) {}
    fn set_dialogue_text(&mut self, text: &str) {}
    fn set_speaker(&mut self, name: &str, portrait: Option<&str>) {}
    fn play_voice(&mut self, clip: &str) {}
    fn stop_voice(&mut self) {}

    // Object effects
    fn play_sfx(&mut self, object: &str, clip: &str) {}
    fn set_animation_trigger(&mut self, object: &str, trigger: &str) {}
    fn set_animation_bool(&mut self, object: &str, parameter: &str, value: bool) {}
    fn play_animation_clip(&mut self, object: &str, clip: &str) {}
    fn set_wheel_rotation(&mut self, lock: &str, wheel: usize, degrees: f32) {}
    fn remove_object(&mut self, object: &str) {}

    /// Movement input and cursor capture
    fn set_player_control(&mut self, enabled: bool) {}

    // Inventory and quest panels
    fn set_inventory_slot(&mut self, index: usize, slot: &InventorySlot) {}
    fn show_item_description(&mut self, name: &str, description: &str, icon: Option<&str>) {}
    fn hide_item_description(&mut self) {}
    fn set_quest_log(&mut self, text: &str) {}
}

/// Presenter for headless runs: every cue becomes a log line
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn set_prompt_text(&mut self, object: &str, text: &str) {
        info!("[{}] prompt: {}", object, text);
    }

    fn show_note(&mut self, object: &str, text: &str) {
        info!("[{}] note opened: {}", object, text);
    }

    fn hide_note(&mut self, object: &str) {
        info!("[{}] note closed", object);
    }

    fn show_dialogue_panel(&mut self) {
        info!("dialogue panel shown");
    }

    fn hide_dialogue_panel(&mut self) {
        info!("dialogue panel hidden");
    }

    fn set_dialogue_text(&mut self, text: &str) {
        info!("dialogue: {}", text);
    }

    fn set_speaker(&mut self, name: &str, _portrait: Option<&str>) {
        if !name.is_empty() {
            info!("speaker: {}", name);
        }
    }

    fn play_sfx(&mut self, object: &str, clip: &str) {
        info!("[{}] sfx {}", object, clip);
    }

    fn set_animation_trigger(&mut self, object: &str, trigger: &str) {
        info!("[{}] animation trigger {}", object, trigger);
    }

    fn set_animation_bool(&mut self, object: &str, parameter: &str, value: bool) {
        info!("[{}] animation {} = {}", object, parameter, value);
    }

    fn play_animation_clip(&mut self, object: &str, clip: &str) {
        info!("[{}] animation clip {}", object, clip);
    }

    fn set_wheel_rotation(&mut self, lock: &str, wheel: usize, degrees: f32) {
        info!("[{}] wheel {} -> {:.0} deg", lock, wheel, degrees);
    }

    fn remove_object(&mut self, object: &str) {
        info!("[{}] removed", object);
    }

    fn set_player_control(&mut self, enabled: bool) {
        info!("player control {}", if enabled { "enabled" } else { "disabled" });
    }

    fn set_inventory_slot(&mut self, index: usize, slot: &InventorySlot) {
        info!("inventory slot {}: {}", index, slot.item_name);
    }

    fn show_item_description(&mut self, name: &str, description: &str, _icon: Option<&str>) {
        info!("item {}: {}", name, description);
    }

    fn set_quest_log(&mut self, text: &str) {
        info!("quest log:\n{}", text);
    }
}
