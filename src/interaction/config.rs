//! Interactable Definitions
//!
//! Design-time configuration of interactive objects, loaded from
//! `interactables/*.toml`:
//!
//! ```toml
//! [[interactable]]
//! id = "cellar_door"
//! kinds = ["note", "dialogue"]
//! dialogue = "cellar_door_locked"
//! required_item = "Brass Key"
//! note = { text = "Keep out." }
//!
//! [interactable.quests]
//! complete = "open_cellar"
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::input::KeyCode;
use crate::inventory::ItemReward;
use crate::quest::QuestHooks;

// ============================================================================
// Interaction Kinds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    PromptOnly,
    Dialogue,
    Note,
    GiveItem,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::PromptOnly => "prompt_only",
            InteractionKind::Dialogue => "dialogue",
            InteractionKind::Note => "note",
            InteractionKind::GiveItem => "give_item",
        }
    }
}

/// One boolean per interaction kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindFlags {
    #[serde(default = "default_true")]
    pub prompt_only: bool,
    #[serde(default = "default_true")]
    pub dialogue: bool,
    #[serde(default = "default_true")]
    pub note: bool,
    #[serde(default = "default_true")]
    pub give_item: bool,
}

impl KindFlags {
    pub fn all(value: bool) -> Self {
        Self {
            prompt_only: value,
            dialogue: value,
            note: value,
            give_item: value,
        }
    }

    fn all_true() -> Self {
        Self::all(true)
    }

    pub fn get(&self, kind: InteractionKind) -> bool {
        match kind {
            InteractionKind::PromptOnly => self.prompt_only,
            InteractionKind::Dialogue => self.dialogue,
            InteractionKind::Note => self.note,
            InteractionKind::GiveItem => self.give_item,
        }
    }

    pub fn set(&mut self, kind: InteractionKind, value: bool) {
        match kind {
            InteractionKind::PromptOnly => self.prompt_only = value,
            InteractionKind::Dialogue => self.dialogue = value,
            InteractionKind::Note => self.note = value,
            InteractionKind::GiveItem => self.give_item = value,
        }
    }
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub message: String,
    pub missing_item_message: String,
    /// When false, an attempt runs on every tick the player is in range
    pub require_key_press: bool,
    pub interact_key: KeyCode,
    pub fade_in: f32,
    pub fade_out: f32,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            message: "Press E to interact".to_string(),
            missing_item_message: "You need a specific item!".to_string(),
            require_key_press: true,
            interact_key: KeyCode::default(),
            fade_in: 0.5,
            fade_out: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoteConfig {
    pub text: String,
    #[serde(default)]
    pub close_key: KeyCode,
}

/// Animation and sound fired on every successful attempt
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Extras {
    pub animation_trigger: Option<String>,
    pub sfx: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuestTrigger {
    #[serde(flatten)]
    pub hooks: QuestHooks,
    /// Fire when the player enters range
    pub on_enter: bool,
    /// Fire once an attempt has resolved
    pub on_interact: bool,
}

impl Default for QuestTrigger {
    fn default() -> Self {
        Self {
            hooks: QuestHooks::default(),
            on_enter: false,
            on_interact: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Removal {
    /// Seconds between the end of the interaction and removal
    #[serde(default)]
    pub delay: f32,
}

// ============================================================================
// Interactable Config
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct InteractableConfig {
    pub id: String,
    #[serde(default = "default_kinds")]
    pub kinds: Vec<InteractionKind>,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default = "KindFlags::all_true")]
    pub repeatable: KindFlags,
    #[serde(default)]
    pub required_item: Option<String>,
    /// Dialogue set id
    #[serde(default)]
    pub dialogue: Option<String>,
    #[serde(default)]
    pub note: Option<NoteConfig>,
    #[serde(default)]
    pub reward: Option<ItemReward>,
    #[serde(default)]
    pub extras: Extras,
    #[serde(default)]
    pub quests: QuestTrigger,
    /// Remove the object once an interaction has run its course
    #[serde(default)]
    pub removal: Option<Removal>,
}

fn default_kinds() -> Vec<InteractionKind> {
    vec![InteractionKind::Dialogue]
}

impl InteractableConfig {
    pub fn new(id: &str, kinds: &[InteractionKind]) -> Self {
        Self {
            id: id.to_string(),
            kinds: kinds.to_vec(),
            prompt: PromptConfig::default(),
            repeatable: KindFlags::all(true),
            required_item: None,
            dialogue: None,
            note: None,
            reward: None,
            extras: Extras::default(),
            quests: QuestTrigger::default(),
            removal: None,
        }
    }

    pub fn required_item(&self) -> Option<&str> {
        self.required_item.as_deref().filter(|s| !s.is_empty())
    }

    pub fn has_kind(&self, kind: InteractionKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Log configuration gaps. None of them are fatal: the affected kind
    /// simply does nothing when it runs.
    pub fn check(&self) {
        if self.kinds.is_empty() {
            warn!("Interactable '{}' has no interaction kinds", self.id);
        }
        for (i, kind) in self.kinds.iter().enumerate() {
            if self.kinds[..i].contains(kind) {
                warn!("Interactable '{}' lists {} twice", self.id, kind.as_str());
            }
        }
        if self.has_kind(InteractionKind::Dialogue) && self.dialogue.is_none() {
            warn!("Interactable '{}' has no dialogue assigned!", self.id);
        }
        if self.has_kind(InteractionKind::Note) && self.note.is_none() {
            warn!("Interactable '{}' has no note text assigned!", self.id);
        }
        if self.has_kind(InteractionKind::GiveItem) && self.reward.is_none() {
            warn!("Interactable '{}' has no reward item assigned!", self.id);
        }
    }
}
