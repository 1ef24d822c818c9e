//! Interactable Runtime
//!
//! Proximity-driven state machine for one object. An attempt runs every
//! configured kind in order, with dialogue always last; dialogue is the only
//! kind that holds the attempt open, and the object polls the engine once
//! per tick until it stops running.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::config::{InteractableConfig, InteractionKind, KindFlags};
use super::fade::Fade;
use crate::dialogue::{DialogueLibrary, DialogueSet};
use crate::input::FrameInput;
use crate::scene::Services;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Ready,
    /// Dialogue started by the current attempt is still running
    AwaitingDialogue,
    RemovalPending { remaining: f32 },
    Removed,
}

/// Observable runtime flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InteractableState {
    pub player_in_range: bool,
    pub dialogue_active: bool,
    pub note_open: bool,
    pub used: KindFlags,
}

/// Result of one interaction attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// Busy, out of range, exhausted or removed
    Ignored,
    MissingItem,
    AwaitingDialogue,
    Resolved,
}

pub struct Interactable {
    config: Arc<InteractableConfig>,
    dialogue: Option<Arc<DialogueSet>>,
    state: InteractableState,
    phase: Phase,
    prompt: Fade,
    /// PromptOnly hid the prompt; stays hidden until the player re-enters
    prompt_dismissed: bool,
    /// Removal waits for the open note to close
    removal_armed: bool,
}

impl Interactable {
    pub fn new(config: InteractableConfig, library: &DialogueLibrary) -> Self {
        config.check();

        let dialogue = config.dialogue.as_deref().and_then(|id| {
            let set = library.get(id);
            if set.is_none() {
                warn!("Interactable '{}' references unknown dialogue '{}'", config.id, id);
            }
            set
        });

        Self {
            config: Arc::new(config),
            dialogue,
            state: InteractableState::default(),
            phase: Phase::Ready,
            prompt: Fade::hidden(),
            prompt_dismissed: false,
            removal_armed: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &InteractableConfig {
        &self.config
    }

    pub fn state(&self) -> &InteractableState {
        &self.state
    }

    pub fn prompt_alpha(&self) -> f32 {
        self.prompt.alpha()
    }

    pub fn is_removed(&self) -> bool {
        self.phase == Phase::Removed
    }

    /// An attempt or a removal is in flight
    pub fn is_busy(&self) -> bool {
        !matches!(self.phase, Phase::Ready)
    }

    /// Every configured kind has been used and none of them repeats
    pub fn is_exhausted(&self) -> bool {
        self.config
            .kinds
            .iter()
            .all(|&kind| self.state.used.get(kind) && !self.config.repeatable.get(kind))
    }

    fn kind_available(&self, kind: InteractionKind) -> bool {
        !self.state.used.get(kind) || self.config.repeatable.get(kind)
    }

    fn can_interact(&self) -> bool {
        self.phase == Phase::Ready
            && self.state.player_in_range
            && !self.state.note_open
            && !self.is_exhausted()
    }

    // ========================================================================
    // Proximity
    // ========================================================================

    pub fn player_entered(&mut self, services: &mut Services) {
        if self.is_removed() {
            return;
        }

        self.state.player_in_range = true;
        self.prompt_dismissed = false;

        if self.config.quests.on_enter {
            self.config.quests.hooks.fire(services.quests);
        }

        let removing = matches!(self.phase, Phase::RemovalPending { .. });
        if !removing && !self.is_exhausted() {
            services.presenter.set_prompt_text(&self.config.id, &self.config.prompt.message);
            self.prompt.start(Some(0.0), 1.0, self.config.prompt.fade_in);
        }
    }

    pub fn player_exited(&mut self, services: &mut Services) {
        if self.is_removed() {
            return;
        }

        self.state.player_in_range = false;
        self.prompt_dismissed = false;
        self.prompt.start(None, 0.0, self.config.prompt.fade_out);

        if self.state.note_open {
            self.close_note(services);
        }
    }

    // ========================================================================
    // Tick
    // ========================================================================

    pub fn tick(&mut self, dt: f32, input: &FrameInput, services: &mut Services) {
        if self.is_removed() {
            return;
        }

        if let Some(alpha) = self.prompt.tick(dt) {
            services.presenter.set_prompt_alpha(&self.config.id, alpha);
        }

        // The close key only closes the note, even while a dialogue runs
        if self.state.note_open {
            let close_key = self.config.note.as_ref().map(|note| &note.close_key);
            if close_key.is_some_and(|key| input.key_down(key)) {
                self.close_note(services);
                return;
            }
        }

        match self.phase {
            Phase::AwaitingDialogue => {
                if !services.dialogue.is_running() {
                    self.finish_attempt(services);
                }
                return;
            }
            Phase::RemovalPending { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.remove(services);
                } else {
                    self.phase = Phase::RemovalPending { remaining };
                }
                return;
            }
            Phase::Ready | Phase::Removed => {}
        }

        if self.state.note_open {
            return;
        }

        if self.can_interact()
            && (!self.config.prompt.require_key_press
                || input.key_down(&self.config.prompt.interact_key))
        {
            self.interact(services);
        }
    }

    // ========================================================================
    // Attempt
    // ========================================================================

    /// Run one attempt now, as if the interact key had been pressed
    pub fn interact(&mut self, services: &mut Services) -> Attempt {
        if !self.can_interact() {
            return Attempt::Ignored;
        }

        let config = Arc::clone(&self.config);

        if let Some(item) = config.required_item() {
            if !services.inventory.has_item(item) {
                debug!("Interactable '{}' needs '{}'", config.id, item);
                services
                    .dialogue
                    .show_temporary_message(&config.prompt.missing_item_message, services.presenter);
                return Attempt::MissingItem;
            }
        }

        self.trigger_extras(services);

        let mut wants_dialogue = false;
        for &kind in &config.kinds {
            if !self.kind_available(kind) {
                continue;
            }
            let ran = match kind {
                InteractionKind::Dialogue => {
                    wants_dialogue = true;
                    continue;
                }
                InteractionKind::PromptOnly => {
                    self.prompt_dismissed = true;
                    self.fade_prompt_out();
                    true
                }
                InteractionKind::Note => self.open_note(services),
                InteractionKind::GiveItem => self.give_item(services),
            };
            // A kind with nothing assigned stays unused
            if ran {
                self.state.used.set(kind, true);
            }
        }

        if wants_dialogue && self.start_dialogue(services) {
            return Attempt::AwaitingDialogue;
        }

        self.finish_attempt(services);
        Attempt::Resolved
    }

    fn trigger_extras(&self, services: &mut Services) {
        let extras = &self.config.extras;
        if let Some(trigger) = &extras.animation_trigger {
            services.presenter.set_animation_trigger(&self.config.id, trigger);
        }
        if let Some(clip) = &extras.sfx {
            services.presenter.play_sfx(&self.config.id, clip);
        }
    }

    fn open_note(&mut self, services: &mut Services) -> bool {
        let Some(note) = &self.config.note else {
            warn!("Interactable '{}' has no note text assigned!", self.config.id);
            return false;
        };

        services.presenter.show_note(&self.config.id, &note.text);
        self.state.note_open = true;
        self.fade_prompt_out();
        true
    }

    fn close_note(&mut self, services: &mut Services) {
        services.presenter.hide_note(&self.config.id);
        self.state.note_open = false;

        if self.phase == Phase::Ready {
            self.maybe_fade_prompt_in();
        }
        if self.removal_armed {
            self.begin_removal();
        }
    }

    fn give_item(&mut self, services: &mut Services) -> bool {
        let Some(reward) = &self.config.reward else {
            warn!("Interactable '{}' has no reward item assigned!", self.config.id);
            return false;
        };

        if services.inventory.add_reward(reward, services.presenter).is_some() {
            info!("'{}' gave '{}'", self.config.id, reward.name);
        }
        true
    }

    /// True when the attempt now waits on the engine
    fn start_dialogue(&mut self, services: &mut Services) -> bool {
        let Some(set) = self.dialogue.clone() else {
            warn!("Interactable '{}' has no dialogue assigned!", self.config.id);
            return false;
        };

        self.fade_prompt_out();
        // A busy engine rejects the set; the attempt still waits for it
        services.dialogue.start(&set, services.presenter);
        self.state.used.set(InteractionKind::Dialogue, true);
        self.state.dialogue_active = true;
        self.phase = Phase::AwaitingDialogue;
        true
    }

    fn finish_attempt(&mut self, services: &mut Services) {
        self.state.dialogue_active = false;
        self.phase = Phase::Ready;

        if self.config.quests.on_interact {
            self.config.quests.hooks.fire(services.quests);
        }

        if !self.state.note_open {
            self.maybe_fade_prompt_in();
        }

        if self.config.removal.is_some() {
            if self.state.note_open {
                self.removal_armed = true;
            } else {
                self.begin_removal();
            }
        }
    }

    // ========================================================================
    // Prompt and removal
    // ========================================================================

    fn fade_prompt_out(&mut self) {
        if self.prompt.target() > 0.0 {
            self.prompt.start(None, 0.0, self.config.prompt.fade_out);
        }
    }

    fn maybe_fade_prompt_in(&mut self) {
        if self.state.player_in_range
            && !self.prompt_dismissed
            && !self.is_exhausted()
            && self.prompt.target() < 1.0
        {
            self.prompt.start(Some(0.0), 1.0, self.config.prompt.fade_in);
        }
    }

    fn begin_removal(&mut self) {
        let delay = self.config.removal.as_ref().map_or(0.0, |r| r.delay);
        self.removal_armed = false;
        self.fade_prompt_out();
        self.phase = Phase::RemovalPending { remaining: delay };
        debug!("'{}' removal in {:.2}s", self.config.id, delay);
    }

    fn remove(&mut self, services: &mut Services) {
        if self.state.note_open {
            services.presenter.hide_note(&self.config.id);
            self.state.note_open = false;
        }
        services.presenter.set_prompt_alpha(&self.config.id, 0.0);
        services.presenter.remove_object(&self.config.id);
        self.phase = Phase::Removed;
        info!("Removed '{}'", self.config.id);
    }
}
