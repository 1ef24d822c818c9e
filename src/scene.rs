//! Scene
//!
//! Owns the shared services (inventory, quest log, dialogue engine) and every
//! world object, and drives them all from a single `tick`. Objects never hold
//! references to the services: they receive a [`Services`] context for the
//! duration of each call.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::dialogue::{load_step_triggers, DialogueEngine, DialogueLibrary, StepTrigger, StepTriggerConfig};
use crate::error::LoadError;
use crate::input::{FrameInput, Raycaster};
use crate::interaction::{load_interactables, Interactable, InteractableConfig, InteractableState};
use crate::inventory::Inventory;
use crate::lock::{load_locks, CombinationLock, LockConfig, LockPhase, RenderClickProxy};
use crate::present::Presenter;
use crate::quest::{QuestLog, QuestSnapshot};

/// Shared services lent to world objects for one call
pub struct Services<'a> {
    pub inventory: &'a mut Inventory,
    pub quests: &'a mut QuestLog,
    pub dialogue: &'a mut DialogueEngine,
    pub presenter: &'a mut dyn Presenter,
}

pub struct Scene {
    settings: Settings,
    inventory: Inventory,
    quests: QuestLog,
    library: DialogueLibrary,
    dialogue: DialogueEngine,
    interactables: Vec<Interactable>,
    locks: Vec<CombinationLock>,
    proxies: Vec<RenderClickProxy>,
    triggers: Vec<StepTrigger>,
    /// Every object id, across kinds
    ids: HashSet<String>,
}

impl Scene {
    pub fn new(settings: Settings, quests: QuestLog, library: DialogueLibrary) -> Self {
        let inventory = Inventory::with_capacity(settings.inventory.capacity);
        let dialogue = DialogueEngine::new(settings.dialogue.clone());
        Self {
            settings,
            inventory,
            quests,
            library,
            dialogue,
            interactables: Vec::new(),
            locks: Vec::new(),
            proxies: Vec::new(),
            triggers: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Build a scene from a data directory
    pub fn load(data_dir: &Path) -> Result<Self, LoadError> {
        info!("Loading scene from {:?}", data_dir);

        let settings = Settings::load(data_dir)?;
        let quests = QuestLog::load_from_directory(data_dir)?;
        let library = DialogueLibrary::load_from_directory(data_dir)?;
        let mut scene = Self::new(settings, quests, library);

        for config in load_interactables(data_dir)? {
            scene.add_interactable(config)?;
        }
        for config in load_locks(data_dir)? {
            scene.add_lock(config)?;
        }
        for config in load_step_triggers(data_dir)? {
            scene.add_trigger(config)?;
        }

        info!(
            "Scene ready: {} interactables, {} locks, {} triggers, {} quests",
            scene.interactables.len(),
            scene.locks.len(),
            scene.triggers.len(),
            scene.quests.len()
        );
        Ok(scene)
    }

    fn claim_id(&mut self, id: &str) -> Result<(), LoadError> {
        if !self.ids.insert(id.to_string()) {
            return Err(LoadError::Duplicate {
                kind: "object",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub fn add_interactable(&mut self, config: InteractableConfig) -> Result<(), LoadError> {
        self.claim_id(&config.id)?;
        self.interactables.push(Interactable::new(config, &self.library));
        Ok(())
    }

    pub fn add_lock(&mut self, config: LockConfig) -> Result<(), LoadError> {
        let surface = config.render_surface.clone();
        let lock = CombinationLock::new(config)?;
        self.claim_id(lock.id())?;
        if let Some(surface) = surface {
            self.proxies.push(RenderClickProxy::new(lock.id(), surface));
        }
        self.locks.push(lock);
        Ok(())
    }

    pub fn add_trigger(&mut self, config: StepTriggerConfig) -> Result<(), LoadError> {
        self.claim_id(&config.id)?;
        self.triggers.push(StepTrigger::new(config, &self.library));
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn quests(&self) -> &QuestLog {
        &self.quests
    }

    pub fn dialogue(&self) -> &DialogueEngine {
        &self.dialogue
    }

    pub fn interactable(&self, id: &str) -> Option<&Interactable> {
        self.interactables.iter().find(|o| o.id() == id)
    }

    pub fn lock(&self, id: &str) -> Option<&CombinationLock> {
        self.locks.iter().find(|l| l.id() == id)
    }

    pub fn trigger(&self, id: &str) -> Option<&StepTrigger> {
        self.triggers.iter().find(|t| t.id() == id)
    }

    // ========================================================================
    // Proximity
    // ========================================================================

    /// Route the player entering an object's volume. False for unknown ids.
    pub fn player_entered(&mut self, id: &str, presenter: &mut dyn Presenter) -> bool {
        if let Some(object) = self.interactables.iter_mut().find(|o| o.id() == id) {
            let mut services = Services {
                inventory: &mut self.inventory,
                quests: &mut self.quests,
                dialogue: &mut self.dialogue,
                presenter: &mut *presenter,
            };
            object.player_entered(&mut services);
            return true;
        }
        if let Some(lock) = self.locks.iter_mut().find(|l| l.id() == id) {
            lock.player_entered();
            return true;
        }
        if let Some(trigger) = self.triggers.iter_mut().find(|t| t.id() == id) {
            trigger.player_entered(&mut self.dialogue, presenter);
            return true;
        }

        warn!("Player entered unknown object '{}'", id);
        false
    }

    pub fn player_exited(&mut self, id: &str, presenter: &mut dyn Presenter) -> bool {
        if let Some(object) = self.interactables.iter_mut().find(|o| o.id() == id) {
            let mut services = Services {
                inventory: &mut self.inventory,
                quests: &mut self.quests,
                dialogue: &mut self.dialogue,
                presenter: &mut *presenter,
            };
            object.player_exited(&mut services);
            return true;
        }
        if let Some(lock) = self.locks.iter_mut().find(|l| l.id() == id) {
            lock.player_exited();
            return true;
        }
        if self.triggers.iter().any(|t| t.id() == id) {
            return true;
        }

        warn!("Player exited unknown object '{}'", id);
        false
    }

    // ========================================================================
    // Tick
    // ========================================================================

    pub fn tick(
        &mut self,
        dt: f32,
        input: &FrameInput,
        presenter: &mut dyn Presenter,
        raycaster: &dyn Raycaster,
    ) {
        self.dialogue.handle_input(input, presenter);
        self.dialogue.tick(dt, presenter);

        {
            let mut services = Services {
                inventory: &mut self.inventory,
                quests: &mut self.quests,
                dialogue: &mut self.dialogue,
                presenter: &mut *presenter,
            };

            for object in &mut self.interactables {
                object.tick(dt, input, &mut services);
            }
            for lock in &mut self.locks {
                lock.tick(input, &mut services);
            }
            for proxy in &self.proxies {
                if let Some(lock) = self.locks.iter_mut().find(|l| l.id() == proxy.lock_id()) {
                    proxy.tick(input, lock, raycaster, &mut services);
                }
            }
        }

        let before = self.interactables.len();
        self.interactables.retain(|o| !o.is_removed());
        if self.interactables.len() != before {
            debug!("Dropped {} removed objects", before - self.interactables.len());
        }

        let events = self.quests.drain_events();
        if !events.is_empty() {
            for event in &events {
                debug!("Quest {} {}", event.quest_id(), event.event_type());
            }
            presenter.set_quest_log(&self.quests.active_summary());
        }
    }

    /// Push the full inventory and quest panel, e.g. once after loading
    pub fn refresh_panels(&self, presenter: &mut dyn Presenter) {
        for index in 0..self.inventory.capacity() {
            if let Some(slot) = self.inventory.slot(index) {
                presenter.set_inventory_slot(index, slot);
            }
        }
        presenter.set_quest_log(&self.quests.active_summary());
    }

    pub fn inspect_slot(&self, index: usize, presenter: &mut dyn Presenter) {
        self.inventory.inspect_slot(index, presenter);
    }

    pub fn hide_item_description(&self, presenter: &mut dyn Presenter) {
        self.inventory.hide_item_description(presenter);
    }

    // ========================================================================
    // Snapshot
    // ========================================================================

    pub fn snapshot(&self) -> SceneSnapshot<'_> {
        SceneSnapshot {
            inventory: &self.inventory,
            quests: self.quests.snapshot(),
            dialogue: DialogueSnapshot {
                running: self.dialogue.is_running(),
                set: self.dialogue.current_set(),
                line: self.dialogue.line_index(),
                text: self.dialogue.visible_text(),
            },
            interactables: self
                .interactables
                .iter()
                .map(|o| InteractableSnapshot {
                    id: o.id(),
                    state: o.state(),
                    busy: o.is_busy(),
                    exhausted: o.is_exhausted(),
                })
                .collect(),
            locks: self
                .locks
                .iter()
                .map(|l| LockSnapshot {
                    id: l.id(),
                    phase: l.phase(),
                    values: l.values(),
                    door_open: l.door_open(),
                })
                .collect(),
            triggers: self
                .triggers
                .iter()
                .map(|t| TriggerSnapshot {
                    id: t.id(),
                    triggered: t.has_triggered(),
                })
                .collect(),
        }
    }
}

/// Serializable view of the whole scene
#[derive(Debug, Serialize)]
pub struct SceneSnapshot<'a> {
    pub inventory: &'a Inventory,
    pub quests: QuestSnapshot<'a>,
    pub dialogue: DialogueSnapshot<'a>,
    pub interactables: Vec<InteractableSnapshot<'a>>,
    pub locks: Vec<LockSnapshot<'a>>,
    pub triggers: Vec<TriggerSnapshot<'a>>,
}

#[derive(Debug, Serialize)]
pub struct DialogueSnapshot<'a> {
    pub running: bool,
    pub set: Option<&'a str>,
    pub line: usize,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct InteractableSnapshot<'a> {
    pub id: &'a str,
    #[serde(flatten)]
    pub state: &'a InteractableState,
    pub busy: bool,
    pub exhausted: bool,
}

#[derive(Debug, Serialize)]
pub struct LockSnapshot<'a> {
    pub id: &'a str,
    pub phase: LockPhase,
    pub values: &'a [u8],
    pub door_open: bool,
}

#[derive(Debug, Serialize)]
pub struct TriggerSnapshot<'a> {
    pub id: &'a str,
    pub triggered: bool,
}
