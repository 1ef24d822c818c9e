//! Combination Lock
//!
//! Wheels of eight positions each. The player toggles into an interacting
//! mode with the interact key, clicks wheels to advance them, and the lock
//! latches open the moment every wheel matches the target.

use serde::Serialize;
use tracing::{debug, info};

use super::config::{LockConfig, WHEEL_POSITIONS};
use crate::error::LoadError;
use crate::input::{FrameInput, PointerHit};
use crate::scene::Services;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockPhase {
    Idle,
    Interacting,
    /// Terminal
    Unlocked,
}

pub struct CombinationLock {
    config: LockConfig,
    values: Vec<u8>,
    /// Per-wheel angle at value zero, so the starting visual is preserved
    baselines: Vec<f32>,
    phase: LockPhase,
    player_in_trigger: bool,
    door_open: bool,
}

impl CombinationLock {
    pub fn new(config: LockConfig) -> Result<Self, LoadError> {
        let values = config.validate()?;
        let step = config.rotation_per_step;
        let baselines = values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let initial = config.initial_angles.as_ref().map_or(0.0, |angles| angles[i]);
                initial - f32::from(value) * step
            })
            .collect();

        Ok(Self {
            config,
            values,
            baselines,
            phase: LockPhase::Idle,
            player_in_trigger: false,
            door_open: false,
        })
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn phase(&self) -> LockPhase {
        self.phase
    }

    pub fn is_interacting(&self) -> bool {
        self.phase == LockPhase::Interacting
    }

    pub fn is_unlocked(&self) -> bool {
        self.phase == LockPhase::Unlocked
    }

    pub fn door_open(&self) -> bool {
        self.door_open
    }

    pub fn player_in_trigger(&self) -> bool {
        self.player_in_trigger
    }

    /// Visual angle of a wheel for its current value
    pub fn wheel_angle(&self, wheel: usize) -> Option<f32> {
        let value = *self.values.get(wheel)?;
        Some(self.baselines[wheel] + f32::from(value) * self.config.rotation_per_step)
    }

    pub fn player_entered(&mut self) {
        self.player_in_trigger = true;
    }

    pub fn player_exited(&mut self) {
        self.player_in_trigger = false;
    }

    pub fn tick(&mut self, input: &FrameInput, services: &mut Services) {
        if self.is_unlocked() {
            return;
        }

        if self.player_in_trigger && input.key_down(&self.config.interact_key) {
            match self.phase {
                LockPhase::Idle => self.start_interaction(services),
                LockPhase::Interacting => self.stop_interaction(services),
                LockPhase::Unlocked => {}
            }
        }

        if self.is_interacting() && input.primary_click {
            if let Some(hit) = &input.pointer_hit {
                if hit.distance <= self.config.max_reach {
                    self.handle_hit(hit, services);
                }
            }
        }
    }

    /// Hit produced outside the lock's own pointer, e.g. through a render
    /// surface. Returns true when a wheel turned.
    pub fn handle_external_hit(&mut self, hit: &PointerHit, services: &mut Services) -> bool {
        self.handle_hit(hit, services)
    }

    fn handle_hit(&mut self, hit: &PointerHit, services: &mut Services) -> bool {
        match self.config.wheels.iter().position(|w| *w == hit.object) {
            Some(index) => self.increment_wheel(index, services),
            None => false,
        }
    }

    fn start_interaction(&mut self, services: &mut Services) {
        self.phase = LockPhase::Interacting;
        services.presenter.set_player_control(false);
        debug!("Lock '{}' interacting", self.config.id);
    }

    fn stop_interaction(&mut self, services: &mut Services) {
        self.phase = LockPhase::Idle;
        services.presenter.set_player_control(true);
        debug!("Lock '{}' released", self.config.id);
    }

    fn increment_wheel(&mut self, index: usize, services: &mut Services) -> bool {
        if self.is_unlocked() || index >= self.values.len() {
            return false;
        }

        self.values[index] = (self.values[index] + 1) % WHEEL_POSITIONS;
        if let Some(angle) = self.wheel_angle(index) {
            services.presenter.set_wheel_rotation(&self.config.id, index, angle);
        }
        debug!("Lock '{}' wheel {} -> {}", self.config.id, index, self.values[index]);

        if self.values == self.config.target {
            self.unlock(services);
        }
        true
    }

    fn unlock(&mut self, services: &mut Services) {
        if self.is_unlocked() {
            return;
        }
        self.phase = LockPhase::Unlocked;
        self.door_open = true;
        services.presenter.set_player_control(true);

        self.config.quests.fire(services.quests);

        if let Some(reward) = &self.config.reward {
            services.inventory.add_reward(reward, services.presenter);
        }
        if let Some(clip) = &self.config.unlock_animation {
            services.presenter.play_animation_clip(&self.config.id, clip);
        }
        if let Some(parameter) = &self.config.door_parameter {
            services.presenter.set_animation_bool(&self.config.id, parameter, true);
        }

        info!("Lock '{}' unlocked", self.config.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DialogueSettings;
    use crate::dialogue::DialogueEngine;
    use crate::inventory::{Inventory, ItemReward};
    use crate::present::testing::{Cue, RecordingPresenter};
    use crate::quest::{Quest, QuestLog, QuestStatus};

    struct World {
        inventory: Inventory,
        quests: QuestLog,
        dialogue: DialogueEngine,
        presenter: RecordingPresenter,
    }

    impl World {
        fn new() -> Self {
            Self {
                inventory: Inventory::new(),
                quests: QuestLog::new(vec![Quest::new("crack_safe", "Crack the safe").active()]).unwrap(),
                dialogue: DialogueEngine::new(DialogueSettings::default()),
                presenter: RecordingPresenter::new(),
            }
        }

        fn tick(&mut self, lock: &mut CombinationLock, input: &FrameInput) {
            let mut services = Services {
                inventory: &mut self.inventory,
                quests: &mut self.quests,
                dialogue: &mut self.dialogue,
                presenter: &mut self.presenter,
            };
            lock.tick(input, &mut services);
        }

        fn click(&mut self, lock: &mut CombinationLock, wheel: &str, times: usize) {
            for _ in 0..times {
                self.tick(lock, &FrameInput::click_on(PointerHit::new(wheel, 1.0)));
            }
        }
    }

    fn safe() -> CombinationLock {
        let mut config = LockConfig::new("safe", &["w0", "w1", "w2"], &[7, 7, 7], &[1, 2, 3]);
        config.quests.complete = Some("crack_safe".to_string());
        config.reward = Some(ItemReward {
            name: "Cellar Map".to_string(),
            description: String::new(),
            icon: None,
        });
        config.door_parameter = Some("OpenDoor".to_string());
        config.unlock_animation = Some("safe_open".to_string());
        CombinationLock::new(config).unwrap()
    }

    #[test]
    fn test_toggle_interaction() {
        let mut world = World::new();
        let mut lock = safe();

        // Key ignored outside the trigger
        world.tick(&mut lock, &FrameInput::key("e"));
        assert_eq!(lock.phase(), LockPhase::Idle);

        lock.player_entered();
        world.tick(&mut lock, &FrameInput::key("e"));
        assert!(lock.is_interacting());
        assert!(world.presenter.has(&Cue::PlayerControl(false)));

        world.tick(&mut lock, &FrameInput::key("e"));
        assert_eq!(lock.phase(), LockPhase::Idle);
        assert!(world.presenter.has(&Cue::PlayerControl(true)));
    }

    #[test]
    fn test_clicks_ignored_when_idle() {
        let mut world = World::new();
        let mut lock = safe();
        lock.player_entered();
        world.click(&mut lock, "w0", 1);
        assert_eq!(lock.values(), &[7, 7, 7]);
    }

    #[test]
    fn test_unlocks_exactly_once() {
        let mut world = World::new();
        let mut lock = safe();
        lock.player_entered();
        world.tick(&mut lock, &FrameInput::key("e"));

        world.click(&mut lock, "w0", 2);
        world.click(&mut lock, "w1", 3);
        assert_eq!(lock.values(), &[1, 2, 7]);
        assert!(!lock.is_unlocked());

        world.click(&mut lock, "w2", 4);
        assert_eq!(lock.values(), &[1, 2, 3]);
        assert!(lock.is_unlocked());
        assert!(lock.door_open());
        assert_eq!(world.quests.status("crack_safe"), Some(QuestStatus::Completed));
        assert!(world.inventory.has_item("Cellar Map"));
        assert!(world.presenter.has(&Cue::AnimationBool("safe".into(), "OpenDoor".into(), true)));
        assert!(world.presenter.has(&Cue::AnimationClip("safe".into(), "safe_open".into())));

        // Frozen: further clicks and keys change nothing
        world.click(&mut lock, "w0", 3);
        world.tick(&mut lock, &FrameInput::key("e"));
        assert_eq!(lock.values(), &[1, 2, 3]);
        assert_eq!(lock.phase(), LockPhase::Unlocked);
        assert_eq!(world.inventory.item_count(), 1);
        assert_eq!(
            world.presenter.count(|c| matches!(c, Cue::AnimationBool(..))),
            1
        );
    }

    #[test]
    fn test_wheel_rotation_keeps_baseline() {
        let mut world = World::new();
        let mut config = LockConfig::new("safe", &["w0"], &[2], &[5]);
        config.initial_angles = Some(vec![10.0]);
        let mut lock = CombinationLock::new(config).unwrap();
        assert_eq!(lock.wheel_angle(0), Some(10.0));

        lock.player_entered();
        world.tick(&mut lock, &FrameInput::key("e"));
        world.click(&mut lock, "w0", 1);
        assert!(world.presenter.has(&Cue::WheelRotation("safe".into(), 0, 55.0)));
    }

    #[test]
    fn test_wraps_modulo_eight() {
        let mut world = World::new();
        let mut lock = CombinationLock::new(LockConfig::new("dial", &["w"], &[6], &[3])).unwrap();
        lock.player_entered();
        world.tick(&mut lock, &FrameInput::key("e"));
        world.click(&mut lock, "w", 2);
        assert_eq!(lock.values(), &[0]);
    }

    #[test]
    fn test_reach_and_misses() {
        let mut world = World::new();
        let mut lock = safe();
        lock.player_entered();
        world.tick(&mut lock, &FrameInput::key("e"));

        world.tick(&mut lock, &FrameInput::click_on(PointerHit::new("w0", 6.0)));
        world.tick(&mut lock, &FrameInput::click_on(PointerHit::new("table", 1.0)));
        assert_eq!(lock.values(), &[7, 7, 7]);
    }
}
