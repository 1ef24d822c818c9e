//! Forwards clicks on a render-texture surface into the lock scene.

use tracing::debug;

use super::combination::CombinationLock;
use super::config::RenderSurface;
use crate::input::{FrameInput, Raycaster};
use crate::scene::Services;

pub struct RenderClickProxy {
    lock_id: String,
    surface: RenderSurface,
}

impl RenderClickProxy {
    pub fn new(lock_id: &str, surface: RenderSurface) -> Self {
        Self {
            lock_id: lock_id.to_string(),
            surface,
        }
    }

    pub fn lock_id(&self) -> &str {
        &self.lock_id
    }

    /// Texture pixel for a UV coordinate on the surface
    pub fn project_uv(&self, u: f32, v: f32) -> (f32, f32) {
        (u * self.surface.width as f32, v * self.surface.height as f32)
    }

    /// Returns true when the forwarded hit turned a wheel
    pub fn tick(
        &self,
        input: &FrameInput,
        lock: &mut CombinationLock,
        raycaster: &dyn Raycaster,
        services: &mut Services,
    ) -> bool {
        if !lock.is_interacting() || !input.primary_click {
            return false;
        }
        let Some(hit) = &input.pointer_hit else {
            return false;
        };
        if hit.object != self.surface.object {
            return false;
        }
        let Some((u, v)) = hit.uv else {
            return false;
        };

        let pixel = self.project_uv(u, v);
        let Some(lock_hit) =
            raycaster.cast_from_screen(&self.surface.camera, pixel, self.surface.max_distance)
        else {
            return false;
        };

        debug!("Surface click at {:?} hit '{}'", pixel, lock_hit.object);
        lock.handle_external_hit(&lock_hit, services)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::config::DialogueSettings;
    use crate::dialogue::DialogueEngine;
    use crate::input::PointerHit;
    use crate::inventory::Inventory;
    use crate::lock::LockConfig;
    use crate::present::testing::RecordingPresenter;
    use crate::quest::QuestLog;

    /// Hits `object` and remembers where it was asked to cast from
    struct FixedRaycaster {
        object: String,
        casts: RefCell<Vec<(String, (f32, f32))>>,
    }

    impl Raycaster for FixedRaycaster {
        fn cast_from_screen(&self, camera: &str, pixel: (f32, f32), _max_distance: f32) -> Option<PointerHit> {
            self.casts.borrow_mut().push((camera.to_string(), pixel));
            Some(PointerHit::new(&self.object, 0.5))
        }
    }

    fn surface() -> RenderSurface {
        RenderSurface {
            object: "screen".to_string(),
            camera: "safe_cam".to_string(),
            width: 512,
            height: 256,
            max_distance: 10.0,
        }
    }

    #[test]
    fn test_project_uv() {
        let proxy = RenderClickProxy::new("safe", surface());
        assert_eq!(proxy.project_uv(0.5, 0.25), (256.0, 64.0));
        assert_eq!(proxy.project_uv(1.0, 1.0), (512.0, 256.0));
    }

    #[test]
    fn test_forwards_surface_click() {
        let mut inventory = Inventory::new();
        let mut quests = QuestLog::empty();
        let mut dialogue = DialogueEngine::new(DialogueSettings::default());
        let mut presenter = RecordingPresenter::new();
        let mut services = Services {
            inventory: &mut inventory,
            quests: &mut quests,
            dialogue: &mut dialogue,
            presenter: &mut presenter,
        };

        let mut lock = CombinationLock::new(LockConfig::new("safe", &["w0", "w1"], &[0, 0], &[4, 4])).unwrap();
        let proxy = RenderClickProxy::new("safe", surface());
        let raycaster = FixedRaycaster {
            object: "w1".to_string(),
            casts: RefCell::new(Vec::new()),
        };
        let click = FrameInput::click_on(PointerHit::new("screen", 2.0).with_uv(0.5, 0.5));

        // Not interacting yet
        assert!(!proxy.tick(&click, &mut lock, &raycaster, &mut services));
        assert!(raycaster.casts.borrow().is_empty());

        lock.player_entered();
        lock.tick(&FrameInput::key("e"), &mut services);
        assert!(proxy.tick(&click, &mut lock, &raycaster, &mut services));
        assert_eq!(lock.values(), &[0, 1]);
        assert_eq!(
            raycaster.casts.borrow()[0],
            ("safe_cam".to_string(), (256.0, 128.0))
        );

        // Other objects and UV-less hits are not forwarded
        let elsewhere = FrameInput::click_on(PointerHit::new("wall", 2.0).with_uv(0.5, 0.5));
        assert!(!proxy.tick(&elsewhere, &mut lock, &raycaster, &mut services));
        let no_uv = FrameInput::click_on(PointerHit::new("screen", 2.0));
        assert!(!proxy.tick(&no_uv, &mut lock, &raycaster, &mut services));
        assert_eq!(lock.values(), &[0, 1]);
    }
}
