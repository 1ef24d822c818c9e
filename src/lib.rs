//! Interaction layer for a first-person adventure scene: proximity-triggered
//! objects, a typewriter dialogue engine, a quest log, a slot inventory and
//! combination locks, all driven by a host through `Scene::tick`.

pub mod config;
pub mod dialogue;
pub mod error;
pub mod input;
pub mod interaction;
pub mod inventory;
pub mod lock;
pub mod present;
pub mod quest;
pub mod scene;

pub use config::Settings;
pub use error::LoadError;
pub use input::{FrameInput, KeyCode, NoRaycast, PointerHit, Raycaster};
pub use inventory::Inventory;
pub use present::{LogPresenter, Presenter};
pub use quest::QuestLog;
pub use scene::{Scene, Services};
