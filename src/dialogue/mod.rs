//! Dialogue: line sets, the typewriter engine and step triggers.

pub mod data;
pub mod engine;
pub mod trigger;

pub use data::{DialogueLibrary, DialogueLine, DialogueSet};
pub use engine::DialogueEngine;
pub use trigger::{load_step_triggers, StepTrigger, StepTriggerConfig};
