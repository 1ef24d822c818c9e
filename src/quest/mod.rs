//! Quest System Module
//!
//! Quests are declared in TOML, start inactive (or active when flagged),
//! complete when all their objectives do, and start their chained quests on
//! completion.

pub mod definition;
pub mod events;
pub mod hooks;
pub mod registry;
pub mod state;

pub use definition::{Objective, Quest};
pub use events::QuestEvent;
pub use hooks::{ObjectiveUpdate, QuestHooks};
pub use registry::{QuestLog, QuestSnapshot};
pub use state::{ObjectiveProgress, QuestProgress, QuestStatus};
