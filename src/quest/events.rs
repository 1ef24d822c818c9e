//! Quest Event Types
//!
//! Journal of quest state changes, drained by the scene to refresh the quest
//! panel.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestEvent {
    Started {
        quest_id: String,
    },
    ObjectiveProgressed {
        quest_id: String,
        objective_id: String,
        current: u32,
        target: u32,
        /// Whether the objective was just completed
        completed: bool,
    },
    Completed {
        quest_id: String,
    },
}

impl QuestEvent {
    pub fn quest_id(&self) -> &str {
        match self {
            QuestEvent::Started { quest_id } => quest_id,
            QuestEvent::ObjectiveProgressed { quest_id, .. } => quest_id,
            QuestEvent::Completed { quest_id } => quest_id,
        }
    }

    /// Get event type as string (for logging/debugging)
    pub fn event_type(&self) -> &'static str {
        match self {
            QuestEvent::Started { .. } => "started",
            QuestEvent::ObjectiveProgressed { .. } => "objective_progressed",
            QuestEvent::Completed { .. } => "completed",
        }
    }
}
