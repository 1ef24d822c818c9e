//! Quest Definition Structures
//!
//! These structures are deserialized from TOML quest files. A file holds any
//! number of `[[quest]]` tables; declaration order is kept.

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// A quest file as it appears on disk
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQuestFile {
    #[serde(default, rename = "quest")]
    pub quests: Vec<RawQuest>,
}

/// Raw quest data as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Whether the quest is already running when the scene starts
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub objectives: Vec<RawObjective>,
    /// Quests started when this one completes
    #[serde(default)]
    pub next: Vec<String>,
}

/// Raw objective as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawObjective {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

// ============================================================================
// Resolved Quest Structures (after validation)
// ============================================================================

/// A countable sub-goal of a quest
#[derive(Debug, Clone, Serialize)]
pub struct Objective {
    pub id: String,
    pub description: String,
    /// Count needed to complete; always at least 1
    pub target: u32,
}

impl Objective {
    pub fn new(id: &str, description: &str, target: u32) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            target,
        }
    }
}

/// A validated quest definition
#[derive(Debug, Clone, Serialize)]
pub struct Quest {
    pub id: String,
    pub name: String,
    pub description: String,
    pub starts_active: bool,
    pub objectives: Vec<Objective>,
    pub next_quest_ids: Vec<String>,
}

impl Quest {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            starts_active: false,
            objectives: Vec::new(),
            next_quest_ids: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_objective(mut self, id: &str, description: &str, target: u32) -> Self {
        self.objectives.push(Objective::new(id, description, target));
        self
    }

    pub fn with_next(mut self, quest_id: &str) -> Self {
        self.next_quest_ids.push(quest_id.to_string());
        self
    }

    pub fn active(mut self) -> Self {
        self.starts_active = true;
        self
    }

    /// Create a Quest from raw TOML data
    pub fn from_raw(raw: &RawQuest) -> Result<Self, LoadError> {
        let quest = Self {
            id: raw.id.clone(),
            name: raw.name.clone(),
            description: raw.description.clone(),
            starts_active: raw.active,
            objectives: raw
                .objectives
                .iter()
                .map(|o| Objective::new(&o.id, &o.description, o.count))
                .collect(),
            next_quest_ids: raw.next.clone(),
        };
        quest.validate()?;
        Ok(quest)
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        if self.id.is_empty() {
            return Err(LoadError::invalid("quest", &self.name, "empty id"));
        }

        for (i, objective) in self.objectives.iter().enumerate() {
            if objective.target == 0 {
                return Err(LoadError::invalid(
                    "quest",
                    &self.id,
                    format!("objective '{}' has a count of 0", objective.id),
                ));
            }
            if self.objectives[..i].iter().any(|o| o.id == objective.id) {
                return Err(LoadError::invalid(
                    "quest",
                    &self.id,
                    format!("objective '{}' declared twice", objective.id),
                ));
            }
        }

        Ok(())
    }

    /// Get objective by ID
    pub fn get_objective(&self, id: &str) -> Option<&Objective> {
        self.objectives.iter().find(|o| o.id == id)
    }
}
