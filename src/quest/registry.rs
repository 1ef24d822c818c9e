//! Quest Log
//!
//! Loads quest definitions from TOML files and owns their runtime state.
//! Quests keep declaration order; lookups go through an id index.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::definition::{Quest, RawQuestFile};
use super::events::QuestEvent;
use super::state::{QuestProgress, QuestStatus};
use crate::error::{parse_toml, read_file, toml_files, LoadError};

pub struct QuestLog {
    definitions: Vec<Arc<Quest>>,
    progress: Vec<QuestProgress>,
    index: HashMap<String, usize>,
    /// Changes not yet drained by the scene
    events: Vec<QuestEvent>,
}

/// Serializable view of every quest, for debugging dumps
#[derive(Debug, Serialize)]
pub struct QuestSnapshot<'a> {
    pub quests: &'a [QuestProgress],
}

impl QuestLog {
    pub fn new(quests: Vec<Quest>) -> Result<Self, LoadError> {
        let mut log = Self {
            definitions: Vec::with_capacity(quests.len()),
            progress: Vec::with_capacity(quests.len()),
            index: HashMap::new(),
            events: Vec::new(),
        };

        for quest in quests {
            quest.validate()?;
            if log.index.contains_key(&quest.id) {
                return Err(LoadError::Duplicate {
                    kind: "quest",
                    id: quest.id,
                });
            }
            log.index.insert(quest.id.clone(), log.definitions.len());
            log.progress.push(QuestProgress::new(&quest));
            log.definitions.push(Arc::new(quest));
        }

        log.validate_quest_chains();
        Ok(log)
    }

    pub fn empty() -> Self {
        Self {
            definitions: Vec::new(),
            progress: Vec::new(),
            index: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Load all `quests/*.toml` files under the data directory
    pub fn load_from_directory(data_dir: &Path) -> Result<Self, LoadError> {
        let quests_dir = data_dir.join("quests");
        info!("Loading quests from {:?}", quests_dir);

        let mut quests = Vec::new();
        for path in toml_files(&quests_dir)? {
            let content = read_file(&path)?;
            let file: RawQuestFile = parse_toml(&path, &content)?;
            for raw in &file.quests {
                let quest = Quest::from_raw(raw)?;
                debug!("Loaded quest: {} ({})", quest.name, quest.id);
                quests.push(quest);
            }
        }

        let log = Self::new(quests)?;
        info!("Loaded {} quest definitions", log.len());
        Ok(log)
    }

    /// Warn about next-quest references that go nowhere or loop back
    fn validate_quest_chains(&self) {
        for quest in &self.definitions {
            for next_id in &quest.next_quest_ids {
                if !self.index.contains_key(next_id) {
                    warn!(
                        "Quest '{}' references non-existent next quest '{}'",
                        quest.id, next_id
                    );
                }
            }
        }

        for quest in &self.definitions {
            if self.chain_returns_to(&quest.id) {
                warn!("Quest chain starting at '{}' loops back to itself", quest.id);
            }
        }
    }

    fn chain_returns_to(&self, origin: &str) -> bool {
        let mut visited = HashSet::new();
        let mut stack: Vec<&str> = self
            .definition(origin)
            .map(|q| q.next_quest_ids.iter().map(String::as_str).collect())
            .unwrap_or_default();

        while let Some(id) = stack.pop() {
            if id == origin {
                return true;
            }
            if !visited.insert(id) {
                continue;
            }
            if let Some(quest) = self.definition(id) {
                stack.extend(quest.next_quest_ids.iter().map(String::as_str));
            }
        }
        false
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Inactive -> Active. Returns true if the quest was started.
    pub fn start_quest(&mut self, quest_id: &str) -> bool {
        let Some(&i) = self.index.get(quest_id) else {
            warn!("Quest '{}' not found!", quest_id);
            return false;
        };

        let progress = &mut self.progress[i];
        match progress.status {
            QuestStatus::Completed => {
                info!("Quest '{}' already completed.", self.definitions[i].name);
                false
            }
            QuestStatus::Active => {
                debug!("Quest '{}' already active.", self.definitions[i].name);
                false
            }
            QuestStatus::Inactive => {
                progress.start();
                info!("Started quest: {}", self.definitions[i].name);
                self.events.push(QuestEvent::Started {
                    quest_id: quest_id.to_string(),
                });
                true
            }
        }
    }

    /// Add progress to an objective of an active quest. Completes the quest
    /// when this was the last open objective. Returns the objective's count
    /// after the update.
    pub fn add_objective_progress(&mut self, quest_id: &str, objective_id: &str, amount: u32) -> Option<u32> {
        let Some(&i) = self.index.get(quest_id).filter(|&&i| self.progress[i].is_active()) else {
            warn!("Quest '{}' is not active or doesn't exist!", quest_id);
            return None;
        };

        let progress = &mut self.progress[i];
        let Some(objective) = progress.objective_mut(objective_id) else {
            warn!("Objective '{}' not found in quest '{}'.", objective_id, quest_id);
            return None;
        };

        let newly_completed = objective.add_progress(amount);
        let current = objective.current;
        info!(
            "Objective progress: {} ({}/{})",
            objective.description, objective.current, objective.target
        );
        self.events.push(QuestEvent::ObjectiveProgressed {
            quest_id: quest_id.to_string(),
            objective_id: objective_id.to_string(),
            current,
            target: objective.target,
            completed: newly_completed,
        });

        if progress.all_objectives_complete() {
            self.complete_quest(quest_id);
        }

        Some(current)
    }

    /// Mark a quest completed (from Inactive or Active) and start the quests
    /// chained after it. Returns true if the quest was completed by this call.
    ///
    /// Starting a quest never completes one, so the chain advances exactly one
    /// link per completion no matter how the next-quest graph is wired.
    pub fn complete_quest(&mut self, quest_id: &str) -> bool {
        let Some(&i) = self.index.get(quest_id) else {
            warn!("Quest '{}' not found!", quest_id);
            return false;
        };
        if self.progress[i].is_completed() {
            debug!("Quest '{}' already completed.", quest_id);
            return false;
        }

        self.progress[i].complete();
        info!("Quest completed: {}", self.definitions[i].name);
        self.events.push(QuestEvent::Completed {
            quest_id: quest_id.to_string(),
        });

        let quest = Arc::clone(&self.definitions[i]);
        let mut seen = HashSet::new();
        for next_id in &quest.next_quest_ids {
            if !seen.insert(next_id.as_str()) {
                continue;
            }
            if self.status(next_id).is_some_and(|s| s != QuestStatus::Completed) {
                self.start_quest(next_id);
            }
        }

        true
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn get(&self, quest_id: &str) -> Option<&QuestProgress> {
        self.index.get(quest_id).map(|&i| &self.progress[i])
    }

    pub fn definition(&self, quest_id: &str) -> Option<&Arc<Quest>> {
        self.index.get(quest_id).map(|&i| &self.definitions[i])
    }

    pub fn status(&self, quest_id: &str) -> Option<QuestStatus> {
        self.get(quest_id).map(|p| p.status)
    }

    pub fn is_active(&self, quest_id: &str) -> bool {
        self.get(quest_id).is_some_and(QuestProgress::is_active)
    }

    pub fn is_completed(&self, quest_id: &str) -> bool {
        self.get(quest_id).is_some_and(QuestProgress::is_completed)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Take the changes recorded since the last call
    pub fn drain_events(&mut self) -> Vec<QuestEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> QuestSnapshot<'_> {
        QuestSnapshot {
            quests: &self.progress,
        }
    }

    /// Text for the active quests panel
    pub fn active_summary(&self) -> String {
        let mut text = String::from("Active Quests\n\n");

        for (quest, progress) in self.definitions.iter().zip(&self.progress) {
            if !progress.is_active() {
                continue;
            }

            text.push_str(&quest.name);
            text.push('\n');
            if !quest.description.is_empty() {
                text.push_str(&quest.description);
                text.push('\n');
            }
            for objective in &progress.objectives {
                let mark = if objective.completed { "[x]" } else { "[ ]" };
                text.push_str(&format!(
                    "   {} {} ({}/{})\n",
                    mark, objective.description, objective.current, objective.target
                ));
            }
            text.push('\n');
        }

        text
    }
}

impl Default for QuestLog {
    fn default() -> Self {
        Self::empty()
    }
}
