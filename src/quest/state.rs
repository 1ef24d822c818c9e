//! Quest State Tracking
//!
//! Runtime progress of one quest and its objectives.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::definition::Quest;

/// Lifecycle of a quest. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Inactive,
    Active,
    Completed,
}

impl QuestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestStatus::Inactive => "inactive",
            QuestStatus::Active => "active",
            QuestStatus::Completed => "completed",
        }
    }
}

/// Progress on a single objective
#[derive(Debug, Clone, Serialize)]
pub struct ObjectiveProgress {
    pub objective_id: String,
    pub description: String,
    pub current: u32,
    pub target: u32,
    pub completed: bool,
}

impl ObjectiveProgress {
    pub fn new(objective_id: &str, description: &str, target: u32) -> Self {
        Self {
            objective_id: objective_id.to_string(),
            description: description.to_string(),
            current: 0,
            target,
            completed: false,
        }
    }

    /// Add progress and return true if newly completed
    pub fn add_progress(&mut self, amount: u32) -> bool {
        if self.completed {
            return false;
        }
        self.current = self.current.saturating_add(amount).min(self.target);
        if self.current >= self.target {
            self.completed = true;
            true
        } else {
            false
        }
    }
}

/// Runtime state of one quest
#[derive(Debug, Clone, Serialize)]
pub struct QuestProgress {
    pub quest_id: String,
    pub status: QuestStatus,
    pub objectives: Vec<ObjectiveProgress>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl QuestProgress {
    pub fn new(quest: &Quest) -> Self {
        let objectives = quest
            .objectives
            .iter()
            .map(|o| ObjectiveProgress::new(&o.id, &o.description, o.target))
            .collect();

        let mut progress = Self {
            quest_id: quest.id.clone(),
            status: QuestStatus::Inactive,
            objectives,
            started_at: None,
            completed_at: None,
        };
        if quest.starts_active {
            progress.start();
        }
        progress
    }

    pub fn objective_mut(&mut self, objective_id: &str) -> Option<&mut ObjectiveProgress> {
        self.objectives.iter_mut().find(|o| o.objective_id == objective_id)
    }

    pub fn objective(&self, objective_id: &str) -> Option<&ObjectiveProgress> {
        self.objectives.iter().find(|o| o.objective_id == objective_id)
    }

    /// Quests without objectives never count as done on their own
    pub fn all_objectives_complete(&self) -> bool {
        !self.objectives.is_empty() && self.objectives.iter().all(|o| o.completed)
    }

    pub fn start(&mut self) {
        self.status = QuestStatus::Active;
        self.started_at = Some(Utc::now());
    }

    pub fn complete(&mut self) {
        self.status = QuestStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    pub fn is_active(&self) -> bool {
        self.status == QuestStatus::Active
    }

    pub fn is_completed(&self) -> bool {
        self.status == QuestStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objective_progress() {
        let mut obj = ObjectiveProgress::new("light_candles", "Light the candles", 5);
        assert!(!obj.completed);
        assert_eq!(obj.current, 0);

        obj.add_progress(3);
        assert!(!obj.completed);
        assert_eq!(obj.current, 3);

        let completed = obj.add_progress(4);
        assert!(completed);
        assert!(obj.completed);
        assert_eq!(obj.current, 5);

        // Can't add more after complete
        let completed = obj.add_progress(1);
        assert!(!completed);
        assert_eq!(obj.current, 5);
    }

    #[test]
    fn test_quest_progress_lifecycle() {
        let quest = Quest::new("q", "Q").with_objective("a", "", 1);
        let mut progress = QuestProgress::new(&quest);
        assert_eq!(progress.status, QuestStatus::Inactive);
        assert!(progress.started_at.is_none());

        progress.start();
        assert!(progress.is_active());
        assert!(progress.started_at.is_some());

        progress.objective_mut("a").unwrap().add_progress(1);
        assert!(progress.all_objectives_complete());

        progress.complete();
        assert!(progress.is_completed());
        assert!(!progress.is_active());
    }

    #[test]
    fn test_empty_objectives_never_complete() {
        let quest = Quest::new("q", "Q").active();
        let progress = QuestProgress::new(&quest);
        assert!(progress.is_active());
        assert!(!progress.all_objectives_complete());
    }
}
