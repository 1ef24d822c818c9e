//! Quest side effects attached to world objects

use serde::Deserialize;

use super::registry::QuestLog;

/// Quest changes fired by an interactable or a lock
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuestHooks {
    pub start: Option<String>,
    pub complete: Option<String>,
    pub objective: Option<ObjectiveUpdate>,
}

/// `amount` of progress on `objective` of `quest`
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectiveUpdate {
    pub quest: String,
    pub objective: String,
    #[serde(default = "default_amount")]
    pub amount: u32,
}

fn default_amount() -> u32 {
    1
}

impl QuestHooks {
    pub fn is_empty(&self) -> bool {
        non_empty(&self.start).is_none()
            && non_empty(&self.complete).is_none()
            && self.objective.is_none()
    }

    /// Start, then complete, then progress
    pub fn fire(&self, quests: &mut QuestLog) {
        if let Some(quest_id) = non_empty(&self.start) {
            quests.start_quest(quest_id);
        }
        if let Some(quest_id) = non_empty(&self.complete) {
            quests.complete_quest(quest_id);
        }
        if let Some(update) = &self.objective {
            if !update.quest.is_empty() && !update.objective.is_empty() {
                quests.add_objective_progress(&update.quest, &update.objective, update.amount);
            }
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::{Quest, QuestStatus};

    #[test]
    fn test_fire_order() {
        let mut log = QuestLog::new(vec![
            Quest::new("a", "A").with_objective("x", "", 1),
            Quest::new("b", "B"),
        ])
        .unwrap();

        let hooks = QuestHooks {
            start: Some("a".into()),
            complete: Some("b".into()),
            objective: Some(ObjectiveUpdate {
                quest: "a".into(),
                objective: "x".into(),
                amount: 1,
            }),
        };
        hooks.fire(&mut log);

        assert_eq!(log.status("a"), Some(QuestStatus::Completed));
        assert_eq!(log.status("b"), Some(QuestStatus::Completed));
    }

    #[test]
    fn test_blank_ids_ignored() {
        let hooks: QuestHooks = toml::from_str("start = \"\"\ncomplete = \"\"").unwrap();
        assert!(hooks.is_empty());
    }
}
