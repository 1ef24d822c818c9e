//! Step triggers: play a dialogue set when the player walks into a volume.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::data::{DialogueLibrary, DialogueSet};
use super::engine::DialogueEngine;
use crate::error::{parse_toml, read_file, toml_files, LoadError};
use crate::present::Presenter;

#[derive(Debug, Clone, Deserialize)]
pub struct StepTriggerConfig {
    pub id: String,
    pub dialogue: String,
    #[serde(default = "default_true")]
    pub trigger_once: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct RawTriggerFile {
    #[serde(default)]
    trigger: Vec<StepTriggerConfig>,
}

/// Load all `triggers/*.toml` files under the data directory
pub fn load_step_triggers(data_dir: &Path) -> Result<Vec<StepTriggerConfig>, LoadError> {
    let mut configs = Vec::new();
    let mut seen = HashSet::new();

    for path in toml_files(&data_dir.join("triggers"))? {
        let content = read_file(&path)?;
        let file: RawTriggerFile = parse_toml(&path, &content)?;
        for config in file.trigger {
            if !seen.insert(config.id.clone()) {
                return Err(LoadError::Duplicate {
                    kind: "trigger",
                    id: config.id,
                });
            }
            configs.push(config);
        }
    }

    info!("Loaded {} step triggers", configs.len());
    Ok(configs)
}

pub struct StepTrigger {
    config: StepTriggerConfig,
    set: Option<Arc<DialogueSet>>,
    triggered: bool,
}

impl StepTrigger {
    pub fn new(config: StepTriggerConfig, library: &DialogueLibrary) -> Self {
        let set = library.get(&config.dialogue);
        if set.is_none() {
            warn!("Step trigger '{}' references unknown dialogue '{}'", config.id, config.dialogue);
        }
        Self {
            config,
            set,
            triggered: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn has_triggered(&self) -> bool {
        self.triggered
    }

    pub fn player_entered(&mut self, dialogue: &mut DialogueEngine, presenter: &mut dyn Presenter) {
        if self.triggered && self.config.trigger_once {
            debug!("Step trigger '{}' already used", self.config.id);
            return;
        }

        let Some(set) = &self.set else {
            warn!("Step trigger '{}' has no dialogue assigned!", self.config.id);
            return;
        };

        // Marked even when the engine is busy and rejects the set
        dialogue.start(set, presenter);
        self.triggered = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DialogueSettings;
    use crate::dialogue::DialogueLine;
    use crate::present::testing::RecordingPresenter;

    fn library() -> DialogueLibrary {
        let mut library = DialogueLibrary::new();
        library
            .insert(DialogueSet::new("hall", vec![DialogueLine::new("", "Cold in here.")]))
            .unwrap();
        library
    }

    fn trigger(once: bool) -> StepTrigger {
        StepTrigger::new(
            StepTriggerConfig {
                id: "hall_rug".into(),
                dialogue: "hall".into(),
                trigger_once: once,
            },
            &library(),
        )
    }

    #[test]
    fn test_trigger_once() {
        let mut presenter = RecordingPresenter::new();
        let mut engine = DialogueEngine::new(DialogueSettings::default());
        let mut step = trigger(true);

        step.player_entered(&mut engine, &mut presenter);
        assert!(engine.is_running());
        assert!(step.has_triggered());

        engine.skip(&mut presenter);
        engine.skip(&mut presenter);
        engine.tick(10.0, &mut presenter);
        assert!(!engine.is_running());

        step.player_entered(&mut engine, &mut presenter);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_retrigger_allowed() {
        let mut presenter = RecordingPresenter::new();
        let mut engine = DialogueEngine::new(DialogueSettings::default());
        let mut step = trigger(false);

        step.player_entered(&mut engine, &mut presenter);
        engine.skip(&mut presenter);
        engine.skip(&mut presenter);
        engine.tick(10.0, &mut presenter);

        step.player_entered(&mut engine, &mut presenter);
        assert!(engine.is_running());
    }

    #[test]
    fn test_load_step_triggers() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("triggers")).unwrap();
        std::fs::write(
            dir.path().join("triggers/hall.toml"),
            "[[trigger]]\nid = \"rug\"\ndialogue = \"hall\"\n\n[[trigger]]\nid = \"stairs\"\ndialogue = \"hall\"\ntrigger_once = false\n",
        )
        .unwrap();

        let configs = load_step_triggers(dir.path()).unwrap();
        assert_eq!(configs.len(), 2);
        assert!(configs[0].trigger_once);
        assert!(!configs[1].trigger_once);
    }

    #[test]
    fn test_missing_dialogue() {
        let mut presenter = RecordingPresenter::new();
        let mut engine = DialogueEngine::new(DialogueSettings::default());
        let mut step = StepTrigger::new(
            StepTriggerConfig {
                id: "x".into(),
                dialogue: "nope".into(),
                trigger_once: true,
            },
            &library(),
        );

        step.player_entered(&mut engine, &mut presenter);
        assert!(!engine.is_running());
        assert!(!step.has_triggered());
    }
}
