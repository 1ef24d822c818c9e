//! Dialogue Data
//!
//! Immutable line sets loaded from `dialogue/*.toml`:
//!
//! ```toml
//! [[dialogue]]
//! id = "keeper_intro"
//!
//! [[dialogue.lines]]
//! speaker = "Keeper"
//! text = "You're awake."
//! voice = "keeper_01"
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{parse_toml, read_file, toml_files, LoadError};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DialogueLine {
    #[serde(default)]
    pub speaker: String,
    pub text: String,
    /// Opaque portrait handle
    #[serde(default)]
    pub portrait: Option<String>,
    /// Opaque voice clip handle
    #[serde(default)]
    pub voice: Option<String>,
}

impl DialogueLine {
    pub fn new(speaker: &str, text: &str) -> Self {
        Self {
            speaker: speaker.to_string(),
            text: text.to_string(),
            portrait: None,
            voice: None,
        }
    }

    pub fn with_voice(mut self, clip: &str) -> Self {
        self.voice = Some(clip.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DialogueSet {
    pub id: String,
    #[serde(default)]
    pub lines: Vec<DialogueLine>,
}

impl DialogueSet {
    pub fn new(id: &str, lines: Vec<DialogueLine>) -> Self {
        Self {
            id: id.to_string(),
            lines,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct RawDialogueFile {
    #[serde(default)]
    dialogue: Vec<DialogueSet>,
}

/// All dialogue sets of a scene, by id
#[derive(Debug, Default)]
pub struct DialogueLibrary {
    sets: HashMap<String, Arc<DialogueSet>>,
}

impl DialogueLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, set: DialogueSet) -> Result<(), LoadError> {
        if self.sets.contains_key(&set.id) {
            return Err(LoadError::Duplicate {
                kind: "dialogue",
                id: set.id,
            });
        }
        if set.is_empty() {
            warn!("Dialogue '{}' has no lines and will never play", set.id);
        }
        self.sets.insert(set.id.clone(), Arc::new(set));
        Ok(())
    }

    /// Load all `dialogue/*.toml` files under the data directory
    pub fn load_from_directory(data_dir: &Path) -> Result<Self, LoadError> {
        let mut library = Self::new();

        for path in toml_files(&data_dir.join("dialogue"))? {
            let content = read_file(&path)?;
            let file: RawDialogueFile = parse_toml(&path, &content)?;
            for set in file.dialogue {
                debug!("Loaded dialogue: {} ({} lines)", set.id, set.lines.len());
                library.insert(set)?;
            }
        }

        info!("Loaded {} dialogue sets", library.len());
        Ok(library)
    }

    pub fn get(&self, id: &str) -> Option<Arc<DialogueSet>> {
        self.sets.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sets.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
