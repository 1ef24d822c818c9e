//! Proximity-triggered interactive objects.

pub mod config;
pub mod fade;
pub mod interactable;

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

pub use config::{InteractableConfig, InteractionKind, KindFlags};
pub use fade::Fade;
pub use interactable::{Attempt, Interactable, InteractableState};

use crate::error::{parse_toml, read_file, toml_files, LoadError};

#[derive(Debug, Deserialize)]
struct RawInteractableFile {
    #[serde(default)]
    interactable: Vec<InteractableConfig>,
}

/// Load all `interactables/*.toml` files under the data directory
pub fn load_interactables(data_dir: &Path) -> Result<Vec<InteractableConfig>, LoadError> {
    let mut configs = Vec::new();
    let mut seen = HashSet::new();

    for path in toml_files(&data_dir.join("interactables"))? {
        let content = read_file(&path)?;
        let file: RawInteractableFile = parse_toml(&path, &content)?;
        for config in file.interactable {
            if !seen.insert(config.id.clone()) {
                return Err(LoadError::Duplicate {
                    kind: "interactable",
                    id: config.id,
                });
            }
            debug!("Loaded interactable: {} {:?}", config.id, config.kinds);
            configs.push(config);
        }
    }

    info!("Loaded {} interactables", configs.len());
    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_interactables() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("interactables")).unwrap();
        fs::write(
            dir.path().join("interactables/hall.toml"),
            r#"
[[interactable]]
id = "painting"
kinds = ["note"]
note = { text = "A stern ancestor." }

[[interactable]]
id = "chest"
kinds = ["give_item"]
reward = { name = "Brass Key" }
"#,
        )
        .unwrap();

        let configs = load_interactables(dir.path()).unwrap();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].id, "painting");
        assert_eq!(configs[1].reward.as_ref().unwrap().name, "Brass Key");
    }

    #[test]
    fn test_duplicate_interactable() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("interactables")).unwrap();
        fs::write(
            dir.path().join("interactables/a.toml"),
            "[[interactable]]\nid = \"x\"\n\n[[interactable]]\nid = \"x\"\n",
        )
        .unwrap();

        assert!(matches!(
            load_interactables(dir.path()),
            Err(LoadError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(load_interactables(dir.path()).unwrap().is_empty());
    }
}
