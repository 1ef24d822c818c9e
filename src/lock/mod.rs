//! Combination locks and their render-surface click proxies.

pub mod combination;
pub mod config;
pub mod proxy;

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

pub use combination::{CombinationLock, LockPhase};
pub use config::{LockConfig, RenderSurface, WHEEL_POSITIONS};
pub use proxy::RenderClickProxy;

use crate::error::{parse_toml, read_file, toml_files, LoadError};

#[derive(Debug, Deserialize)]
struct RawLockFile {
    #[serde(default)]
    lock: Vec<LockConfig>,
}

/// Load and validate all `locks/*.toml` files under the data directory
pub fn load_locks(data_dir: &Path) -> Result<Vec<LockConfig>, LoadError> {
    let mut configs = Vec::new();
    let mut seen = HashSet::new();

    for path in toml_files(&data_dir.join("locks"))? {
        let content = read_file(&path)?;
        let file: RawLockFile = parse_toml(&path, &content)?;
        for config in file.lock {
            if !seen.insert(config.id.clone()) {
                return Err(LoadError::Duplicate {
                    kind: "lock",
                    id: config.id,
                });
            }
            config.validate()?;
            debug!("Loaded lock: {} ({} wheels)", config.id, config.wheels.len());
            configs.push(config);
        }
    }

    info!("Loaded {} locks", configs.len());
    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_locks() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("locks")).unwrap();
        fs::write(
            dir.path().join("locks/study.toml"),
            "[[lock]]\nid = \"safe\"\nwheels = [\"a\", \"b\"]\ntarget = [1, 2]\n",
        )
        .unwrap();

        let locks = load_locks(dir.path()).unwrap();
        assert_eq!(locks.len(), 1);
        assert_eq!(locks[0].target, vec![1, 2]);
    }

    #[test]
    fn test_invalid_lock_fails_load() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("locks")).unwrap();
        fs::write(
            dir.path().join("locks/bad.toml"),
            "[[lock]]\nid = \"safe\"\nwheels = [\"a\", \"b\"]\ntarget = [1]\n",
        )
        .unwrap();

        assert!(matches!(load_locks(dir.path()), Err(LoadError::Invalid { .. })));
    }
}
