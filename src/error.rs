//! Data loading errors
//!
//! Runtime failures never surface here: they are logged and degrade to a
//! no-op where they are detected. Only reading the static data directory
//! can fail.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid {kind} '{id}': {reason}")]
    Invalid {
        kind: &'static str,
        id: String,
        reason: String,
    },

    #[error("duplicate {kind} id '{id}'")]
    Duplicate { kind: &'static str, id: String },
}

impl LoadError {
    pub fn invalid(kind: &'static str, id: &str, reason: impl Into<String>) -> Self {
        LoadError::Invalid {
            kind,
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

pub(crate) fn read_file(path: &std::path::Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse_toml<T: serde::de::DeserializeOwned>(
    path: &std::path::Path,
    content: &str,
) -> Result<T, LoadError> {
    toml::from_str(content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Collect the `.toml` files of a data sub-directory, sorted by path so that
/// declaration order is stable across platforms. A missing directory is not
/// an error: it simply contributes nothing.
pub(crate) fn toml_files(dir: &std::path::Path) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.exists() {
        tracing::warn!("Data directory does not exist: {:?}", dir);
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().map_or(false, |ext| ext == "toml") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
