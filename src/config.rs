//! Conversion settings.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::DEFAULT_OWNER_ID;

/// Errors raised while loading a configuration file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config file is not valid JSON for these settings
    #[error("Invalid config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Settings for a conversion run.
///
/// Every field is optional in a config file; missing fields take their
/// [`Default`] values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Root of the output tree (default: `processed_prompts`)
    pub output_root: PathBuf,

    /// Subdirectory names skipped during tree conversion, in addition to
    /// hidden directories
    pub exclude_dirs: Vec<String>,

    /// Owner assigned to records whose metadata names none
    pub owner_id: i64,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("processed_prompts"),
            exclude_dirs: vec!["processed_prompts".to_string(), "venv".to_string()],
            owner_id: DEFAULT_OWNER_ID,
        }
    }
}

impl ConvertConfig {
    /// Loads settings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Sets the root of the output tree.
    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.output_root = output_root.into();
        self
    }

    /// Replaces the list of subdirectory names skipped during tree
    /// conversion. Hidden directories are always skipped.
    pub fn with_exclude_dirs<I, S>(mut self, exclude_dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs = exclude_dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the owner assigned to records whose metadata names none.
    pub fn with_owner_id(mut self, owner_id: i64) -> Self {
        self.owner_id = owner_id;
        self
    }

    /// Whether a subdirectory named `name` takes part in tree conversion.
    pub fn is_excluded(&self, name: &str) -> bool {
        name.starts_with('.') || self.exclude_dirs.iter().any(|excluded| excluded == name)
    }
}
