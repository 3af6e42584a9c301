//! Error types for settings and preset parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading or writing settings documents.
///
/// Only text/file APIs return these. Applying a parsed patch never fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Failed to parse or serialize JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Preset not found
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// Preset document is structurally valid but unusable
    #[error("invalid preset '{name}': {reason}")]
    InvalidPreset {
        /// Name given in the document (may be empty).
        name: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid preset error.
    pub fn invalid_preset(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidPreset {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
