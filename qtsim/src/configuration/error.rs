//! Error types for scenario loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or validating a scenario.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The scenario file could not be read.
    #[error("failed to read scenario {path}: {source}")]
    Io {
        /// Path that was opened.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The YAML did not match the scenario schema.
    #[error("malformed scenario: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The scenario parsed but describes an invalid simulation.
    #[error("invalid scenario: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}
