// file: src/error.rs
// version: 1.0.0
// guid: 3f8c2b1a-9d4e-4f70-8a52-c1e6b93d07a4

use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, DeployError>;

/// Error types for the homelab deployment builder
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required configuration key: {0}")]
    MissingConfig(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl DeployError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new missing-key error from a namespaced config key
    pub fn missing_config(key: impl Into<String>) -> Self {
        Self::MissingConfig(key.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
