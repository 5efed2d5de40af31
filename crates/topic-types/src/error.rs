//! Error types shared across the topic-atlas crates.

use thiserror::Error;

/// Unified error type for model and configuration operations.
#[derive(Debug, Error)]
pub enum TopicError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
