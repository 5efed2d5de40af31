//! Pipeline error types.

use thiserror::Error;

use topic_enrich::{EnrichError, SourceError};
use topic_types::TopicError;

/// Errors that abort a refresh pass. Nothing is published when one occurs.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Enrich(#[from] EnrichError),

    #[error("Relation source failed: {0}")]
    Relations(#[source] SourceError),

    #[error("Configuration error: {0}")]
    Config(#[from] TopicError),
}
