//! Enrichment error types.

use thiserror::Error;

use crate::sources::SourceKind;

/// Errors reported by a single data source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source could not be reached or returned no result
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// The request was rejected by the search index
    #[error("Request failed: {0}")]
    Request(String),

    /// The response could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors that fail a whole enrichment pass.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// One of the joined sources failed
    #[error("Enrichment source '{kind}' failed: {error}")]
    Source {
        kind: SourceKind,
        #[source]
        error: SourceError,
    },
}

impl EnrichError {
    /// The source that caused the failure.
    pub fn kind(&self) -> SourceKind {
        match self {
            EnrichError::Source { kind, .. } => *kind,
        }
    }
}
