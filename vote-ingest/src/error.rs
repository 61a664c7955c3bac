//! Error types for configuration and per-element writes

use thiserror::Error;

/// A single list element could not be stored. Never fatal for the stream.
#[derive(Debug, Error)]
pub enum WriteFailure {
    #[error("failed to map {entity} element: {source}")]
    Extract {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to store {entity}: {source}")]
    Store {
        entity: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl WriteFailure {
    pub fn entity(&self) -> &'static str {
        match self {
            WriteFailure::Extract { entity, .. } | WriteFailure::Store { entity, .. } => entity,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("could not assemble connection url: {0}")]
    Url(#[from] url::ParseError),
}
