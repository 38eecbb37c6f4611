use thiserror::Error;

/// Failures surfaced by the adaptor's operations.
#[derive(Debug, Error)]
pub enum AdaptorError {
    /// the store's own error, unchanged; only returned when no error handler is configured
    #[error(transparent)]
    Store(anyhow::Error),

    /// raised by the error handler while recovering from a store error
    #[error(transparent)]
    Recovery(anyhow::Error),

    #[error("failed to serialize value for key {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to deserialize value for key {key}: {source}")]
    Deserialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid adaptor configuration: {0}")]
    Config(String),
}

impl AdaptorError {
    /// the original store error, when this is a passthrough
    pub fn store_error(&self) -> Option<&anyhow::Error> {
        match self {
            AdaptorError::Store(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_store(&self) -> bool {
        matches!(self, AdaptorError::Store(_))
    }
}

pub type Result<T> = std::result::Result<T, AdaptorError>;
