use thiserror::Error;

#[derive(Error, Debug)]
pub enum PantryError {
    /// No search services, a stale service selection, or an out-of-range setting.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Query rewrite error: {0}")]
    Rewrite(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: String, secs: u64 },

    #[error("A turn is already in progress for this session")]
    TurnInProgress,

    #[error("Warehouse error: {0}")]
    Warehouse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl PantryError {
    pub fn timeout(operation: impl Into<String>, secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            secs,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, PantryError>;
