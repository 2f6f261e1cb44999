//! Error types for rune-stack

use thiserror::Error;

/// Result type for rune-stack operations
pub type Result<T> = std::result::Result<T, StackError>;

/// rune-stack error types
#[derive(Error, Debug)]
pub enum StackError {
    /// A docker command failed or reported something we cannot act on
    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(String),
}

impl StackError {
    /// Whether this error means the inspected object does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, StackError::NotFound(_))
    }
}
