//! Error types for the core library.

use thiserror::Error;

use crate::whitelist::ValidationError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The account identity could not be derived from the page URL.
    #[error("Unable to resolve account identity from page URL: {0}")]
    IdentityUnresolved(String),

    /// User supplied input was rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Storage backend could not complete a read or write.
    #[error("Storage unavailable: {0}")]
    Storage(String),
}

impl Error {
    /// Whether this error came from the persistence layer.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Storage(_) | Self::Serde(_))
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
