//! Error types for subtally-core

use thiserror::Error;

/// Main error type for the subtally-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Subscription not found
    #[error("subscription not found: {0}")]
    SubscriptionNotFound(i64),
}

/// Result type alias for subtally-core
pub type Result<T> = std::result::Result<T, Error>;
