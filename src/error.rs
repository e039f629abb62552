//! Error types for the listing pipeline.

use thiserror::Error;

/// Result type for listing operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Day/time fragment could not be turned into a showtime
    #[error("invalid showtime format: {0}")]
    InvalidFormat(String),

    /// Listing artifact does not match the expected schema
    #[error("malformed artifact: {0}")]
    MalformedArtifact(String),

    #[error("selector error: {0}")]
    Selector(String),

    #[error("invalid url: {0}")]
    Url(String),

    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
