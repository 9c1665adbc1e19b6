//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("HTTP error: {0}")]
    Http(String),

    /// Error object returned by the MediaWiki API (`{"error": {...}}`).
    #[error("MediaWiki API error {code}: {info}")]
    Api { code: String, info: String },

    #[error("Failed to decode API response: {0}")]
    Decode(String),

    /// Server kept answering 429 after all retries were spent.
    #[error("Rate limited: retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("Repository error: {0}")]
    Repo(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Input(String),
}
