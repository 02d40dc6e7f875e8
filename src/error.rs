//! Custom error types for coauthors.
//!
//! Every fallible operation returns `Result<T, CoauthorsError>`. Failures are
//! never retried or recovered locally; they propagate up to `main` and
//! terminate the process with a nonzero status.

use thiserror::Error;

/// Main error type for coauthors operations.
///
/// Uses `thiserror` for ergonomic error handling and automatic `Display` implementation.
#[derive(Debug, Error)]
pub enum CoauthorsError {
    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// HTML parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Rate limited by Google Scholar
    #[error("Rate limited, retry after {0}s")]
    RateLimited(u64),

    /// Upstream returned an error status
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code
        code: i32,
        /// Error message
        message: String,
    },

    /// CAPTCHA detected
    #[error("CAPTCHA detected, wait a while or route through a proxy")]
    Captcha,

    /// No author profile matched the query
    #[error("No author found for {0:?}")]
    AuthorNotFound(String),

    /// Candidate disambiguation failed
    #[error("Selection error: {0}")]
    Selection(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias using `CoauthorsError`
pub type Result<T> = std::result::Result<T, CoauthorsError>;
