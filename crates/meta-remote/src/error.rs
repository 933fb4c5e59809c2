//! Remote schema fetch error types.

use thiserror::Error;

/// Errors that can occur when fetching schema documents over HTTP.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The schema host returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the host.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The response body is not a JSON document.
    #[error("parse error: {0}")]
    Parse(String),

    /// The URL template cannot produce per-version URLs.
    #[error("invalid URL template '{0}': missing {{version}}")]
    InvalidTemplate(String),

    /// Reading a schema from the local directory failed.
    #[error(transparent)]
    Local(#[from] meta_schema::SourceError),

    /// The host returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },
}
