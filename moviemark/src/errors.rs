//! Error types for the moviemark link parser.
//!
//! Every fallible step of a parse returns `Result<_, MovieMarkError>`. The
//! orchestration in [`crate::scrape::MovieParser`] branches on these values instead of
//! letting them reach the caller.

use thiserror::Error;

/// The main error type for moviemark operations.
#[derive(Debug, Clone, Error)]
pub enum MovieMarkError {
    /// A network-level failure (DNS, connect, TLS, body read).
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The remote answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// Status code returned by the server.
        status: u16,
        /// URL that was requested.
        url: String,
    },

    /// The request exceeded its configured timeout.
    #[error("Request to {url} timed out after {seconds}s")]
    Timeout {
        /// URL that was requested.
        url: String,
        /// Timeout that elapsed.
        seconds: f64,
    },

    /// The response body was larger than allowed.
    #[error("Response too large: {size} bytes (limit {limit})")]
    ResponseTooLarge {
        /// Observed or announced body size.
        size: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Metadata extraction failed unexpectedly.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The OpenGraph API answered with something unusable.
    #[error("OpenGraph API error: {0}")]
    Api(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The caller supplied an unusable URL.
    #[error("{0}")]
    Validation(#[from] UrlValidationError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl MovieMarkError {
    /// Whether this error came from talking to a remote server.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Fetch(_) | Self::HttpStatus { .. } | Self::Timeout { .. } | Self::ResponseTooLarge { .. }
        )
    }

    /// Short machine-friendly label, used as a log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::HttpStatus { .. } => "http_status",
            Self::Timeout { .. } => "timeout",
            Self::ResponseTooLarge { .. } => "response_too_large",
            Self::Extraction(_) => "extraction",
            Self::Api(_) => "api",
            Self::Config(_) => "config",
            Self::Validation(_) => "validation",
            Self::Serialization(_) => "serialization",
        }
    }
}

impl From<serde_json::Error> for MovieMarkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for MovieMarkError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::HttpStatus {
                status: status.as_u16(),
                url: err.url().map(ToString::to_string).unwrap_or_default(),
            };
        }
        Self::Fetch(err.to_string())
    }
}

/// Why a caller-supplied URL was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlValidationError {
    /// Nothing (or only whitespace) was supplied.
    #[error("URL cannot be empty")]
    Empty,

    /// The string is not an absolute http(s) URL with a host.
    #[error("Invalid URL format: {0}")]
    Malformed(String),
}
