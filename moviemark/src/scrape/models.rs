//! Data models for parse results and the request envelope.

use serde::{Deserialize, Serialize};

/// Message returned when the request carried no URL.
pub const MSG_EMPTY_URL: &str = "URL cannot be empty";
/// Message returned when the URL did not validate.
pub const MSG_INVALID_URL: &str = "Invalid URL format";
/// Message returned when neither path produced a title.
pub const MSG_NOT_DETECTED: &str =
    "Could not detect movie info from this URL, please fill it in manually";

/// Outcome of a single metadata scrape.
///
/// `success` is true exactly when `title` is non-empty. The fields are only
/// settable through the constructors, which keep that invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    success: bool,
    title: String,
    description: String,
    poster_url: String,
}

impl ParseResult {
    /// Creates a result from extracted fields, trimming each one.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        poster_url: impl Into<String>,
    ) -> Self {
        let title = trimmed(title.into());
        Self {
            success: !title.is_empty(),
            title,
            description: trimmed(description.into()),
            poster_url: trimmed(poster_url.into()),
        }
    }

    /// Creates the failed result: `success=false`, every field empty.
    #[must_use]
    pub fn failed() -> Self {
        Self::default()
    }

    /// Whether a non-empty title was obtained.
    #[must_use]
    pub fn success(&self) -> bool {
        self.success
    }

    /// The title, empty when absent.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The description, empty when absent.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The absolute poster URL, empty when absent.
    #[must_use]
    pub fn poster_url(&self) -> &str {
        &self.poster_url
    }

    /// Converts into the payload carried by a successful response.
    #[must_use]
    pub fn into_movie_info(self) -> MovieInfo {
        MovieInfo {
            title: self.title,
            description: self.description,
            poster_url: self.poster_url,
        }
    }
}

fn trimmed(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

/// Bookmark fields auto-filled from a link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieInfo {
    /// Movie title.
    pub title: String,
    /// Short description.
    pub description: String,
    /// Absolute poster image URL.
    pub poster_url: String,
}

/// JSON envelope answered to a "parse this URL" request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParseUrlResponse {
    /// Metadata was detected.
    Success {
        /// Always `true`.
        success: bool,
        /// The detected fields.
        data: MovieInfo,
    },
    /// Nothing usable was detected, or the request was invalid.
    Failure {
        /// Always `false`.
        success: bool,
        /// Human-readable reason.
        message: String,
    },
}

impl ParseUrlResponse {
    /// Wraps detected metadata.
    #[must_use]
    pub fn success(data: MovieInfo) -> Self {
        Self::Success {
            success: true,
            data,
        }
    }

    /// Wraps a failure message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            success: false,
            message: message.into(),
        }
    }

    /// Whether this is a success envelope.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The detected metadata, if any.
    #[must_use]
    pub fn data(&self) -> Option<&MovieInfo> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// The failure message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { message, .. } => Some(message),
        }
    }
}

impl From<ParseResult> for ParseUrlResponse {
    fn from(result: ParseResult) -> Self {
        if result.success() {
            Self::success(result.into_movie_info())
        } else {
            Self::failure(MSG_NOT_DETECTED)
        }
    }
}
