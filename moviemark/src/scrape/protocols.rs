//! Protocol traits for the parser's components.
//!
//! These traits define the seams between fetching, extraction, the
//! OpenGraph fallback and observability, so each can be swapped out (the
//! `testing` module relies on this).

use async_trait::async_trait;

use super::decode::decode_html;
use super::models::ParseResult;
use crate::errors::MovieMarkError;

/// A page body retrieved by a [`PageFetcher`].
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code.
    pub status_code: u16,
    /// Raw response body.
    pub body: Vec<u8>,
    /// Final URL after redirects.
    pub final_url: String,
    /// Content type from headers.
    pub content_type: Option<String>,
    /// Time taken to fetch in milliseconds.
    pub duration_ms: f64,
}

impl FetchedPage {
    /// Creates a 200 response carrying `html`, as served from `url`.
    #[must_use]
    pub fn html(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: html.into().into_bytes(),
            final_url: url.into(),
            content_type: Some("text/html; charset=utf-8".to_string()),
            duration_ms: 0.0,
        }
    }

    /// Decodes the body to UTF-8 text, tolerating bad bytes.
    #[must_use]
    pub fn text(&self) -> String {
        decode_html(&self.body, self.content_type.as_deref())
    }
}

/// Protocol for retrieving a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` once. Any network error, timeout or non-2xx status is an `Err`.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, MovieMarkError>;
}

/// Protocol for pulling bookmark metadata out of HTML.
pub trait MetadataExtractor: Send + Sync {
    /// Extracts title, description and poster from `html` served at `page_url`.
    fn extract(&self, html: &str, page_url: &str) -> Result<ParseResult, MovieMarkError>;
}

/// Protocol for the OpenGraph extraction service used as a fallback.
#[async_trait]
pub trait OpenGraphApi: Send + Sync {
    /// Asks the service about `url`. Never fails: problems give [`ParseResult::failed`].
    async fn lookup(&self, url: &str) -> ParseResult;
}

/// Why the orchestration fell back to the OpenGraph API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The page could not be fetched.
    FetchFailed,
    /// Extraction hit an unexpected error.
    ExtractionFailed,
    /// The page was fetched but no title was found.
    EmptyTitle,
}

impl FallbackReason {
    /// Short label used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FetchFailed => "fetch_failed",
            Self::ExtractionFailed => "extraction_failed",
            Self::EmptyTitle => "empty_title",
        }
    }
}

/// Observability callbacks for parse operations.
pub trait ParseObserver: Send + Sync {
    /// Called when a parse starts.
    fn on_parse_start(&self, url: &str, request_id: &str);

    /// Called when the page fetch completes.
    fn on_fetch_complete(&self, url: &str, request_id: &str, duration_ms: f64, status_code: u16);

    /// Called when the page fetch fails.
    fn on_fetch_error(&self, url: &str, request_id: &str, error: &MovieMarkError);

    /// Called when the OpenGraph fallback is about to run.
    fn on_fallback(&self, url: &str, request_id: &str, reason: FallbackReason);

    /// Called with the final result.
    fn on_parse_complete(&self, url: &str, request_id: &str, duration_ms: f64, result: &ParseResult);
}

/// No-op implementation of ParseObserver.
#[derive(Debug, Clone, Default)]
pub struct NoOpParseObserver;

impl ParseObserver for NoOpParseObserver {
    fn on_parse_start(&self, _url: &str, _request_id: &str) {}
    fn on_fetch_complete(&self, _url: &str, _request_id: &str, _duration_ms: f64, _status_code: u16) {}
    fn on_fetch_error(&self, _url: &str, _request_id: &str, _error: &MovieMarkError) {}
    fn on_fallback(&self, _url: &str, _request_id: &str, _reason: FallbackReason) {}
    fn on_parse_complete(&self, _url: &str, _request_id: &str, _duration_ms: f64, _result: &ParseResult) {}
}
