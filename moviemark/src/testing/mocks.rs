//! Mock components for testing the parser without a network.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::MovieMarkError;
use crate::scrape::{
    FallbackReason, FetchedPage, MetadataExtractor, OpenGraphApi, PageFetcher, ParseObserver,
    ParseResult,
};

/// A fetcher that records calls and returns a configurable response.
#[derive(Debug)]
pub struct MockPageFetcher {
    response: Mutex<Result<FetchedPage, MovieMarkError>>,
    urls: Mutex<Vec<String>>,
}

impl MockPageFetcher {
    /// Creates a fetcher that serves `html` for every URL.
    #[must_use]
    pub fn with_html(html: impl Into<String>) -> Self {
        Self::with_page(FetchedPage::html("", html))
    }

    /// Creates a fetcher that returns `page` for every URL.
    #[must_use]
    pub fn with_page(page: FetchedPage) -> Self {
        Self {
            response: Mutex::new(Ok(page)),
            urls: Mutex::new(Vec::new()),
        }
    }

    /// Creates a fetcher that fails every call with `error`.
    #[must_use]
    pub fn failing(error: MovieMarkError) -> Self {
        Self {
            response: Mutex::new(Err(error)),
            urls: Mutex::new(Vec::new()),
        }
    }

    /// Returns the number of times the fetcher was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.urls.lock().len()
    }

    /// Returns the URLs fetched, in call order.
    #[must_use]
    pub fn recorded_urls(&self) -> Vec<String> {
        self.urls.lock().clone()
    }
}

#[async_trait]
impl PageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, MovieMarkError> {
        self.urls.lock().push(url.to_string());
        self.response.lock().clone().map(|mut page| {
            if page.final_url.is_empty() {
                page.final_url = url.to_string();
            }
            page
        })
    }
}

/// An OpenGraph API stand-in that records calls and returns a fixed result.
#[derive(Debug)]
pub struct MockOpenGraphApi {
    result: Mutex<ParseResult>,
    urls: Mutex<Vec<String>>,
}

impl MockOpenGraphApi {
    /// Creates an API that answers every lookup with `result`.
    #[must_use]
    pub fn returning(result: ParseResult) -> Self {
        Self {
            result: Mutex::new(result),
            urls: Mutex::new(Vec::new()),
        }
    }

    /// Sets the result to return.
    pub fn set_result(&self, result: ParseResult) {
        *self.result.lock() = result;
    }

    /// Returns the number of lookups.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.urls.lock().len()
    }

    /// Returns the URLs looked up, in call order.
    #[must_use]
    pub fn recorded_urls(&self) -> Vec<String> {
        self.urls.lock().clone()
    }
}

#[async_trait]
impl OpenGraphApi for MockOpenGraphApi {
    async fn lookup(&self, url: &str) -> ParseResult {
        self.urls.lock().push(url.to_string());
        self.result.lock().clone()
    }
}

/// An extractor that always errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingExtractor;

impl MetadataExtractor for FailingExtractor {
    fn extract(&self, _html: &str, _page_url: &str) -> Result<ParseResult, MovieMarkError> {
        Err(MovieMarkError::Extraction("extractor unavailable".to_string()))
    }
}

/// An observer that records a compact label per callback.
#[derive(Debug, Default)]
pub struct RecordingParseObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingParseObserver {
    /// Returns the recorded labels.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}

impl ParseObserver for RecordingParseObserver {
    fn on_parse_start(&self, _url: &str, _request_id: &str) {
        self.events.lock().push("start".to_string());
    }

    fn on_fetch_complete(&self, _url: &str, _request_id: &str, _duration_ms: f64, status_code: u16) {
        self.events.lock().push(format!("fetched:{status_code}"));
    }

    fn on_fetch_error(&self, _url: &str, _request_id: &str, error: &MovieMarkError) {
        self.events.lock().push(format!("fetch_error:{}", error.kind()));
    }

    fn on_fallback(&self, _url: &str, _request_id: &str, reason: FallbackReason) {
        self.events.lock().push(format!("fallback:{}", reason.as_str()));
    }

    fn on_parse_complete(&self, _url: &str, _request_id: &str, _duration_ms: f64, result: &ParseResult) {
        self.events.lock().push(format!("complete:{}", result.success()));
    }
}
