//! The link parser: primary page scrape with an OpenGraph API fallback.

use std::sync::Arc;

use super::extract::HtmlMetadataExtractor;
use super::models::{ParseResult, ParseUrlResponse, MSG_EMPTY_URL, MSG_INVALID_URL};
use super::protocols::{
    FallbackReason, MetadataExtractor, NoOpParseObserver, OpenGraphApi, PageFetcher, ParseObserver,
};
use crate::errors::UrlValidationError;
use crate::observability::SpanTimer;
use crate::utils::validate_url;

/// Scrapes bookmark metadata for a URL.
///
/// Each call fetches the page once and extracts from it. When the fetch
/// fails, extraction errors, or no title comes out, the OpenGraph API result
/// is returned as-is instead. Results from the two paths are never merged.
///
/// The parser holds no per-call state, so one instance can serve concurrent
/// callers.
pub struct MovieParser {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn MetadataExtractor>,
    api: Arc<dyn OpenGraphApi>,
    observer: Arc<dyn ParseObserver>,
}

impl std::fmt::Debug for MovieParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieParser").finish_non_exhaustive()
    }
}

impl MovieParser {
    /// Creates a parser from a fetcher and an OpenGraph API client.
    #[must_use]
    pub fn new(fetcher: Arc<dyn PageFetcher>, api: Arc<dyn OpenGraphApi>) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(HtmlMetadataExtractor::new()),
            api,
            observer: Arc::new(NoOpParseObserver),
        }
    }

    /// Creates a parser that talks HTTP with the given configuration.
    #[cfg(feature = "http")]
    pub fn from_config(
        config: &super::config::ParserConfig,
    ) -> Result<Self, crate::errors::MovieMarkError> {
        let fetcher = super::fetch::HttpPageFetcher::new(config)?;
        let api = super::opengraph::HttpOpenGraphClient::new(config)?;
        Ok(Self::new(Arc::new(fetcher), Arc::new(api))
            .with_observer(Arc::new(crate::observability::LoggingParseObserver)))
    }

    /// Replaces the metadata extractor.
    #[must_use]
    pub fn with_extractor(mut self, extractor: Arc<dyn MetadataExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Replaces the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ParseObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Parses `url`. Always returns a well-formed result.
    pub async fn parse(&self, url: &str) -> ParseResult {
        let request_id = uuid::Uuid::new_v4().to_string();
        let timer = SpanTimer::start("parse");
        self.observer.on_parse_start(url, &request_id);

        let result = match self.scrape_page(url, &request_id).await {
            Ok(result) => result,
            Err(reason) => {
                self.observer.on_fallback(url, &request_id, reason);
                self.api.lookup(url).await
            }
        };

        self.observer
            .on_parse_complete(url, &request_id, timer.finish(), &result);
        result
    }

    /// Validates the raw request value, parses it, and wraps the outcome in
    /// the JSON envelope the bookmark form expects.
    pub async fn handle_request(&self, raw_url: Option<&str>) -> ParseUrlResponse {
        let raw = raw_url.unwrap_or_default().trim();
        match validate_url(raw) {
            Ok(_) => {}
            Err(UrlValidationError::Empty) => return ParseUrlResponse::failure(MSG_EMPTY_URL),
            Err(UrlValidationError::Malformed(reason)) => {
                tracing::debug!(raw_url = raw, reason = %reason, "Rejected parse request");
                return ParseUrlResponse::failure(MSG_INVALID_URL);
            }
        }

        ParseUrlResponse::from(self.parse(raw).await)
    }

    /// The primary path. `Err` names the reason to fall back.
    async fn scrape_page(&self, url: &str, request_id: &str) -> Result<ParseResult, FallbackReason> {
        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(err) => {
                self.observer.on_fetch_error(url, request_id, &err);
                return Err(FallbackReason::FetchFailed);
            }
        };
        self.observer
            .on_fetch_complete(url, request_id, page.duration_ms, page.status_code);

        let html = page.text();
        let result = self.extractor.extract(&html, url).map_err(|err| {
            tracing::warn!(url, request_id, error = %err, "Metadata extraction failed");
            FallbackReason::ExtractionFailed
        })?;

        if result.success() {
            Ok(result)
        } else {
            tracing::debug!(
                url,
                request_id,
                dropped_description = !result.description().is_empty(),
                dropped_poster = !result.poster_url().is_empty(),
                "Page has no title"
            );
            Err(FallbackReason::EmptyTitle)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MovieMarkError;
    use crate::scrape::models::MSG_NOT_DETECTED;
    use crate::testing::{
        assert_parse_failed, assert_parse_succeeded, assert_poster_absolute, fixtures,
        FailingExtractor, MockOpenGraphApi, MockPageFetcher, RecordingParseObserver,
    };
    use pretty_assertions::assert_eq;

    fn parser(fetcher: &Arc<MockPageFetcher>, api: &Arc<MockOpenGraphApi>) -> MovieParser {
        MovieParser::new(fetcher.clone(), api.clone())
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let fetcher = Arc::new(MockPageFetcher::with_html(fixtures::OPENGRAPH_PAGE));
        let api = Arc::new(MockOpenGraphApi::returning(ParseResult::new("Wrong", "", "")));

        let result = parser(&fetcher, &api)
            .parse("https://movies.example.com/film/42")
            .await;

        assert_parse_succeeded(&result);
        assert_poster_absolute(&result);
        assert_eq!(result.title(), "Blade Runner");
        assert_eq!(result.poster_url(), "https://movies.example.com/img/blade-runner.jpg");
        assert_eq!(fetcher.call_count(), 1);
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_returns_fallback_unmodified() {
        let fetcher = Arc::new(MockPageFetcher::failing(MovieMarkError::Fetch(
            "connection reset".to_string(),
        )));
        let expected = ParseResult::new("From API", "api description", "https://img.example.com/a.jpg");
        let api = Arc::new(MockOpenGraphApi::returning(expected.clone()));

        let result = parser(&fetcher, &api).parse("https://example.com/film").await;

        assert_eq!(result, expected);
        assert_eq!(api.call_count(), 1);
        assert_eq!(api.recorded_urls(), vec!["https://example.com/film".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_failure_with_failed_fallback() {
        let fetcher = Arc::new(MockPageFetcher::failing(MovieMarkError::Timeout {
            url: "https://example.com".to_string(),
            seconds: 10.0,
        }));
        let api = Arc::new(MockOpenGraphApi::returning(ParseResult::failed()));

        let result = parser(&fetcher, &api).parse("https://example.com/x").await;
        assert_parse_failed(&result);
        assert_eq!(result, ParseResult::failed());
    }

    #[tokio::test]
    async fn test_titleless_page_discards_primary_fields() {
        // Description and poster are present but there is no title and the
        // URL path is empty, so the API answer wins outright.
        let fetcher = Arc::new(MockPageFetcher::with_html(fixtures::TITLELESS_PAGE));
        let fallback = ParseResult::new("", "", "");
        let api = Arc::new(MockOpenGraphApi::returning(fallback.clone()));

        let result = parser(&fetcher, &api).parse("https://example.com/").await;

        assert_eq!(result, fallback);
        assert_eq!(result.description(), "");
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_titleless_page_uses_api_title() {
        let fetcher = Arc::new(MockPageFetcher::with_html(fixtures::TITLELESS_PAGE));
        let api = Arc::new(MockOpenGraphApi::returning(ParseResult::new("Stalker", "", "")));

        let result = parser(&fetcher, &api).parse("https://example.com").await;
        assert_parse_succeeded(&result);
        assert_eq!(result.title(), "Stalker");
    }

    #[tokio::test]
    async fn test_extraction_error_falls_back() {
        let fetcher = Arc::new(MockPageFetcher::with_html(fixtures::OPENGRAPH_PAGE));
        let api = Arc::new(MockOpenGraphApi::returning(ParseResult::new("Recovered", "", "")));

        let result = parser(&fetcher, &api)
            .with_extractor(Arc::new(FailingExtractor))
            .parse("https://example.com/film")
            .await;

        assert_eq!(result.title(), "Recovered");
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_observer_sees_fallback_reason() {
        let fetcher = Arc::new(MockPageFetcher::failing(MovieMarkError::Fetch("dns".to_string())));
        let api = Arc::new(MockOpenGraphApi::returning(ParseResult::failed()));
        let observer = Arc::new(RecordingParseObserver::default());

        parser(&fetcher, &api)
            .with_observer(observer.clone())
            .parse("https://example.com/x")
            .await;

        assert_eq!(
            observer.events(),
            vec![
                "start".to_string(),
                "fetch_error:fetch".to_string(),
                "fallback:fetch_failed".to_string(),
                "complete:false".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_success_invariant_on_both_paths() {
        let pages = [fixtures::OPENGRAPH_PAGE, fixtures::TITLELESS_PAGE, fixtures::BROKEN_PAGE, ""];
        let answers = [
            ParseResult::failed(),
            ParseResult::new("T", "", ""),
            ParseResult::new(" ", "d", "p"),
        ];

        for page in pages {
            for answer in &answers {
                let fetcher = Arc::new(MockPageFetcher::with_html(page));
                let api = Arc::new(MockOpenGraphApi::returning(answer.clone()));
                let result = parser(&fetcher, &api).parse("https://example.com/").await;
                assert!(!result.success() || !result.title().is_empty());
            }
        }
    }

    #[tokio::test]
    async fn test_handle_request_empty_url() {
        let fetcher = Arc::new(MockPageFetcher::with_html(fixtures::OPENGRAPH_PAGE));
        let api = Arc::new(MockOpenGraphApi::returning(ParseResult::failed()));
        let parser = parser(&fetcher, &api);

        assert_eq!(parser.handle_request(None).await, ParseUrlResponse::failure(MSG_EMPTY_URL));
        assert_eq!(parser.handle_request(Some("  ")).await, ParseUrlResponse::failure(MSG_EMPTY_URL));
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_handle_request_invalid_url() {
        let fetcher = Arc::new(MockPageFetcher::with_html(fixtures::OPENGRAPH_PAGE));
        let api = Arc::new(MockOpenGraphApi::returning(ParseResult::failed()));

        let response = parser(&fetcher, &api).handle_request(Some("not a url")).await;
        assert_eq!(response, ParseUrlResponse::failure(MSG_INVALID_URL));
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_handle_request_success_envelope() {
        let fetcher = Arc::new(MockPageFetcher::with_html(fixtures::OPENGRAPH_PAGE));
        let api = Arc::new(MockOpenGraphApi::returning(ParseResult::failed()));

        let response = parser(&fetcher, &api)
            .handle_request(Some("https://movies.example.com/film/42"))
            .await;

        assert!(response.is_success());
        let data = response.data().unwrap();
        assert_eq!(data.title, "Blade Runner");
        assert_eq!(data.description, "A blade runner must pursue replicants.");
    }

    #[tokio::test]
    async fn test_handle_request_nothing_detected() {
        let fetcher = Arc::new(MockPageFetcher::failing(MovieMarkError::Fetch("down".to_string())));
        let api = Arc::new(MockOpenGraphApi::returning(ParseResult::failed()));

        let response = parser(&fetcher, &api)
            .handle_request(Some("https://example.com/film"))
            .await;
        assert!(!response.is_success());
        assert_eq!(response.message(), Some(MSG_NOT_DETECTED));
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_from_config_falls_back_to_api_on_404() {
        use crate::scrape::ParserConfig;
        use httpmock::prelude::*;
        use serde_json::json;

        let site = MockServer::start();
        let page = site.mock(|when, then| {
            when.method(GET).path("/film/heat");
            then.status(404).body("gone");
        });
        let target = site.url("/film/heat");

        let api = MockServer::start();
        let lookup = api.mock(|when, then| {
            when.method(GET)
                .path("/opengraph")
                .query_param("url", target.as_str());
            then.status(200).json_body(json!({
                "success": true,
                "data": { "title": "Heat", "image": "/heat.jpg" }
            }));
        });

        let config = ParserConfig::new()
            .without_proxy()
            .with_opengraph_api_url(api.url("/opengraph"))
            .with_timeout(2.0)
            .with_api_timeout(2.0);
        let parser = MovieParser::from_config(&config).unwrap();

        let result = parser.parse(&target).await;

        page.assert_hits(1);
        lookup.assert_hits(1);
        assert_parse_succeeded(&result);
        assert_eq!(result.title(), "Heat");
        assert_eq!(result.poster_url(), site.url("/heat.jpg"));
    }
}
