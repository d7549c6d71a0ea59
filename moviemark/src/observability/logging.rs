//! Tracing-backed observer and timing helpers for parse operations.

use std::time::Instant;

use crate::errors::MovieMarkError;
use crate::scrape::{FallbackReason, ParseObserver, ParseResult};

/// Times one outbound call or parse and reports it at `trace` level.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    name: &'static str,
}

impl SpanTimer {
    /// Starts timing the span called `name`.
    #[must_use]
    pub fn start(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    /// Stops the timer and returns the elapsed milliseconds.
    #[must_use]
    pub fn finish(self) -> f64 {
        let duration_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        tracing::trace!(span = self.name, duration_ms, "Span finished");
        duration_ms
    }
}

/// Builds the single summary event logged when a parse finishes.
#[must_use]
pub fn parse_event_payload(
    url: &str,
    request_id: &str,
    duration_ms: f64,
    result: &ParseResult,
) -> serde_json::Value {
    serde_json::json!({
        "url": url,
        "request_id": request_id,
        "duration_ms": duration_ms,
        "success": result.success(),
        "has_description": !result.description().is_empty(),
        "has_poster": !result.poster_url().is_empty(),
    })
}

/// Observer that reports every callback through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct LoggingParseObserver;

impl ParseObserver for LoggingParseObserver {
    fn on_parse_start(&self, url: &str, request_id: &str) {
        tracing::debug!(url, request_id, "Parse started");
    }

    fn on_fetch_complete(&self, url: &str, request_id: &str, duration_ms: f64, status_code: u16) {
        tracing::debug!(url, request_id, duration_ms, status_code, "Page fetched");
    }

    fn on_fetch_error(&self, url: &str, request_id: &str, error: &MovieMarkError) {
        tracing::warn!(
            url,
            request_id,
            error_kind = error.kind(),
            error = %error,
            "Page fetch failed"
        );
    }

    fn on_fallback(&self, url: &str, request_id: &str, reason: FallbackReason) {
        tracing::info!(
            url,
            request_id,
            reason = reason.as_str(),
            "Falling back to OpenGraph API"
        );
    }

    fn on_parse_complete(&self, url: &str, request_id: &str, duration_ms: f64, result: &ParseResult) {
        let payload = parse_event_payload(url, request_id, duration_ms, result);
        tracing::info!(
            event_type = "parse.complete",
            event_data = %payload,
            "Parse complete"
        );
    }
}
