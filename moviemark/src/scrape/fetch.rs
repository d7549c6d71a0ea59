//! HTTP page fetcher built on `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use super::config::ParserConfig;
use super::protocols::{FetchedPage, PageFetcher};
use crate::errors::MovieMarkError;
use crate::observability::SpanTimer;

/// Builds the client shared settings for both outbound calls.
///
/// TLS verification is only relaxed when the config opts in. With rustls,
/// accepting invalid certificates also skips the hostname check.
pub(crate) fn build_client(
    config: &ParserConfig,
    timeout: Duration,
) -> Result<reqwest::Client, MovieMarkError> {
    config.validate()?;

    let mut builder = reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(timeout)
        .user_agent(config.user_agent.as_str())
        .danger_accept_invalid_certs(config.accept_invalid_certs);

    builder = match config.proxy_transport_url()? {
        Some(proxy) => builder.proxy(
            reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| MovieMarkError::Config(format!("invalid proxy '{proxy}': {e}")))?,
        ),
        None => builder.no_proxy(),
    };

    if config.accept_invalid_certs {
        tracing::warn!("TLS certificate verification is disabled for outbound requests");
    }

    builder
        .build()
        .map_err(|e| MovieMarkError::Config(format!("failed to build HTTP client: {e}")))
}

/// Fetches pages with a single GET, optionally through the configured proxy.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: reqwest::Client,
    timeout_seconds: f64,
    max_response_size: usize,
}

impl HttpPageFetcher {
    /// Creates a fetcher from the parser configuration.
    pub fn new(config: &ParserConfig) -> Result<Self, MovieMarkError> {
        Ok(Self {
            client: build_client(config, config.timeout())?,
            timeout_seconds: config.timeout_seconds,
            max_response_size: config.max_response_size,
        })
    }

    fn send_error(&self, url: &str, err: &reqwest::Error) -> MovieMarkError {
        if err.is_timeout() {
            MovieMarkError::Timeout {
                url: url.to_string(),
                seconds: self.timeout_seconds,
            }
        } else {
            MovieMarkError::Fetch(format!("{url}: {err}"))
        }
    }

    fn too_large(&self, size: usize) -> MovieMarkError {
        MovieMarkError::ResponseTooLarge {
            size,
            limit: self.max_response_size,
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, MovieMarkError> {
        let timer = SpanTimer::start("page_fetch");

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.send_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MovieMarkError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(announced) = response.content_length() {
            let announced = usize::try_from(announced).unwrap_or(usize::MAX);
            if announced > self.max_response_size {
                return Err(self.too_large(announced));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.send_error(url, &e))?
        {
            if body.len() + chunk.len() > self.max_response_size {
                return Err(self.too_large(body.len() + chunk.len()));
            }
            body.extend_from_slice(&chunk);
        }

        let duration_ms = timer.finish();
        tracing::debug!(
            url,
            final_url = %final_url,
            status = status.as_u16(),
            bytes = body.len(),
            duration_ms,
            "Fetched page"
        );

        Ok(FetchedPage {
            status_code: status.as_u16(),
            body,
            final_url,
            content_type,
            duration_ms,
        })
    }
}
