//! Client for the external OpenGraph extraction API.
//!
//! The service answers `GET <base>?url=<target>&proxy=<proxy>` with
//! `{"success": bool, "data": {...}}`, where `data` holds OpenGraph and
//! Twitter-card fields under a few spellings.

use async_trait::async_trait;

use super::config::ParserConfig;
use super::fetch::build_client;
use super::models::ParseResult;
use super::protocols::OpenGraphApi;
use super::resolve::resolve;
use crate::errors::MovieMarkError;
use crate::observability::SpanTimer;

const TITLE_KEYS: [&str; 3] = ["title", "twitter:title", "twitterTitle"];
const DESCRIPTION_KEYS: [&str; 3] = ["description", "twitter:description", "twitterDescription"];
const IMAGE_KEYS: [&str; 3] = ["image", "twitter:image", "twitterImage"];

/// HTTP client for the OpenGraph API.
#[derive(Debug, Clone)]
pub struct HttpOpenGraphClient {
    client: reqwest::Client,
    endpoint: String,
    proxy: Option<String>,
    timeout_seconds: f64,
}

impl HttpOpenGraphClient {
    /// Creates a client from the parser configuration.
    pub fn new(config: &ParserConfig) -> Result<Self, MovieMarkError> {
        // The proxy is handed to the service as a parameter; the call itself
        // goes straight to the API.
        let direct = config.clone().without_proxy();
        Ok(Self {
            client: build_client(&direct, config.api_timeout())?,
            endpoint: config.opengraph_api_url.clone(),
            proxy: config.proxy.clone(),
            timeout_seconds: config.api_timeout_seconds,
        })
    }

    /// The configured API base URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self, url: &str) -> Result<serde_json::Value, MovieMarkError> {
        let mut query = vec![("url", url)];
        if let Some(proxy) = self.proxy.as_deref() {
            query.push(("proxy", proxy));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MovieMarkError::Timeout {
                        url: self.endpoint.clone(),
                        seconds: self.timeout_seconds,
                    }
                } else {
                    MovieMarkError::Fetch(format!("{}: {e}", self.endpoint))
                }
            })?;

        let bytes = response.bytes().await.map_err(MovieMarkError::from)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl OpenGraphApi for HttpOpenGraphClient {
    async fn lookup(&self, url: &str) -> ParseResult {
        let timer = SpanTimer::start("opengraph_lookup");

        let result = match self.request(url).await {
            Ok(body) => map_api_response(&body, url).unwrap_or_else(|err| {
                tracing::debug!(url, error = %err, "OpenGraph API returned no data");
                ParseResult::failed()
            }),
            Err(err) => {
                tracing::warn!(
                    url,
                    endpoint = %self.endpoint,
                    error_kind = err.kind(),
                    error = %err,
                    "OpenGraph API request failed"
                );
                ParseResult::failed()
            }
        };

        tracing::debug!(
            url,
            success = result.success(),
            duration_ms = timer.finish(),
            "OpenGraph lookup finished"
        );
        result
    }
}

/// Maps an API response body onto a [`ParseResult`].
///
/// Returns an error when `success` is not `true` or `data` is not an object.
/// A relative image is resolved against `target_url`.
pub fn map_api_response(
    body: &serde_json::Value,
    target_url: &str,
) -> Result<ParseResult, MovieMarkError> {
    if body.get("success").and_then(serde_json::Value::as_bool) != Some(true) {
        return Err(MovieMarkError::Api("response did not report success".to_string()));
    }

    let data = body
        .get("data")
        .and_then(serde_json::Value::as_object)
        .ok_or_else(|| MovieMarkError::Api("response has no data object".to_string()))?;

    let title = first_text(data, &TITLE_KEYS);
    let description = first_text(data, &DESCRIPTION_KEYS);
    let image = first_text(data, &IMAGE_KEYS);
    let poster_url = if image.is_empty() {
        String::new()
    } else {
        resolve(image, target_url)
    };

    Ok(ParseResult::new(title, description, poster_url))
}

/// First non-blank string value among `keys`, trimmed.
fn first_text<'a>(data: &'a serde_json::Map<String, serde_json::Value>, keys: &[&str]) -> &'a str {
    keys.iter()
        .filter_map(|key| data.get(*key).and_then(serde_json::Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}
