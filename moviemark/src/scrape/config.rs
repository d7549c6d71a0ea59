//! Configuration for the link parser.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::MovieMarkError;

/// Environment variable overriding [`ParserConfig::opengraph_api_url`].
pub const ENV_OPENGRAPH_API_URL: &str = "OPENGRAPH_API_URL";
/// Environment variable overriding [`ParserConfig::proxy`]. Empty disables the proxy.
pub const ENV_PROXY: &str = "HTTP_PROXY";
/// Environment variable overriding [`ParserConfig::timeout_seconds`].
pub const ENV_TIMEOUT: &str = "PARSER_TIMEOUT";
/// Environment variable overriding [`ParserConfig::api_timeout_seconds`].
pub const ENV_API_TIMEOUT: &str = "PARSER_API_TIMEOUT";
/// Environment variable overriding [`ParserConfig::user_agent`].
pub const ENV_USER_AGENT: &str = "PARSER_USER_AGENT";
/// Environment variable overriding [`ParserConfig::accept_invalid_certs`].
pub const ENV_ACCEPT_INVALID_CERTS: &str = "PARSER_ACCEPT_INVALID_CERTS";

/// Configuration shared by the page fetcher and the OpenGraph API client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Base URL of the OpenGraph extraction API used as a fallback.
    #[serde(default = "default_opengraph_api_url")]
    pub opengraph_api_url: String,
    /// Forward proxy as `scheme://host:port`, or `None` for direct connections.
    #[serde(default = "default_proxy")]
    pub proxy: Option<String>,
    /// Page fetch timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// OpenGraph API timeout in seconds.
    #[serde(default = "default_api_timeout")]
    pub api_timeout_seconds: f64,
    /// User agent sent with the page request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Skip TLS certificate and hostname checks on both outbound calls.
    #[serde(default)]
    pub accept_invalid_certs: bool,
    /// Maximum page body size in bytes.
    #[serde(default = "default_max_size")]
    pub max_response_size: usize,
}

fn default_opengraph_api_url() -> String {
    "http://localhost:8007/opengraph".to_string()
}

#[allow(clippy::unnecessary_wraps)]
fn default_proxy() -> Option<String> {
    Some("http://127.0.0.1:7890".to_string())
}

fn default_timeout() -> f64 {
    10.0
}

fn default_api_timeout() -> f64 {
    15.0
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_max_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            opengraph_api_url: default_opengraph_api_url(),
            proxy: default_proxy(),
            timeout_seconds: default_timeout(),
            api_timeout_seconds: default_api_timeout(),
            user_agent: default_user_agent(),
            accept_invalid_certs: false,
            max_response_size: default_max_size(),
        }
    }
}

impl ParserConfig {
    /// Creates a new parser configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from defaults overridden by environment variables.
    pub fn from_env() -> Result<Self, MovieMarkError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from defaults overridden by `lookup`.
    ///
    /// `lookup` returns the raw value for an environment key, if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MovieMarkError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_OPENGRAPH_API_URL).filter(|v| !v.trim().is_empty()) {
            config.opengraph_api_url = url.trim().to_string();
        }
        if let Some(proxy) = lookup(ENV_PROXY) {
            let proxy = proxy.trim();
            config.proxy = (!proxy.is_empty()).then(|| proxy.to_string());
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            config.timeout_seconds = parse_seconds(ENV_TIMEOUT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_API_TIMEOUT) {
            config.api_timeout_seconds = parse_seconds(ENV_API_TIMEOUT, &raw)?;
        }
        if let Some(agent) = lookup(ENV_USER_AGENT).filter(|v| !v.trim().is_empty()) {
            config.user_agent = agent;
        }
        if let Some(raw) = lookup(ENV_ACCEPT_INVALID_CERTS) {
            config.accept_invalid_certs = parse_flag(ENV_ACCEPT_INVALID_CERTS, &raw)?;
        }

        Ok(config)
    }

    /// Sets the OpenGraph API base URL.
    #[must_use]
    pub fn with_opengraph_api_url(mut self, url: impl Into<String>) -> Self {
        self.opengraph_api_url = url.into();
        self
    }

    /// Sets the forward proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Disables the forward proxy.
    #[must_use]
    pub fn without_proxy(mut self) -> Self {
        self.proxy = None;
        self
    }

    /// Sets the page fetch timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the OpenGraph API timeout.
    #[must_use]
    pub fn with_api_timeout(mut self, seconds: f64) -> Self {
        self.api_timeout_seconds = seconds;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Turns off TLS certificate and hostname verification for both calls.
    #[must_use]
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Sets the maximum page body size.
    #[must_use]
    pub fn with_max_response_size(mut self, bytes: usize) -> Self {
        self.max_response_size = bytes;
        self
    }

    /// Checks the values the builders cannot reject on their own.
    pub fn validate(&self) -> Result<(), MovieMarkError> {
        positive_seconds("timeout_seconds", self.timeout_seconds)?;
        positive_seconds("api_timeout_seconds", self.api_timeout_seconds)?;
        if self.max_response_size == 0 {
            return Err(MovieMarkError::Config(
                "max_response_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Gets the page fetch timeout as Duration.
    ///
    /// Values that fail [`Self::validate`] fall back to the default.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        seconds_or(self.timeout_seconds, default_timeout())
    }

    /// Gets the OpenGraph API timeout as Duration.
    #[must_use]
    pub fn api_timeout(&self) -> Duration {
        seconds_or(self.api_timeout_seconds, default_api_timeout())
    }

    /// Returns the proxy address in the form the HTTP client connects with.
    ///
    /// `tcp://` means a plain TCP connection to the proxy, which is what the
    /// client does for `http://` proxies, so it is rewritten to that.
    pub fn proxy_transport_url(&self) -> Result<Option<String>, MovieMarkError> {
        let Some(proxy) = self.proxy.as_deref() else {
            return Ok(None);
        };

        let (scheme, rest) = proxy
            .split_once("://")
            .ok_or_else(|| MovieMarkError::Config(format!("proxy '{proxy}' has no scheme")))?;
        if rest.is_empty() {
            return Err(MovieMarkError::Config(format!("proxy '{proxy}' has no address")));
        }

        match scheme.to_ascii_lowercase().as_str() {
            "http" | "tcp" => Ok(Some(format!("http://{rest}"))),
            "https" => Ok(Some(format!("https://{rest}"))),
            other => Err(MovieMarkError::Config(format!(
                "unsupported proxy scheme '{other}'"
            ))),
        }
    }
}

fn seconds_or(seconds: f64, fallback: f64) -> Duration {
    let seconds = positive_seconds("timeout", seconds).unwrap_or(fallback);
    Duration::from_secs_f64(seconds)
}

fn positive_seconds(key: &str, seconds: f64) -> Result<f64, MovieMarkError> {
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err(MovieMarkError::Config(format!(
            "{key} must be a positive number of seconds, got {seconds}"
        )))
    }
}

fn parse_seconds(key: &str, raw: &str) -> Result<f64, MovieMarkError> {
    let seconds: f64 = raw
        .trim()
        .parse()
        .map_err(|_| MovieMarkError::Config(format!("{key} must be a number, got '{raw}'")))?;
    positive_seconds(key, seconds)
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, MovieMarkError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(MovieMarkError::Config(format!(
            "{key} must be a boolean, got '{raw}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parser_config_defaults() {
        let config = ParserConfig::default();
        assert_eq!(config.opengraph_api_url, "http://localhost:8007/opengraph");
        assert_eq!(config.proxy.as_deref(), Some("http://127.0.0.1:7890"));
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.api_timeout(), Duration::from_secs(15));
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn test_parser_config_builder() {
        let config = ParserConfig::new()
            .with_opengraph_api_url("http://og.internal/api")
            .without_proxy()
            .with_timeout(2.5)
            .with_api_timeout(4.0)
            .with_user_agent("moviemark-test")
            .accept_invalid_certs(true);

        assert_eq!(config.opengraph_api_url, "http://og.internal/api");
        assert_eq!(config.proxy, None);
        assert_eq!(config.timeout(), Duration::from_millis(2500));
        assert_eq!(config.api_timeout_seconds, 4.0);
        assert_eq!(config.user_agent, "moviemark-test");
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ParserConfig::from_lookup(lookup_from(&[
            (ENV_OPENGRAPH_API_URL, "http://og:9000/opengraph"),
            (ENV_PROXY, "http://10.0.0.1:3128"),
            (ENV_TIMEOUT, "3"),
            (ENV_API_TIMEOUT, "7.5"),
            (ENV_ACCEPT_INVALID_CERTS, "true"),
        ]))
        .unwrap();

        assert_eq!(config.opengraph_api_url, "http://og:9000/opengraph");
        assert_eq!(config.proxy.as_deref(), Some("http://10.0.0.1:3128"));
        assert_eq!(config.timeout_seconds, 3.0);
        assert_eq!(config.api_timeout_seconds, 7.5);
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn test_from_lookup_empty_proxy_disables() {
        let config = ParserConfig::from_lookup(lookup_from(&[(ENV_PROXY, "")])).unwrap();
        assert_eq!(config.proxy, None);
    }

    #[test]
    fn test_from_lookup_nothing_set_is_default() {
        let config = ParserConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ParserConfig::default());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = ParserConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT, "soon")])).unwrap_err();
        assert!(matches!(err, MovieMarkError::Config(_)));

        let err = ParserConfig::from_lookup(lookup_from(&[(ENV_API_TIMEOUT, "-1")])).unwrap_err();
        assert!(matches!(err, MovieMarkError::Config(_)));

        let err =
            ParserConfig::from_lookup(lookup_from(&[(ENV_ACCEPT_INVALID_CERTS, "maybe")])).unwrap_err();
        assert!(matches!(err, MovieMarkError::Config(_)));
    }

    #[test]
    fn test_proxy_transport_url() {
        let config = ParserConfig::new().with_proxy("tcp://127.0.0.1:7890");
        assert_eq!(
            config.proxy_transport_url().unwrap().as_deref(),
            Some("http://127.0.0.1:7890")
        );

        let config = ParserConfig::new().with_proxy("http://proxy:8080");
        assert_eq!(
            config.proxy_transport_url().unwrap().as_deref(),
            Some("http://proxy:8080")
        );

        assert_eq!(ParserConfig::new().without_proxy().proxy_transport_url().unwrap(), None);
    }

    #[test]
    fn test_proxy_transport_url_rejects_garbage() {
        assert!(ParserConfig::new().with_proxy("127.0.0.1:7890").proxy_transport_url().is_err());
        assert!(ParserConfig::new().with_proxy("ftp://proxy:21").proxy_transport_url().is_err());
        assert!(ParserConfig::new().with_proxy("http://").proxy_transport_url().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_timeouts() {
        assert!(ParserConfig::new().validate().is_ok());

        let err = ParserConfig::new().with_timeout(0.0).validate().unwrap_err();
        assert!(matches!(err, MovieMarkError::Config(_)));
        assert!(ParserConfig::new().with_api_timeout(-3.0).validate().is_err());
        assert!(ParserConfig::new().with_timeout(f64::NAN).validate().is_err());
        assert!(ParserConfig::new().with_max_response_size(0).validate().is_err());
    }

    #[test]
    fn test_zero_timeout_duration_falls_back_to_default() {
        let config = ParserConfig::new().with_timeout(0.0).with_api_timeout(-1.0);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.api_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: ParserConfig = serde_json::from_str(r#"{"timeout_seconds": 5}"#).unwrap();
        assert_eq!(config.timeout_seconds, 5.0);
        assert_eq!(config.api_timeout_seconds, 15.0);
        assert_eq!(config.proxy.as_deref(), Some("http://127.0.0.1:7890"));
    }
}
