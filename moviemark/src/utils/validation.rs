//! Validation of caller-supplied URLs.

use url::Url;

use crate::errors::UrlValidationError;

/// Checks that `raw` is an absolute `http`/`https` URL with a host.
///
/// Surrounding whitespace is ignored. Returns the parsed URL on success.
pub fn validate_url(raw: &str) -> Result<Url, UrlValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::Malformed(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlValidationError::Malformed(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlValidationError::Malformed("missing host".to_string())),
    }
}
