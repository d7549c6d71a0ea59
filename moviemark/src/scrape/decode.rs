//! Lenient byte-to-text decoding for fetched pages.

use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;

/// How many leading bytes are scanned for a `<meta charset>` declaration.
const SNIFF_LIMIT: usize = 1024;

/// Decodes a page body into UTF-8 text.
///
/// The charset comes from the `Content-Type` header, then from a
/// `<meta charset>` (or `http-equiv`) declaration near the top of the
/// document, then defaults to UTF-8. A byte-order mark wins over all of
/// them. Malformed sequences are replaced, never rejected.
#[must_use]
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_from_content_type)
        .or_else(|| sniff_meta_charset(bytes))
        .unwrap_or(UTF_8);

    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!(
            encoding = actual.name(),
            "Replaced malformed byte sequences while decoding page"
        );
    }
    text.into_owned()
}

fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .and_then(|(_, value)| {
            Encoding::for_label(value.trim().trim_matches(|c| c == '"' || c == '\'').as_bytes())
        })
}

fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(SNIFF_LIMIT)];
    let pattern = Regex::new(r#"(?i-u)<meta[^>]+charset\s*=\s*["']?\s*([a-z0-9_\-:.]+)"#).ok()?;
    let label = pattern.captures(head)?.get(1)?;
    Encoding::for_label(label.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_default() {
        let html = "<title>Amélie</title>".as_bytes();
        assert_eq!(decode_html(html, None), "<title>Amélie</title>");
    }

    #[test]
    fn test_charset_from_header() {
        // "Amélie" in windows-1252
        let bytes = b"<title>Am\xe9lie</title>";
        assert_eq!(
            decode_html(bytes, Some("text/html; charset=ISO-8859-1")),
            "<title>Amélie</title>"
        );
    }

    #[test]
    fn test_charset_from_meta_tag() {
        let bytes = b"<html><head><meta charset=\"gbk\"><title>\xb5\xe7\xd3\xb0</title>";
        let text = decode_html(bytes, Some("text/html"));
        assert!(text.contains("<title>电影</title>"), "got {text}");
    }

    #[test]
    fn test_charset_from_http_equiv() {
        let bytes = b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\"><p>caf\xe9</p>";
        assert!(decode_html(bytes, None).contains("café"));
    }

    #[test]
    fn test_malformed_bytes_are_replaced() {
        let bytes = b"<title>bad \xff\xfe byte</title>";
        let text = decode_html(bytes, Some("text/html; charset=utf-8"));
        assert!(text.starts_with("<title>bad "));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_unknown_label_falls_back_to_utf8() {
        let text = decode_html("<p>ok</p>".as_bytes(), Some("text/html; charset=klingon"));
        assert_eq!(text, "<p>ok</p>");
    }
}
