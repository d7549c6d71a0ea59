//! Test assertions for parse results.

use crate::scrape::ParseResult;

/// Asserts that a title was detected.
pub fn assert_parse_succeeded(result: &ParseResult) {
    assert!(
        result.success(),
        "Expected a successful parse, got: {result:?}"
    );
    assert!(
        !result.title().is_empty(),
        "Successful parse must carry a title, got: {result:?}"
    );
}

/// Asserts that nothing usable was detected.
pub fn assert_parse_failed(result: &ParseResult) {
    assert!(
        !result.success(),
        "Expected a failed parse, got: {result:?}"
    );
}

/// Asserts the poster URL is absolute.
pub fn assert_poster_absolute(result: &ParseResult) {
    let poster = result.poster_url();
    assert!(
        poster.starts_with("http://") || poster.starts_with("https://"),
        "Expected an absolute poster URL, got '{poster}'"
    );
}
