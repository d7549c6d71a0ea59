//! Title, description and poster extraction from HTML.

use scraper::{Html, Selector};
use url::Url;

use super::models::ParseResult;
use super::protocols::MetadataExtractor;
use super::resolve::resolve;
use crate::errors::MovieMarkError;

/// Title separators; everything from the first one onward is site branding.
const TITLE_SUFFIX_DELIMITERS: [&str; 2] = [" - ", " | "];

/// Substrings that mark an `<img>` as site chrome rather than a poster.
const NON_POSTER_MARKERS: [&str; 2] = ["icon", "logo"];

/// Extracts bookmark metadata with OpenGraph tags first and page markup second.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlMetadataExtractor;

impl HtmlMetadataExtractor {
    /// Creates a new extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MetadataExtractor for HtmlMetadataExtractor {
    fn extract(&self, html: &str, page_url: &str) -> Result<ParseResult, MovieMarkError> {
        let document = parse_lenient(html);
        let selectors = Selectors::compile()?;

        let title = extract_title(&document, &selectors, page_url);
        let description = extract_description(&document, &selectors);
        let poster_url = extract_poster(&document, &selectors, page_url);

        Ok(ParseResult::new(title, description, poster_url))
    }
}

/// Parses `html` without ever failing; parse diagnostics are dropped.
#[must_use]
pub fn parse_lenient(html: &str) -> Html {
    let mut document = Html::parse_document(html);
    if !document.errors.is_empty() {
        tracing::trace!(count = document.errors.len(), "Ignoring HTML parse errors");
        document.errors.clear();
    }
    document
}

struct Selectors {
    og_title: Selector,
    title: Selector,
    og_description: Selector,
    meta_description: Selector,
    og_image: Selector,
    image: Selector,
}

impl Selectors {
    fn compile() -> Result<Self, MovieMarkError> {
        Ok(Self {
            og_title: selector(r#"meta[property="og:title"][content]"#)?,
            title: selector("title")?,
            og_description: selector(r#"meta[property="og:description"][content]"#)?,
            meta_description: selector(r#"meta[name="description"][content]"#)?,
            og_image: selector(r#"meta[property="og:image"][content]"#)?,
            image: selector("img[src]")?,
        })
    }
}

fn selector(css: &str) -> Result<Selector, MovieMarkError> {
    Selector::parse(css)
        .map_err(|e| MovieMarkError::Extraction(format!("invalid selector '{css}': {e:?}")))
}

fn first_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
}

fn extract_title(document: &Html, selectors: &Selectors, page_url: &str) -> String {
    if let Some(title) = first_content(document, &selectors.og_title) {
        return title;
    }

    if let Some(element) = document.select(&selectors.title).next() {
        let text = element.text().collect::<String>();
        return strip_title_suffix(text.trim()).to_string();
    }

    title_from_url(page_url)
}

/// Drops a trailing `" - Site"` or `" | Site"` from a page title.
#[must_use]
pub fn strip_title_suffix(title: &str) -> &str {
    TITLE_SUFFIX_DELIMITERS
        .iter()
        .filter_map(|delim| title.find(delim))
        .min()
        .map_or(title, |idx| &title[..idx])
}

/// Builds a title from the last path segment, e.g. `/films/the-big_sleep`
/// gives `The big sleep`. Empty when the URL has no path segments.
#[must_use]
pub fn title_from_url(page_url: &str) -> String {
    let Ok(url) = Url::parse(page_url) else {
        return String::new();
    };

    let last = url
        .path()
        .trim_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .replace(['-', '_'], " ");

    let mut chars = last.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>().trim().to_string(),
        None => String::new(),
    }
}

fn extract_description(document: &Html, selectors: &Selectors) -> String {
    first_content(document, &selectors.og_description)
        .or_else(|| first_content(document, &selectors.meta_description))
        .unwrap_or_default()
}

fn extract_poster(document: &Html, selectors: &Selectors, page_url: &str) -> String {
    if let Some(image) = first_content(document, &selectors.og_image) {
        return resolve(&image, page_url);
    }

    document
        .select(&selectors.image)
        .filter_map(|img| img.value().attr("src"))
        .map(str::trim)
        .find(|src| is_poster_candidate(src))
        .map(|src| resolve(src, page_url))
        .unwrap_or_default()
}

fn is_poster_candidate(src: &str) -> bool {
    !src.is_empty() && !NON_POSTER_MARKERS.iter().any(|marker| src.contains(marker))
}
