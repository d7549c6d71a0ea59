//! Link metadata scraping.
//!
//! This module provides:
//! - The parse result model and the JSON request envelope
//! - URL resolution for relative image links
//! - Title/description/poster extraction from HTML
//! - HTTP fetching and the OpenGraph API fallback
//! - The [`MovieParser`] that ties them together

mod config;
mod decode;
mod extract;
#[cfg(feature = "http")]
mod fetch;
pub(crate) mod models;
#[cfg(feature = "http")]
mod opengraph;
mod parser;
mod protocols;
mod resolve;

pub use config::{
    ParserConfig, ENV_ACCEPT_INVALID_CERTS, ENV_API_TIMEOUT, ENV_OPENGRAPH_API_URL, ENV_PROXY,
    ENV_TIMEOUT, ENV_USER_AGENT,
};
pub use decode::decode_html;
pub use extract::{parse_lenient, strip_title_suffix, title_from_url, HtmlMetadataExtractor};
#[cfg(feature = "http")]
pub use fetch::HttpPageFetcher;
pub use models::{
    MovieInfo, ParseResult, ParseUrlResponse, MSG_EMPTY_URL, MSG_INVALID_URL, MSG_NOT_DETECTED,
};
#[cfg(feature = "http")]
pub use opengraph::{map_api_response, HttpOpenGraphClient};
pub use parser::MovieParser;
pub use protocols::{
    FallbackReason, FetchedPage, MetadataExtractor, NoOpParseObserver, OpenGraphApi, PageFetcher,
    ParseObserver,
};
pub use resolve::resolve;
