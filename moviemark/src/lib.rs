//! # Moviemark
//!
//! Link metadata parsing for a personal movie-bookmark manager.
//!
//! Given the URL of a film page, moviemark fills in the bookmark form:
//!
//! - **Page scrape**: fetch the page and read OpenGraph tags, `<title>`,
//!   meta description and the first plausible poster image
//! - **OpenGraph API fallback**: when the page can't be fetched or has no
//!   title, ask an external extraction service instead
//! - **Never fails**: every call yields a [`scrape::ParseResult`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use moviemark::prelude::*;
//!
//! let config = ParserConfig::from_env()?;
//! let parser = MovieParser::from_config(&config)?;
//!
//! let result = parser.parse("https://movies.example.com/film/42").await;
//! if result.success() {
//!     println!("{}", result.title());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod errors;
pub mod observability;
pub mod scrape;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::{MovieMarkError, UrlValidationError};
    pub use crate::observability::{LoggingParseObserver, SpanTimer};
    pub use crate::scrape::{
        resolve, FetchedPage, HtmlMetadataExtractor, MetadataExtractor, MovieInfo, MovieParser,
        OpenGraphApi, PageFetcher, ParseObserver, ParseResult, ParseUrlResponse, ParserConfig,
    };
    #[cfg(feature = "http")]
    pub use crate::scrape::{HttpOpenGraphClient, HttpPageFetcher};
    pub use crate::utils::validate_url;
}
