//! Testing utilities for the link parser.
//!
//! This module provides:
//! - Mock fetchers, OpenGraph API clients and observers
//! - HTML fixtures
//! - Assertions for parse results

mod assertions;
pub mod fixtures;
mod mocks;

pub use assertions::{assert_parse_failed, assert_parse_succeeded, assert_poster_absolute};
pub use mocks::{FailingExtractor, MockOpenGraphApi, MockPageFetcher, RecordingParseObserver};
