//! Utility functions.

mod validation;

pub use validation::validate_url;
