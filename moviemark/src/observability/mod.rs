//! Observability utilities.

mod logging;

pub use logging::{parse_event_payload, LoggingParseObserver, SpanTimer};
