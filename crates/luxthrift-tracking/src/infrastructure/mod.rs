//! Sinks and session state used by the activity tracker.

pub mod http_sink;
pub mod ingestion_sink;
pub mod session;
