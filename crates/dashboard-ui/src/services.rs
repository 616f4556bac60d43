//! Browser transport helpers: authenticated fetch and log streaming.

pub mod api;
pub mod log_stream;
