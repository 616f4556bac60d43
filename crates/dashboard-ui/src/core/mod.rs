//! Core, DOM-free primitives for the dashboard glue.
pub mod auth;
pub mod config;
pub mod error;
pub mod log_stream;
pub mod modal;
pub mod store;
pub mod theme;
