#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
// `pub(crate)` inside the private `app` module keeps `unreachable_pub` satisfied.
#![allow(clippy::redundant_pub_crate)]
//! Dashboard page glue.
//!
//! Theme persistence, an authenticated fetch helper, the execution log streamer and the
//! shared confirmation modal. The DOM-free state lives in [`core`]; browser bindings are
//! only compiled for wasm32.

pub mod core;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
pub mod components;
#[cfg(target_arch = "wasm32")]
pub mod services;

#[cfg(target_arch = "wasm32")]
pub use app::run_app;
