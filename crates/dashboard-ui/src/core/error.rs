//! Error types for the dashboard glue.
//!
//! Browser failures arrive as opaque `JsValue`s; they are rendered to strings at the
//! binding layer so this module stays DOM-free.

use thiserror::Error;

/// Primary error type for dashboard operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// A required element is missing from the page template.
    #[error("page element missing")]
    MissingElement {
        /// Id or selector that failed to resolve.
        id: String,
    },
    /// A DOM operation was rejected by the browser.
    #[error("dom operation failed")]
    Dom {
        /// Operation that failed.
        operation: &'static str,
        /// Rendered browser error.
        detail: String,
    },
    /// A configuration override could not be parsed.
    #[error("invalid dashboard configuration")]
    InvalidConfig {
        /// Parser message.
        detail: String,
    },
    /// Request options supplied by a caller could not be interpreted.
    #[error("invalid request options")]
    InvalidRequestOptions {
        /// Parser message.
        detail: String,
    },
    /// The underlying fetch rejected (network-level failure).
    #[error("fetch failed")]
    Fetch {
        /// Rendered browser error.
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::DashboardError;

    #[test]
    fn messages_are_static() {
        let err = DashboardError::MissingElement {
            id: "confirm-modal".to_string(),
        };
        assert_eq!(err.to_string(), "page element missing");
        let err = DashboardError::Fetch {
            detail: "TypeError: Failed to fetch".to_string(),
        };
        assert_eq!(err.to_string(), "fetch failed");
    }
}
