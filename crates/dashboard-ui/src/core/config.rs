//! Page-level configuration for the dashboard glue.
//!
//! # Design
//! - Every external name (storage keys, element ids, endpoints) lives here so the
//!   browser bindings never hard-code template details.
//! - Overrides are partial: any field missing from the override keeps its default.

use crate::core::error::DashboardError;
use serde::Deserialize;

const EXEC_ID_PLACEHOLDER: &str = "{exec_id}";

/// Names and paths shared with the server-rendered page templates.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Storage key holding the persisted theme preference.
    pub theme_key: String,
    /// Storage key holding the bearer token written by the login flow.
    pub token_key: String,
    /// Attribute on the document root that carries the display mode.
    pub theme_attribute: String,
    /// Page navigated to when the API answers 401.
    pub login_path: String,
    /// Log stream endpoint template; `{exec_id}` is replaced verbatim.
    pub log_stream_template: String,
    /// Selector for the navigation container that receives the theme toggle.
    pub nav_selector: String,
    /// CSS class applied to the injected theme toggle button.
    pub toggle_class: String,
    /// Visible label of the theme toggle button.
    pub toggle_label: String,
    /// Window property read to decide whether log views follow new output.
    pub auto_scroll_flag: String,
    /// Element ids of the confirmation modal.
    pub modal: ModalIds,
}

/// Element ids making up the confirmation modal markup.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModalIds {
    /// Modal root (also the backdrop).
    pub root: String,
    /// Title text element.
    pub title: String,
    /// Message text element.
    pub message: String,
    /// Cancel button.
    pub cancel: String,
    /// Confirm button.
    pub confirm: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            theme_key: "theme".to_string(),
            token_key: "auth_token".to_string(),
            theme_attribute: "data-theme".to_string(),
            login_path: "/login".to_string(),
            log_stream_template: format!("/api/executions/{EXEC_ID_PLACEHOLDER}/log/stream"),
            nav_selector: ".navbar .container".to_string(),
            toggle_class: "theme-toggle".to_string(),
            toggle_label: "\u{1F319}".to_string(),
            auto_scroll_flag: "autoScroll".to_string(),
            modal: ModalIds::default(),
        }
    }
}

impl Default for ModalIds {
    fn default() -> Self {
        Self {
            root: "confirm-modal".to_string(),
            title: "modal-title".to_string(),
            message: "modal-message".to_string(),
            cancel: "modal-cancel".to_string(),
            confirm: "modal-confirm".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidConfig`] when the payload is not a JSON object
    /// matching the config shape.
    pub fn from_json(raw: &str) -> Result<Self, DashboardError> {
        serde_json::from_str(raw).map_err(|err| DashboardError::InvalidConfig {
            detail: err.to_string(),
        })
    }

    /// Log stream path for an execution. The id is inserted as-is.
    #[must_use]
    pub fn log_stream_path(&self, exec_id: &str) -> String {
        self.log_stream_template.replace(EXEC_ID_PLACEHOLDER, exec_id)
    }
}
