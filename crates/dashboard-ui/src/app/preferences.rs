//! Persistence and environment helpers for the page shell.

use crate::core::config::DashboardConfig;
use crate::core::error::DashboardError;
use crate::core::store::KeyValueStore;
use crate::core::theme::{self, ThemeMode};
use gloo::console;
use gloo::storage::{LocalStorage, Storage as _};
use gloo::utils::{document_element, window};
use js_sys::{JSON, Reflect};
use wasm_bindgen::JsValue;
use web_sys::{Storage, Window};

/// Window property holding optional config overrides.
const CONFIG_GLOBAL: &str = "dashboardConfig";

/// Raw `localStorage`; values are read and written verbatim.
pub(crate) struct BrowserStorage {
    storage: Storage,
}

impl BrowserStorage {
    /// `localStorage` without gloo's JSON encoding layer.
    pub(crate) fn local() -> Self {
        Self {
            storage: LocalStorage::raw(),
        }
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DashboardError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| DashboardError::Dom {
                operation: "storage.setItem",
                detail: format!("{err:?}"),
            })
    }
}

/// Defaults merged with `window.dashboardConfig` when present and valid.
pub(crate) fn load_config(window: &Window) -> DashboardConfig {
    let Ok(raw) = Reflect::get(window, &JsValue::from_str(CONFIG_GLOBAL)) else {
        return DashboardConfig::default();
    };
    if raw.is_undefined() || raw.is_null() {
        return DashboardConfig::default();
    }
    let parsed = JSON::stringify(&raw)
        .ok()
        .and_then(|json| json.as_string())
        .ok_or_else(|| DashboardError::InvalidConfig {
            detail: "override is not serialisable".to_string(),
        })
        .and_then(|json| DashboardConfig::from_json(&json));
    match parsed {
        Ok(config) => config,
        Err(err) => {
            console::warn!("ignoring dashboard config override", err.to_string());
            DashboardConfig::default()
        }
    }
}

pub(crate) fn load_theme(config: &DashboardConfig) -> ThemeMode {
    theme::load_theme(&BrowserStorage::local(), &config.theme_key)
}

pub(crate) fn apply_theme(
    config: &DashboardConfig,
    mode: ThemeMode,
) -> Result<(), DashboardError> {
    document_element()
        .set_attribute(&config.theme_attribute, mode.as_str())
        .map_err(|err| DashboardError::Dom {
            operation: "setAttribute",
            detail: format!("{err:?}"),
        })
}

fn applied_theme(config: &DashboardConfig) -> Option<String> {
    document_element().get_attribute(&config.theme_attribute)
}

/// Flip the applied theme and persist the new preference.
pub(crate) fn toggle_theme(config: &DashboardConfig) {
    let next = ThemeMode::next_from_applied(applied_theme(config).as_deref());
    if let Err(err) = apply_theme(config, next) {
        console::error!("theme apply failed", err.to_string());
    }
    let mut storage = BrowserStorage::local();
    if let Err(err) = theme::persist_theme(&mut storage, &config.theme_key, next) {
        log_storage_error(&config.theme_key, &err);
    }
}

/// Bearer token written by the login flow, if any.
pub(crate) fn load_token(config: &DashboardConfig) -> Option<String> {
    BrowserStorage::local()
        .get(&config.token_key)
        .filter(|token| !token.is_empty())
}

/// Truthiness of the page-level auto-scroll flag.
pub(crate) fn auto_scroll_enabled(config: &DashboardConfig) -> bool {
    let flag = JsValue::from_str(&config.auto_scroll_flag);
    Reflect::get(&window(), &flag).is_ok_and(|value| value.is_truthy())
}

fn log_storage_error(key: &str, err: &DashboardError) {
    let detail = match err {
        DashboardError::Dom { detail, .. } => detail.clone(),
        other => other.to_string(),
    };
    console::error!("storage operation failed", key.to_string(), detail);
}
