//! Display mode preference.

use crate::core::error::DashboardError;
use crate::core::store::KeyValueStore;

/// Light or dark theme preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
    /// Light theme mode.
    #[default]
    Light,
    /// Dark theme mode.
    Dark,
}

impl ThemeMode {
    /// String identifier used in the root attribute and in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a stored value. Anything unrecognised falls back to [`ThemeMode::Light`].
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    /// Mode to switch to given the attribute currently applied to the document root.
    ///
    /// Only an applied `light` flips to dark; a missing or foreign value resets to light.
    #[must_use]
    pub fn next_from_applied(applied: Option<&str>) -> Self {
        match applied {
            Some("light") => Self::Dark,
            _ => Self::Light,
        }
    }
}

/// Read the persisted preference, defaulting to light.
#[must_use]
pub fn load_theme(store: &impl KeyValueStore, key: &str) -> ThemeMode {
    ThemeMode::parse(store.get(key).as_deref())
}

/// Persist a preference.
///
/// # Errors
///
/// Propagates the store's write failure.
pub fn persist_theme(
    store: &mut impl KeyValueStore,
    key: &str,
    mode: ThemeMode,
) -> Result<(), DashboardError> {
    store.set(key, mode.as_str())
}
