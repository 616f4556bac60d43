//! Persistent key-value storage seam.
//!
//! # Design
//! - Values are plain strings; nothing is JSON-encoded, so entries written by other
//!   page scripts (the login flow writes the token) stay readable.
//! - The browser implementation lives with the wasm bindings; [`MemoryStore`] backs
//!   native tests.

use crate::core::error::DashboardError;
use std::collections::HashMap;

/// Synchronous string key-value store surviving page reloads.
pub trait KeyValueStore {
    /// Read a value, `None` when the key is unset or storage is unreachable.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, overwriting any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage rejects the write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), DashboardError>;
}

/// In-memory store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Store pre-populated with a single entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), value.to_string());
        Self { entries }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DashboardError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
