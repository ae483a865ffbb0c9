//! User preferences of the matrix view.
//!
//! Values are kept as raw strings behind a [`SettingsStore`]; typed
//! helpers parse them back and ignore anything malformed.

use std::collections::HashMap;

/// Key of the selected mode index.
pub const MATRIX_MODE_OPTION_INDEX: &str = "MATRIX_MODE_OPTION_INDEX";
/// Key of the contrast setting.
pub const SETTING_MATRIX_CONTRAST: &str = "SETTING_MATRIX_CONTRAST";

/// Raw string key-value storage.
pub trait SettingsStore {
    /// Raw value of a key.
    fn get_raw(&self, key: &str) -> Option<String>;

    /// Store a raw value.
    fn set_raw(&mut self, key: &str, value: String);
}

/// In-memory store, lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_raw(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

/// Stored mode index.
pub fn load_mode_index(store: &dyn SettingsStore) -> Option<usize> {
    store.get_raw(MATRIX_MODE_OPTION_INDEX)?.parse().ok()
}

/// Store the mode index.
pub fn save_mode_index(store: &mut dyn SettingsStore, index: usize) {
    store.set_raw(MATRIX_MODE_OPTION_INDEX, index.to_string());
}

/// Stored contrast, clamped to `[0, 100]`.
pub fn load_contrast(store: &dyn SettingsStore) -> Option<f64> {
    let value: f64 = store.get_raw(SETTING_MATRIX_CONTRAST)?.parse().ok()?;
    value.is_finite().then(|| value.clamp(0.0, 100.0))
}

/// Store the contrast.
pub fn save_contrast(store: &mut dyn SettingsStore, contrast: f64) {
    store.set_raw(SETTING_MATRIX_CONTRAST, contrast.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(load_mode_index(&store), None);
        save_mode_index(&mut store, 3);
        save_contrast(&mut store, 45.0);
        assert_eq!(load_mode_index(&store), Some(3));
        assert_eq!(load_contrast(&store), Some(45.0));
    }

    #[test]
    fn test_malformed_values_are_ignored() {
        let mut store = MemoryStore::new();
        store.set_raw(MATRIX_MODE_OPTION_INDEX, "three".into());
        store.set_raw(SETTING_MATRIX_CONTRAST, "NaN".into());
        assert_eq!(load_mode_index(&store), None);
        assert_eq!(load_contrast(&store), None);
        store.set_raw(SETTING_MATRIX_CONTRAST, "250".into());
        assert_eq!(load_contrast(&store), Some(100.0));
    }
}
