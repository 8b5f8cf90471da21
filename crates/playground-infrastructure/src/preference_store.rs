//! [`PreferenceStore`] implementations.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use playground_core::error::{PlaygroundError, Result};
use playground_core::preference::PreferenceStore;

use crate::paths::PlaygroundPaths;
use crate::storage::{AtomicTomlError, AtomicTomlFile};

type Preferences = BTreeMap<String, String>;

impl From<AtomicTomlError> for PlaygroundError {
    fn from(err: AtomicTomlError) -> Self {
        match err {
            AtomicTomlError::Io(e) => PlaygroundError::from(e),
            AtomicTomlError::Parse(e) => PlaygroundError::serialization("TOML", e.to_string()),
            AtomicTomlError::Serialize(e) => PlaygroundError::serialization("TOML", e.to_string()),
            other => PlaygroundError::config(other.to_string()),
        }
    }
}

/// Preferences kept in a flat TOML table of string values.
#[derive(Debug)]
pub struct FilePreferenceStore {
    file: AtomicTomlFile<Preferences>,
}

impl FilePreferenceStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    /// Store at the platform default location.
    pub fn new_default() -> Result<Self> {
        let path = PlaygroundPaths::preferences_file().map_err(|e| PlaygroundError::config(e.to_string()))?;
        Ok(Self::new(path))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let prefs = self.file.load()?.unwrap_or_default();
        Ok(prefs.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.file.update(Preferences::new(), |prefs| {
            prefs.insert(key.to_string(), value.to_string());
        })?;
        tracing::debug!(key, value, path = %self.file.path().display(), "Preference saved");
        Ok(())
    }
}

/// Process-local preferences, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<Preferences>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_core::cdn::{Cdn, CdnSetting};
    use playground_core::preference::CDN_PREFERENCE_KEY;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.toml");

        FilePreferenceStore::new(path.clone()).set(CDN_PREFERENCE_KEY, "unpkg").unwrap();

        let reopened = FilePreferenceStore::new(path);
        assert_eq!(reopened.get(CDN_PREFERENCE_KEY).unwrap().as_deref(), Some("unpkg"));
        assert_eq!(reopened.get("missing").unwrap(), None);
    }

    #[test]
    fn test_cdn_setting_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.toml");

        let setting = CdnSetting::load(Arc::new(FilePreferenceStore::new(path.clone())));
        assert_eq!(setting.get(), Cdn::Jsdelivr);
        setting.set(Cdn::JsdelivrFastly).unwrap();

        let reloaded = CdnSetting::load(Arc::new(FilePreferenceStore::new(path)));
        assert_eq!(reloaded.get(), Cdn::JsdelivrFastly);
    }

    #[test]
    fn test_corrupt_file_surfaces_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.toml");
        std::fs::write(&path, "setting-cdn = ").unwrap();

        let err = FilePreferenceStore::new(path).get(CDN_PREFERENCE_KEY).unwrap_err();
        assert!(err.is_serialization());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
