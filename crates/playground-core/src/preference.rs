//! Durable client-side preference storage.

use crate::error::Result;

/// Preference key holding the selected CDN provider.
pub const CDN_PREFERENCE_KEY: &str = "setting-cdn";

/// Host key-value storage for small user preferences.
///
/// Implementations must survive process restarts (a browser's local storage,
/// a preferences file on disk). Reads return `None` for absent keys.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
