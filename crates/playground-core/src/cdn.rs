//! CDN providers and URL resolution.
//!
//! Each provider exposes npm packages under its own public URL scheme. URL
//! construction is pure string building and cannot fail; the provider choice
//! is process-wide configuration held by [`CdnSetting`].

use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::Result;
use crate::preference::{CDN_PREFERENCE_KEY, PreferenceStore};

/// Version sentinel resolved to the provider's "latest" alias.
pub const LATEST: &str = "latest";

/// Supported CDN providers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Cdn {
    #[default]
    Jsdelivr,
    JsdelivrFastly,
    Unpkg,
}

impl Cdn {
    /// Human readable label for settings surfaces.
    pub fn label(&self) -> &'static str {
        match self {
            Cdn::Jsdelivr => "jsDelivr",
            Cdn::JsdelivrFastly => "jsDelivr Fastly",
            Cdn::Unpkg => "unpkg",
        }
    }
}

/// Builds the public URL of `path` inside `package` on the given provider.
///
/// A missing, empty or `latest` version omits the `@version` segment so the
/// provider serves its latest release.
pub fn resolve_url(package: &str, version: Option<&str>, path: &str, cdn: Cdn) -> String {
    let version = match version {
        Some(v) if !v.is_empty() && v != LATEST => format!("@{}", v),
        _ => String::new(),
    };

    match cdn {
        Cdn::Jsdelivr => format!("https://cdn.jsdelivr.net/npm/{package}{version}{path}"),
        Cdn::JsdelivrFastly => format!("https://fastly.jsdelivr.net/npm/{package}{version}{path}"),
        Cdn::Unpkg => format!("https://unpkg.com/{package}{version}{path}"),
    }
}

/// Process-wide CDN provider preference.
///
/// Read once from durable storage by [`CdnSetting::load`] and written back on
/// every [`CdnSetting::set`]. Clones share the same underlying value, so a
/// change is visible to every resolver holding this setting.
#[derive(Clone)]
pub struct CdnSetting {
    current: Arc<RwLock<Cdn>>,
    store: Option<Arc<dyn PreferenceStore>>,
}

impl CdnSetting {
    /// Creates a setting that is not backed by durable storage.
    pub fn fixed(cdn: Cdn) -> Self {
        Self {
            current: Arc::new(RwLock::new(cdn)),
            store: None,
        }
    }

    /// Reads the stored provider, falling back to the default provider when the
    /// preference is absent, invalid or unreadable.
    pub fn load(store: Arc<dyn PreferenceStore>) -> Self {
        let cdn = match store.get(CDN_PREFERENCE_KEY) {
            Ok(Some(raw)) => Cdn::from_str(raw.trim()).unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Ignoring invalid CDN preference");
                Cdn::default()
            }),
            Ok(None) => Cdn::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read CDN preference");
                Cdn::default()
            }
        };

        tracing::debug!(cdn = %cdn, "Loaded CDN preference");

        Self {
            current: Arc::new(RwLock::new(cdn)),
            store: Some(store),
        }
    }

    /// Returns the provider used for new resolutions.
    pub fn get(&self) -> Cdn {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switches provider and persists the choice.
    ///
    /// The in-memory value changes even if persisting fails; the error is
    /// returned so the host can surface it.
    pub fn set(&self, cdn: Cdn) -> Result<()> {
        {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            *current = cdn;
        }
        tracing::info!(cdn = %cdn, "CDN provider changed");

        match &self.store {
            Some(store) => store.set(CDN_PREFERENCE_KEY, cdn.as_ref()),
            None => Ok(()),
        }
    }
}

impl Default for CdnSetting {
    fn default() -> Self {
        Self::fixed(Cdn::default())
    }
}

impl std::fmt::Debug for CdnSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdnSetting")
            .field("current", &self.get())
            .field("persistent", &self.store.is_some())
            .finish()
    }
}
