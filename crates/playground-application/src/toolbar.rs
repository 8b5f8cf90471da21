//! Header actions: version selectors, share link, reset and theme.

use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};

use playground_core::clipboard::Clipboard;
use playground_core::dependency::VersionKey;
use playground_core::location::AddressBar;

use crate::store::SessionStore;

/// Query parameter selecting the initial theme.
pub const THEME_PARAM: &str = "theme";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A transient, non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

pub struct Toolbar {
    store: Arc<SessionStore>,
    theme: RwLock<Theme>,
}

impl Toolbar {
    /// The theme starts from the page's `theme` query parameter.
    pub fn new(store: Arc<SessionStore>, address_bar: &dyn AddressBar) -> Self {
        let theme = address_bar
            .query_param(THEME_PARAM)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        Self {
            store,
            theme: RwLock::new(theme),
        }
    }

    pub fn version(&self, key: VersionKey) -> String {
        self.store.versions().get(key).to_string()
    }

    pub fn set_version(&self, key: VersionKey, version: &str) {
        self.store.set_version(key, version);
    }

    /// Copies the shareable link. Never fails; the outcome is reported as a
    /// notification.
    pub fn copy_link(&self, clipboard: &dyn Clipboard) -> Notification {
        let link = match self.store.share_url() {
            Ok(link) => link,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build share link");
                return Notification::error("Could not create a share link");
            }
        };

        match clipboard.write_text(&link) {
            Ok(()) => Notification::success("Link copied to clipboard"),
            Err(e) => {
                tracing::warn!(error = %e, "Clipboard write failed");
                Notification::error(format!("Could not copy the link: {}", e))
            }
        }
    }

    pub fn reset(&self) {
        self.store.reset_files();
    }

    pub fn theme(&self) -> Theme {
        *self.theme.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn toggle_theme(&self) -> Theme {
        let mut theme = self.theme.write().unwrap_or_else(PoisonError::into_inner);
        *theme = theme.toggled();
        *theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_core::dependency::DependencyResolver;
    use playground_core::session::{ENTRY_FILE, template};
    use playground_infrastructure::{CompressedJsonCodec, MemoryAddressBar, MemoryClipboard};

    fn toolbar(url: &str) -> (Toolbar, Arc<SessionStore>) {
        let resolver = DependencyResolver::default();
        let bar = Arc::new(MemoryAddressBar::new(url));
        let store = Arc::new(SessionStore::mount(
            resolver.clone(),
            Arc::new(CompressedJsonCodec::new(resolver)),
            bar.clone(),
        ));
        (Toolbar::new(store.clone(), bar.as_ref()), store)
    }

    #[test]
    fn test_copy_link() {
        let (toolbar, store) = toolbar("https://play.dev/?theme=dark");
        let clipboard = MemoryClipboard::new();

        let notification = toolbar.copy_link(&clipboard);

        assert_eq!(notification.level, NotificationLevel::Success);
        let link = clipboard.contents().unwrap();
        assert!(link.starts_with("https://play.dev/?theme=dark#"));
        assert!(link.ends_with(&store.serialize().unwrap()));
    }

    #[test]
    fn test_copy_link_denied_is_a_notification() {
        let (toolbar, _) = toolbar("https://play.dev/");
        let notification = toolbar.copy_link(&MemoryClipboard::denied());
        assert_eq!(notification.level, NotificationLevel::Error);
    }

    #[test]
    fn test_theme_from_query_and_toggle() {
        let (dark, _) = toolbar("https://play.dev/?theme=dark");
        assert_eq!(dark.theme(), Theme::Dark);
        assert_eq!(dark.toggle_theme(), Theme::Light);

        let (fallback, _) = toolbar("https://play.dev/?theme=neon");
        assert_eq!(fallback.theme(), Theme::Light);
    }

    #[test]
    fn test_theme_is_not_persisted() {
        let (toolbar, store) = toolbar("https://play.dev/");
        let token = store.serialize().unwrap();
        toolbar.toggle_theme();
        assert_eq!(store.serialize().unwrap(), token);
    }

    #[test]
    fn test_versions_and_reset() {
        let (toolbar, store) = toolbar("https://play.dev/");
        toolbar.set_version(VersionKey::Antd, "5.2.0");
        store.update_file(ENTRY_FILE, "oops");

        toolbar.reset();

        assert_eq!(toolbar.version(VersionKey::Antd), "5.2.0");
        assert_eq!(store.files()[ENTRY_FILE], template::entry_source());
    }
}
