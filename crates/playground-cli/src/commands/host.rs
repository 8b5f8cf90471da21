//! Headless host wiring shared by the commands.

use std::sync::Arc;

use playground_application::SessionStore;
use playground_core::cdn::{Cdn, CdnSetting};
use playground_core::dependency::DependencyResolver;
use playground_infrastructure::{CompressedJsonCodec, FilePreferenceStore, MemoryAddressBar};

use crate::DEFAULT_BASE_URL;

/// Turns a bare token into a URL on the default page.
pub fn normalize_input(input: &str) -> String {
    let input = input.trim();
    if input.contains("://") {
        input.to_string()
    } else {
        format!("{}#{}", DEFAULT_BASE_URL, input.trim_start_matches('#'))
    }
}

/// The provider preference from the user's configuration directory.
pub fn cdn_setting() -> CdnSetting {
    match FilePreferenceStore::new_default() {
        Ok(store) => CdnSetting::load(Arc::new(store)),
        Err(e) => {
            tracing::warn!(error = %e, "Preferences unavailable, using default CDN");
            CdnSetting::fixed(Cdn::default())
        }
    }
}

pub struct Host {
    pub resolver: DependencyResolver,
    pub address_bar: Arc<MemoryAddressBar>,
    pub store: Arc<SessionStore>,
}

impl Host {
    /// Mounts a session store on `input` (URL or bare token).
    pub fn open(input: &str) -> Self {
        let resolver = DependencyResolver::new(cdn_setting());
        let address_bar = Arc::new(MemoryAddressBar::new(&normalize_input(input)));
        let codec = Arc::new(CompressedJsonCodec::new(resolver.clone()));
        let store = Arc::new(SessionStore::mount(resolver.clone(), codec, address_bar.clone()));
        Self {
            resolver,
            address_bar,
            store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_input() {
        assert_eq!(normalize_input("https://x.dev/#abc"), "https://x.dev/#abc");
        assert_eq!(normalize_input("abc"), "http://localhost:5173/#abc");
        assert_eq!(normalize_input(" #abc "), "http://localhost:5173/#abc");
    }
}
