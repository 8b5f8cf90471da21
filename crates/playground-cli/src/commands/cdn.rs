use anyhow::{Context, Result};
use playground_core::cdn::{Cdn, CdnSetting};
use std::str::FromStr;
use strum::IntoEnumIterator;

use super::host::cdn_setting;

pub fn run(provider: Option<&str>) -> Result<()> {
    let current = select(&cdn_setting(), provider)?;
    for cdn in Cdn::iter() {
        let marker = if cdn == current { "*" } else { " " };
        println!("{} {:<16} {}", marker, cdn.to_string(), cdn.label());
    }
    Ok(())
}

/// Applies `provider`, if given, and returns the provider now in effect.
fn select(setting: &CdnSetting, provider: Option<&str>) -> Result<Cdn> {
    if let Some(raw) = provider {
        let cdn = Cdn::from_str(raw).with_context(|| {
            let known: Vec<String> = Cdn::iter().map(|c| c.to_string()).collect();
            format!("Unknown provider '{}', expected one of: {}", raw, known.join(", "))
        })?;
        setting.set(cdn)?;
    }
    Ok(setting.get())
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_infrastructure::FilePreferenceStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn file_setting(dir: &TempDir) -> CdnSetting {
        CdnSetting::load(Arc::new(FilePreferenceStore::new(
            dir.path().join("preferences.toml"),
        )))
    }

    #[test]
    fn test_selection_survives_restart() {
        let dir = TempDir::new().unwrap();
        assert_eq!(select(&file_setting(&dir), None).unwrap(), Cdn::Jsdelivr);

        assert_eq!(select(&file_setting(&dir), Some("unpkg")).unwrap(), Cdn::Unpkg);

        assert_eq!(select(&file_setting(&dir), None).unwrap(), Cdn::Unpkg);
    }

    #[test]
    fn test_unknown_provider_leaves_preference_untouched() {
        let dir = TempDir::new().unwrap();
        select(&file_setting(&dir), Some("jsdelivr-fastly")).unwrap();

        let err = select(&file_setting(&dir), Some("cloudflare")).unwrap_err();
        assert!(err.to_string().contains("Unknown provider 'cloudflare'"));
        assert_eq!(select(&file_setting(&dir), None).unwrap(), Cdn::JsdelivrFastly);
    }
}
