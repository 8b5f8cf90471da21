//! Dependency descriptors, selected versions and the dependency resolver.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::cdn::{Cdn, CdnSetting, resolve_url};
use crate::import_map::ImportMap;

// ============================================================================
// Well-known packages
// ============================================================================

pub const REACT: &str = "react";
pub const REACT_DOM: &str = "react-dom";
pub const ANTD: &str = "antd";
pub const ICONS: &str = "@ant-design/icons";
pub const DAYJS: &str = "dayjs";
pub const BABEL: &str = "@babel/standalone";

pub const REACT_PATH: &str = "/umd/react.production.min.js";
pub const REACT_DOM_PATH: &str = "/umd/react-dom.production.min.js";
pub const ANTD_PATH: &str = "/dist/antd.min.js";
pub const ANTD_STYLE_PATH: &str = "/dist/reset.min.css";
pub const ICONS_PATH: &str = "/dist/index.umd.min.js";
pub const DAYJS_PATH: &str = "/dayjs.min.js";
pub const BABEL_PATH: &str = "/babel.min.js";

pub const DEFAULT_REACT_VERSION: &str = "18.3.1";
pub const DEFAULT_ANTD_VERSION: &str = "5.27.5";
pub const DEFAULT_TYPESCRIPT_VERSION: &str = "5.8.3";
pub const ICONS_VERSION: &str = "5.5.1";
pub const DAYJS_VERSION: &str = "1.11.18";
pub const BABEL_VERSION: &str = "7.26.7";

/// The version slots a session tracks.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VersionKey {
    React,
    Antd,
    Typescript,
}

impl VersionKey {
    /// Registry package whose releases populate this slot's version picker.
    pub fn package(&self) -> &'static str {
        match self {
            VersionKey::React => REACT,
            VersionKey::Antd => ANTD,
            VersionKey::Typescript => "typescript",
        }
    }

    /// Import map specifiers regenerated when this slot changes.
    pub fn owned_specifiers(&self) -> &'static [&'static str] {
        match self {
            VersionKey::React => &[REACT, REACT_DOM],
            VersionKey::Antd => &[ANTD],
            VersionKey::Typescript => &[],
        }
    }
}

/// Selected versions; each is a semver string or `latest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versions {
    pub react: String,
    pub antd: String,
    pub typescript: String,
}

impl Versions {
    pub fn get(&self, key: VersionKey) -> &str {
        match key {
            VersionKey::React => &self.react,
            VersionKey::Antd => &self.antd,
            VersionKey::Typescript => &self.typescript,
        }
    }

    /// Returns a copy with one slot replaced.
    pub fn with(&self, key: VersionKey, version: impl Into<String>) -> Self {
        let mut next = self.clone();
        let version = version.into();
        match key {
            VersionKey::React => next.react = version,
            VersionKey::Antd => next.antd = version,
            VersionKey::Typescript => next.typescript = version,
        }
        next
    }
}

impl Default for Versions {
    fn default() -> Self {
        Self {
            react: DEFAULT_REACT_VERSION.to_string(),
            antd: DEFAULT_ANTD_VERSION.to_string(),
            typescript: DEFAULT_TYPESCRIPT_VERSION.to_string(),
        }
    }
}

/// A package file on the CDN: name, optional version, path inside the package.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyDescriptor {
    pub package: String,
    pub version: Option<String>,
    pub path: String,
}

impl DependencyDescriptor {
    pub fn new(package: impl Into<String>, version: Option<&str>, path: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            version: version.map(str::to_string),
            path: path.into(),
        }
    }

    pub fn url(&self, cdn: Cdn) -> String {
        resolve_url(&self.package, self.version.as_deref(), &self.path, cdn)
    }
}

/// Resolves dependency descriptors against the current CDN provider.
#[derive(Debug, Clone, Default)]
pub struct DependencyResolver {
    cdn: CdnSetting,
}

impl DependencyResolver {
    pub fn new(cdn: CdnSetting) -> Self {
        Self { cdn }
    }

    pub fn cdn(&self) -> &CdnSetting {
        &self.cdn
    }

    pub fn resolve(&self, descriptor: &DependencyDescriptor) -> String {
        descriptor.url(self.cdn.get())
    }

    pub fn resolve_url(&self, package: &str, version: Option<&str>, path: &str) -> String {
        resolve_url(package, version, path, self.cdn.get())
    }

    /// The complete default import map for a session.
    pub fn default_import_map(&self, versions: &Versions) -> ImportMap {
        let mut map = self.entries_for(VersionKey::React, &versions.react);
        map.merge(self.entries_for(VersionKey::Antd, &versions.antd));
        map.insert(ICONS, self.resolve_url(ICONS, Some(ICONS_VERSION), ICONS_PATH));
        map
    }

    /// Only the import map entries owned by `key`, resolved for `version`.
    pub fn entries_for(&self, key: VersionKey, version: &str) -> ImportMap {
        let mut map = ImportMap::new();
        match key {
            VersionKey::React => {
                map.insert(REACT, self.resolve_url(REACT, Some(version), REACT_PATH));
                map.insert(REACT_DOM, self.resolve_url(REACT_DOM, Some(version), REACT_DOM_PATH));
            }
            VersionKey::Antd => {
                map.insert(ANTD, self.resolve_url(ANTD, Some(version), ANTD_PATH));
            }
            VersionKey::Typescript => {}
        }
        map
    }

    /// Date library peer required by the component library bundle.
    pub fn dayjs_url(&self) -> String {
        self.resolve_url(DAYJS, Some(DAYJS_VERSION), DAYJS_PATH)
    }

    /// The in-page runtime transpiler.
    pub fn transpiler_url(&self) -> String {
        self.resolve_url(BABEL, Some(BABEL_VERSION), BABEL_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(cdn: Cdn) -> DependencyResolver {
        DependencyResolver::new(CdnSetting::fixed(cdn))
    }

    #[test]
    fn test_default_import_map_order_and_versions() {
        let map = resolver(Cdn::Jsdelivr).default_import_map(&Versions::default());

        assert_eq!(
            map.specifiers().collect::<Vec<_>>(),
            vec![REACT, REACT_DOM, ANTD, ICONS]
        );
        assert_eq!(
            map.get(REACT),
            Some("https://cdn.jsdelivr.net/npm/react@18.3.1/umd/react.production.min.js")
        );
        assert_eq!(
            map.get(ANTD),
            Some("https://cdn.jsdelivr.net/npm/antd@5.27.5/dist/antd.min.js")
        );
    }

    #[test]
    fn test_entries_for_is_scoped_to_key() {
        let r = resolver(Cdn::Unpkg);
        assert_eq!(r.entries_for(VersionKey::React, "18.2.0").len(), 2);
        assert_eq!(
            r.entries_for(VersionKey::Antd, "5.1.0").specifiers().collect::<Vec<_>>(),
            vec![ANTD]
        );
        assert!(r.entries_for(VersionKey::Typescript, "5.0.0").is_empty());
    }

    #[test]
    fn test_provider_change_applies_to_new_resolutions_only() {
        let setting = CdnSetting::fixed(Cdn::Jsdelivr);
        let r = DependencyResolver::new(setting.clone());
        let before = r.default_import_map(&Versions::default());

        setting.set(Cdn::Unpkg).unwrap();
        let after = r.default_import_map(&Versions::default());

        assert!(before.get(REACT).unwrap().starts_with("https://cdn.jsdelivr.net/"));
        assert!(after.get(REACT).unwrap().starts_with("https://unpkg.com/"));
    }

    #[test]
    fn test_versions_with_and_key_strings() {
        let v = Versions::default().with(VersionKey::Antd, "5.0.0");
        assert_eq!(v.get(VersionKey::Antd), "5.0.0");
        assert_eq!(v.react, DEFAULT_REACT_VERSION);
        assert_eq!("typescript".parse::<VersionKey>().unwrap(), VersionKey::Typescript);
    }
}
