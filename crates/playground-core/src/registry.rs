//! Package registry queries for version pickers.

use async_trait::async_trait;
use semver::Version;

use crate::dependency::VersionKey;
use crate::error::Result;

/// Registry metadata source listing the published versions of a package.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Fetches all versions of `package`, in registry order.
    async fn fetch_versions(&self, package: &str) -> Result<Vec<String>>;
}

/// Predicate restricting which versions are offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionFilter {
    Any,
    /// Versions `>=` the bound under semver ordering. Strings that are not
    /// valid semver are excluded.
    AtLeast(Version),
    /// Drops nightly (`dev`) and `insiders` builds.
    Stable,
}

impl VersionFilter {
    pub fn at_least(major: u64, minor: u64, patch: u64) -> Self {
        VersionFilter::AtLeast(Version::new(major, minor, patch))
    }

    pub fn accepts(&self, version: &str) -> bool {
        match self {
            VersionFilter::Any => true,
            VersionFilter::AtLeast(min) => Version::parse(version)
                .map(|v| &v >= min)
                .unwrap_or(false),
            VersionFilter::Stable => !version.contains("dev") && !version.contains("insiders"),
        }
    }

    /// The filter applied to a version slot's picker.
    pub fn for_key(key: VersionKey) -> Self {
        match key {
            VersionKey::React => Self::at_least(18, 0, 0),
            VersionKey::Antd => Self::at_least(5, 0, 0),
            VersionKey::Typescript => VersionFilter::Stable,
        }
    }
}

/// Lists the versions of `package` accepted by `filter`.
///
/// Never fails: registry or parse errors are logged and yield an empty list,
/// which callers treat as "unknown".
pub async fn list_available_versions(
    client: &dyn RegistryClient,
    package: &str,
    filter: &VersionFilter,
) -> Vec<String> {
    match client.fetch_versions(package).await {
        Ok(versions) => versions.into_iter().filter(|v| filter.accepts(v)).collect(),
        Err(e) => {
            tracing::warn!(package, error = %e, "Failed to fetch versions");
            Vec::new()
        }
    }
}

/// Lists the versions offered for a version slot.
pub async fn supported_versions(client: &dyn RegistryClient, key: VersionKey) -> Vec<String> {
    list_available_versions(client, key.package(), &VersionFilter::for_key(key)).await
}
