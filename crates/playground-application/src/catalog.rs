//! Version picker contents.
//!
//! Each refresh takes a ticket for its key; a result is kept only if no newer
//! refresh for the same key was issued while it was in flight.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, PoisonError};

use playground_core::dependency::VersionKey;
use playground_core::registry::{RegistryClient, supported_versions};

pub struct VersionCatalog {
    client: Arc<dyn RegistryClient>,
    issued: HashMap<VersionKey, AtomicU64>,
    lists: RwLock<HashMap<VersionKey, Vec<String>>>,
}

impl VersionCatalog {
    pub fn new(client: Arc<dyn RegistryClient>) -> Self {
        let issued = [VersionKey::React, VersionKey::Antd, VersionKey::Typescript]
            .into_iter()
            .map(|key| (key, AtomicU64::new(0)))
            .collect();
        Self {
            client,
            issued,
            lists: RwLock::new(HashMap::new()),
        }
    }

    /// Known versions for `key`; empty means unknown.
    pub fn versions(&self, key: VersionKey) -> Vec<String> {
        self.lists
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
            .unwrap_or_default()
    }

    /// Fetches the supported versions for `key`. Returns whether the result
    /// was applied.
    pub async fn refresh(&self, key: VersionKey) -> bool {
        let ticket = self.ticket(key);
        let versions = supported_versions(self.client.as_ref(), key).await;

        if self.issued_for(key) != ticket {
            tracing::debug!(%key, ticket, "Discarding stale version list");
            return false;
        }

        tracing::debug!(%key, count = versions.len(), "Version list updated");
        self.lists
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, versions);
        true
    }

    /// Refreshes every key concurrently.
    pub async fn refresh_all(&self) {
        futures::join!(
            self.refresh(VersionKey::React),
            self.refresh(VersionKey::Antd),
            self.refresh(VersionKey::Typescript),
        );
    }

    fn ticket(&self, key: VersionKey) -> u64 {
        self.issued
            .get(&key)
            .map_or(0, |counter| counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn issued_for(&self, key: VersionKey) -> u64 {
        self.issued
            .get(&key)
            .map_or(0, |counter| counter.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use playground_core::error::{PlaygroundError, Result};
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    /// Registry whose answers are released by the test, in any order.
    #[derive(Default)]
    struct GatedRegistry {
        pending: Mutex<Vec<oneshot::Receiver<Result<Vec<String>>>>>,
    }

    impl GatedRegistry {
        fn gate(&self) -> oneshot::Sender<Result<Vec<String>>> {
            let (tx, rx) = oneshot::channel();
            self.pending.lock().unwrap().push(rx);
            tx
        }
    }

    #[async_trait]
    impl RegistryClient for GatedRegistry {
        async fn fetch_versions(&self, _package: &str) -> Result<Vec<String>> {
            let rx = self.pending.lock().unwrap().remove(0);
            rx.await.unwrap()
        }
    }

    struct StaticRegistry;

    #[async_trait]
    impl RegistryClient for StaticRegistry {
        async fn fetch_versions(&self, package: &str) -> Result<Vec<String>> {
            match package {
                "react" => Ok(vec!["17.0.2".into(), "18.2.0".into(), "18.3.1".into()]),
                "antd" => Ok(vec!["4.24.0".into(), "5.27.5".into()]),
                _ => Err(PlaygroundError::network("offline")),
            }
        }
    }

    fn versions(list: &[&str]) -> Result<Vec<String>> {
        Ok(list.iter().map(|v| v.to_string()).collect())
    }

    #[tokio::test]
    async fn test_refresh_all_filters_and_fails_soft() {
        let catalog = VersionCatalog::new(Arc::new(StaticRegistry));
        catalog.refresh_all().await;

        assert_eq!(catalog.versions(VersionKey::React), vec!["18.2.0", "18.3.1"]);
        assert_eq!(catalog.versions(VersionKey::Antd), vec!["5.27.5"]);
        assert!(catalog.versions(VersionKey::Typescript).is_empty());
    }

    #[tokio::test]
    async fn test_latest_refresh_wins() {
        let registry = Arc::new(GatedRegistry::default());
        let first = registry.gate();
        let second = registry.gate();
        let catalog = VersionCatalog::new(registry);

        let older = catalog.refresh(VersionKey::React);
        let newer = catalog.refresh(VersionKey::React);
        let releases = async {
            // The newer request answers first, then the stale one lands.
            second.send(versions(&["18.3.1"])).unwrap();
            tokio::task::yield_now().await;
            first.send(versions(&["18.0.0"])).unwrap();
        };

        let (older_applied, newer_applied, _) = tokio::join!(older, newer, releases);

        assert!(!older_applied);
        assert!(newer_applied);
        assert_eq!(catalog.versions(VersionKey::React), vec!["18.3.1"]);
    }
}
