use anyhow::Result;
use playground_application::VersionCatalog;
use playground_core::dependency::VersionKey;
use playground_infrastructure::JsdelivrRegistry;
use std::sync::Arc;

pub async fn run(key: VersionKey) -> Result<()> {
    let catalog = VersionCatalog::new(Arc::new(JsdelivrRegistry::new()));
    catalog.refresh(key).await;

    let versions = catalog.versions(key);
    if versions.is_empty() {
        tracing::warn!(%key, "No versions available");
    }
    for version in versions {
        println!("{}", version);
    }
    Ok(())
}
