//! jsDelivr package metadata client.

use async_trait::async_trait;
use playground_core::error::{PlaygroundError, Result};
use playground_core::registry::RegistryClient;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_REGISTRY_URL: &str = "https://data.jsdelivr.com/v1/package/npm";
pub const DEFAULT_REGISTRY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct PackageMetadata {
    #[serde(default)]
    versions: Vec<String>,
}

/// Parses a metadata response body into its version list.
pub fn parse_versions(body: &str) -> Result<Vec<String>> {
    let metadata: PackageMetadata = serde_json::from_str(body)?;
    Ok(metadata.versions)
}

/// [`RegistryClient`] backed by the jsDelivr data API.
#[derive(Debug, Clone)]
pub struct JsdelivrRegistry {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl JsdelivrRegistry {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_REGISTRY_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_REGISTRY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn package_url(&self, package: &str) -> String {
        format!("{}/{}", self.base_url, package)
    }
}

impl Default for JsdelivrRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryClient for JsdelivrRegistry {
    async fn fetch_versions(&self, package: &str) -> Result<Vec<String>> {
        let url = self.package_url(package);
        tracing::debug!(%url, "Fetching package versions");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| PlaygroundError::network(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlaygroundError::network(format!(
                "Registry returned {} for {}",
                status, package
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PlaygroundError::network(format!("Failed to read registry response: {}", e)))?;

        parse_versions(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_versions() {
        let body = r#"{"tags":{"latest":"5.27.5"},"versions":["5.27.5","5.27.4","4.24.16"]}"#;
        assert_eq!(parse_versions(body).unwrap(), vec!["5.27.5", "5.27.4", "4.24.16"]);
    }

    #[test]
    fn test_parse_versions_missing_list() {
        assert!(parse_versions(r#"{"tags":{}}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_versions_malformed() {
        let err = parse_versions("<html>rate limited</html>").unwrap_err();
        assert!(err.is_serialization());
    }

    #[test]
    fn test_package_url() {
        let registry = JsdelivrRegistry::with_base_url("https://data.example.com/npm/");
        assert_eq!(
            registry.package_url("@ant-design/icons"),
            "https://data.example.com/npm/@ant-design/icons"
        );
        assert_eq!(
            JsdelivrRegistry::new().package_url("antd"),
            "https://data.jsdelivr.com/v1/package/npm/antd"
        );
    }

    #[tokio::test]
    async fn test_unreachable_registry_is_network_error() {
        let registry = JsdelivrRegistry::with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_millis(500));
        let err = registry.fetch_versions("react").await.unwrap_err();
        assert!(err.is_network());
    }
}
