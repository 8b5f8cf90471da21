//! Versioned token payload DTOs.
//!
//! ## Schema Version History
//! - **1.0.0**: Untagged single-file payload `{ code, _o }`.
//! - **2.0.0**: Tagged multi-file payload `{ v, files, active, _o }`.
//!
//! Every field is optional on decode; missing values are filled with the
//! built-in defaults when the DTO is converted into a domain snapshot.

use anyhow::{Context, Result};
use semver::Version;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use playground_core::dependency::{DEFAULT_ANTD_VERSION, DependencyResolver, Versions};
use playground_core::import_map::ImportMap;
use playground_core::session::model::{ENTRY_FILE, Files};
use playground_core::session::{SessionSnapshot, template};

use super::migration::SchemaMigration;

/// Name of the schema version tag inside a payload.
pub const VERSION_TAG: &str = "v";

/// Latest payload schema.
pub fn latest_schema() -> Version {
    Version::new(2, 0, 0)
}

/// Schema assumed for payloads without a version tag.
pub fn untagged_schema() -> Version {
    Version::new(1, 0, 0)
}

/// User option overrides shared by every schema version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOptionsDTO {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub react_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antd_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "tsVersion")]
    pub typescript_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_map: Option<ImportMap>,
}

/// Token payload V1.0.0 (single entry file).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotV1_0 {
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default, rename = "_o")]
    pub options: UserOptionsDTO,
}

/// Token payload V2.0.0 (multi-file with generated setup file).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotV2_0 {
    /// Schema version tag.
    pub v: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Files>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,

    #[serde(default, rename = "_o")]
    pub options: UserOptionsDTO,
}

impl SnapshotV2_0 {
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        Self {
            v: latest_schema().to_string(),
            files: Some(snapshot.files.clone()),
            active: Some(snapshot.active_file.clone()),
            options: UserOptionsDTO {
                react_version: Some(snapshot.versions.react.clone()),
                antd_version: Some(snapshot.versions.antd.clone()),
                typescript_version: Some(snapshot.versions.typescript.clone()),
                import_map: Some(snapshot.import_map.clone()),
            },
        }
    }

    /// Converts into a domain snapshot, defaulting every missing field.
    pub fn into_snapshot(self, resolver: &DependencyResolver) -> SessionSnapshot {
        let defaults = Versions::default();
        let versions = Versions {
            react: self.options.react_version.unwrap_or(defaults.react),
            antd: self.options.antd_version.unwrap_or(defaults.antd),
            typescript: self.options.typescript_version.unwrap_or(defaults.typescript),
        };

        let import_map = self
            .options
            .import_map
            .unwrap_or_else(|| resolver.default_import_map(&versions));
        let files = self
            .files
            .unwrap_or_else(|| template::default_files(&versions.antd));
        let active_file = self.active.unwrap_or_else(|| ENTRY_FILE.to_string());

        SessionSnapshot {
            files,
            active_file,
            versions,
            import_map,
        }
    }
}

/// Reads the schema version tag of a raw payload.
pub fn schema_version_of(payload: &Value) -> Result<Version> {
    match payload.get(VERSION_TAG) {
        None | Some(Value::Null) => Ok(untagged_schema()),
        Some(Value::String(raw)) => {
            Version::parse(raw).with_context(|| format!("Invalid schema version tag '{}'", raw))
        }
        Some(other) => anyhow::bail!("Schema version tag must be a string, got {}", other),
    }
}

// ============================================================================
// Migrations
// ============================================================================

/// 1.0.0 → 2.0.0: the single `code` entry becomes the entry file of the
/// template file set, whose setup file is templated with the payload's
/// component-library version.
#[derive(Debug)]
pub struct SingleFileToMultiFile;

impl SchemaMigration for SingleFileToMultiFile {
    fn from_version(&self) -> Version {
        untagged_schema()
    }

    fn to_version(&self) -> Version {
        Version::new(2, 0, 0)
    }

    fn description(&self) -> &str {
        "single entry file to multi-file session"
    }

    fn migrate(&self, payload: Value) -> Result<Value> {
        let legacy: SnapshotV1_0 =
            serde_json::from_value(payload).context("Payload is not a V1.0.0 snapshot")?;

        let files = legacy.code.map(|code| {
            let antd = legacy
                .options
                .antd_version
                .as_deref()
                .unwrap_or(DEFAULT_ANTD_VERSION);
            let mut files = template::default_files(antd);
            files.insert(ENTRY_FILE.to_string(), code);
            files
        });

        let migrated = SnapshotV2_0 {
            v: self.to_version().to_string(),
            files,
            active: None,
            options: legacy.options,
        };
        Ok(serde_json::to_value(migrated)?)
    }
}

/// Example V1.0.0 payload, as produced by single-file playgrounds.
#[cfg(test)]
pub(crate) fn legacy_payload(code: &str) -> Value {
    serde_json::json!({
        "code": code,
        "_o": {
            "reactVersion": "18.2.0",
            "antdVersion": "5.3.0",
            "tsVersion": "5.0.4",
            "importMap": { "react": "https://unpkg.com/react@18.2.0/umd/react.production.min.js" }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_core::session::model::SETUP_FILE;
    use serde_json::json;

    #[test]
    fn test_schema_version_detection() {
        assert_eq!(schema_version_of(&json!({ "code": "x" })).unwrap(), untagged_schema());
        assert_eq!(schema_version_of(&json!({ "v": "2.0.0" })).unwrap(), latest_schema());
        assert!(schema_version_of(&json!({ "v": "two" })).is_err());
        assert!(schema_version_of(&json!({ "v": 2 })).is_err());
    }

    #[test]
    fn test_single_file_migration() {
        let migrated = SingleFileToMultiFile
            .migrate(legacy_payload("function App() { return 1 }"))
            .unwrap();
        let dto: SnapshotV2_0 = serde_json::from_value(migrated).unwrap();

        assert_eq!(dto.v, "2.0.0");
        let files = dto.files.unwrap();
        assert_eq!(files[ENTRY_FILE], "function App() { return 1 }");
        assert!(files[SETUP_FILE].contains("antd@5.3.0"));
        assert_eq!(dto.options.typescript_version.as_deref(), Some("5.0.4"));
    }

    #[test]
    fn test_missing_fields_default() {
        let resolver = DependencyResolver::default();
        let dto: SnapshotV2_0 = serde_json::from_value(json!({ "v": "2.0.0" })).unwrap();
        let snapshot = dto.into_snapshot(&resolver);

        assert_eq!(snapshot.versions, Versions::default());
        assert_eq!(snapshot.active_file, ENTRY_FILE);
        assert_eq!(snapshot.import_map, resolver.default_import_map(&Versions::default()));
        assert!(snapshot.files.contains_key(ENTRY_FILE));
    }
}
