//! Linear schema migrations for shareable tokens.
//!
//! Payloads are migrated as raw JSON values, one step at a time, until they
//! reach the latest schema: 1.0.0 → 2.0.0 → ... No step may be skipped.

use anyhow::{Context, Result};
use semver::Version;
use serde_json::Value;
use std::sync::Arc;

/// One migration step between two adjacent schema versions.
pub trait SchemaMigration: Send + Sync + std::fmt::Debug {
    /// Returns the source version this migration starts from.
    fn from_version(&self) -> Version;

    /// Returns the target version this migration produces.
    fn to_version(&self) -> Version;

    /// Returns a human-readable description of this migration.
    fn description(&self) -> &str;

    /// Rewrites a payload of `from_version()` into `to_version()`.
    fn migrate(&self, payload: Value) -> Result<Value>;
}

/// Registry holding a continuous chain of migrations.
///
/// # Example
///
/// ```ignore
/// let mut registry = MigrationRegistry::new(Version::new(2, 0, 0));
/// registry.register(Arc::new(SingleFileToMultiFile));  // 1.0.0 → 2.0.0
///
/// let latest = registry.migrate_to_latest(legacy_payload, &Version::new(1, 0, 0))?;
/// ```
#[derive(Debug)]
pub struct MigrationRegistry {
    /// Migrations in order, forming a linear chain.
    migrations: Vec<Arc<dyn SchemaMigration>>,
    latest_version: Version,
}

impl MigrationRegistry {
    pub fn new(latest_version: Version) -> Self {
        Self {
            migrations: Vec::new(),
            latest_version,
        }
    }

    /// Registers a migration, validating chain continuity.
    ///
    /// # Panics
    ///
    /// Panics if the migration doesn't start where the previous one ended, or
    /// targets a version beyond the registry's latest version.
    pub fn register(&mut self, migration: Arc<dyn SchemaMigration>) {
        if let Some(last) = self.migrations.last() {
            assert_eq!(
                last.to_version(),
                migration.from_version(),
                "Migration chain broken: '{}' ends at {} but '{}' starts at {}",
                last.description(),
                last.to_version(),
                migration.description(),
                migration.from_version()
            );
        }

        assert!(
            migration.to_version() <= self.latest_version,
            "Migration target version {} exceeds latest schema version {}",
            migration.to_version(),
            self.latest_version
        );

        self.migrations.push(migration);
    }

    pub fn latest_version(&self) -> &Version {
        &self.latest_version
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    /// The versions a payload of `from` passes through, `from` included.
    pub fn path_from(&self, from: &Version) -> Option<Vec<Version>> {
        let start = self.find_start_index(from)?;
        let mut path = vec![from.clone()];
        path.extend(self.migrations[start..].iter().map(|m| m.to_version()));
        Some(path)
    }

    /// Applies every migration from `current_version` to the latest version.
    pub fn migrate_to_latest(&self, mut payload: Value, current_version: &Version) -> Result<Value> {
        if current_version == &self.latest_version {
            return Ok(payload);
        }

        if current_version > &self.latest_version {
            anyhow::bail!(
                "Schema version {} is newer than the latest supported version {}",
                current_version,
                self.latest_version
            );
        }

        let start = self.find_start_index(current_version).ok_or_else(|| {
            anyhow::anyhow!("No migration found starting from schema version {}", current_version)
        })?;

        for migration in &self.migrations[start..] {
            tracing::debug!(
                from = %migration.from_version(),
                to = %migration.to_version(),
                "Migrating token payload: {}",
                migration.description()
            );

            payload = migration.migrate(payload).with_context(|| {
                format!(
                    "Migration failed: {} -> {}",
                    migration.from_version(),
                    migration.to_version()
                )
            })?;
        }

        Ok(payload)
    }

    fn find_start_index(&self, from_version: &Version) -> Option<usize> {
        self.migrations
            .iter()
            .position(|m| &m.from_version() == from_version)
    }
}
