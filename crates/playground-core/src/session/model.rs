//! Session domain model.
//!
//! A [`Session`] is immutable: every transition builds the next session from
//! the previous one, so a half-applied change is never observable.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dependency::{DependencyResolver, VersionKey, Versions};
use crate::error::{PlaygroundError, Result};
use crate::import_map::ImportMap;
use crate::session::template;

/// The entry component file. Always present; rendered by the preview.
pub const ENTRY_FILE: &str = "App.tsx";
/// Mount scaffold shown alongside the entry file.
pub const MAIN_FILE: &str = "main.tsx";
/// Generated component-library setup file, templated with the antd version.
pub const SETUP_FILE: &str = "antd.ts";

/// Logical file path to source text, in display order.
pub type Files = IndexMap<String, String>;

/// The persisted, reproducible subset of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub files: Files,
    pub active_file: String,
    pub versions: Versions,
    pub import_map: ImportMap,
}

/// Live session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    files: Files,
    active_file: String,
    versions: Versions,
    import_map: ImportMap,
}

impl Session {
    /// A fresh session seeded from the built-in defaults.
    pub fn with_defaults(resolver: &DependencyResolver) -> Self {
        let versions = Versions::default();
        Self {
            files: template::default_files(&versions.antd),
            active_file: ENTRY_FILE.to_string(),
            import_map: resolver.default_import_map(&versions),
            versions,
        }
    }

    /// Rebuilds a session from a decoded snapshot, repairing invariants:
    /// the entry file is restored from the template when missing and an
    /// unresolvable active file falls back to the entry file.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        let SessionSnapshot {
            mut files,
            active_file,
            versions,
            import_map,
        } = snapshot;

        if !files.contains_key(ENTRY_FILE) {
            tracing::debug!("Snapshot has no entry file, restoring template");
            files.shift_insert(0, ENTRY_FILE.to_string(), template::entry_source().to_string());
        }

        let active_file = if files.contains_key(&active_file) {
            active_file
        } else {
            ENTRY_FILE.to_string()
        };

        Self {
            files,
            active_file,
            versions,
            import_map,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            files: self.files.clone(),
            active_file: self.active_file.clone(),
            versions: self.versions.clone(),
            import_map: self.import_map.clone(),
        }
    }

    pub fn files(&self) -> &Files {
        &self.files
    }

    pub fn active_file(&self) -> &str {
        &self.active_file
    }

    pub fn active_source(&self) -> &str {
        self.files
            .get(&self.active_file)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Source of the entry component.
    pub fn entry_source(&self) -> &str {
        self.files
            .get(ENTRY_FILE)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn versions(&self) -> &Versions {
        &self.versions
    }

    pub fn import_map(&self) -> &ImportMap {
        &self.import_map
    }

    // ============================================================================
    // Transitions
    // ============================================================================

    /// Replaces (or adds) one file. Content is never validated.
    pub fn with_file(&self, path: &str, content: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.files.insert(path.to_string(), content.into());
        next
    }

    pub fn with_active_file(&self, path: &str) -> Result<Self> {
        if !self.files.contains_key(path) {
            return Err(PlaygroundError::not_found("File", path));
        }
        let mut next = self.clone();
        next.active_file = path.to_string();
        Ok(next)
    }

    /// Removes a file. The entry file cannot be removed; removing the active
    /// file makes the entry file active.
    pub fn without_file(&self, path: &str) -> Result<Self> {
        if path == ENTRY_FILE {
            return Err(PlaygroundError::invalid_input(format!(
                "{} is the entry file and cannot be removed",
                ENTRY_FILE
            )));
        }
        if !self.files.contains_key(path) {
            return Err(PlaygroundError::not_found("File", path));
        }

        let mut next = self.clone();
        next.files.shift_remove(path);
        if next.active_file == path {
            next.active_file = ENTRY_FILE.to_string();
        }
        Ok(next)
    }

    /// Updates one version slot and regenerates exactly the import map entries
    /// owned by that slot. Changing the component library also regenerates the
    /// setup file when the session has one.
    pub fn with_version(&self, key: VersionKey, version: &str, resolver: &DependencyResolver) -> Self {
        let mut next = self.clone();
        next.versions = self.versions.with(key, version);
        next.import_map.merge(resolver.entries_for(key, version));

        if key == VersionKey::Antd && next.files.contains_key(SETUP_FILE) {
            next.files
                .insert(SETUP_FILE.to_string(), template::setup_source(version));
        }
        next
    }

    /// Wholesale import map replacement.
    pub fn with_import_map(&self, import_map: ImportMap) -> Self {
        let mut next = self.clone();
        next.import_map = import_map;
        next
    }

    /// Restores the template file set for the current versions and activates
    /// the entry file. Versions and import map are kept.
    pub fn with_template_files(&self) -> Self {
        let mut next = self.clone();
        next.files = template::default_files(&self.versions.antd);
        next.active_file = ENTRY_FILE.to_string();
        next
    }
}
