//! Editing surface binding.
//!
//! The editor receives `(text, language, theme)` for the active file and
//! hands back the full replacement text on every edit.

use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};

use crate::store::SessionStore;
use crate::toolbar::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LanguageMode {
    Typescript,
    Javascript,
    Css,
    Json,
    Plaintext,
}

impl LanguageMode {
    pub fn for_path(path: &str) -> Self {
        let extension = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("tsx" | "ts") => LanguageMode::Typescript,
            Some("jsx" | "js" | "mjs") => LanguageMode::Javascript,
            Some("css") => LanguageMode::Css,
            Some("json") => LanguageMode::Json,
            _ => LanguageMode::Plaintext,
        }
    }
}

/// What the editing surface displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorBinding {
    pub path: String,
    pub text: String,
    pub language: LanguageMode,
    pub theme: Theme,
}

impl EditorBinding {
    /// Binds the store's active file.
    pub fn active(store: &SessionStore, theme: Theme) -> Self {
        let session = store.session();
        let path = session.active_file().to_string();
        Self {
            language: LanguageMode::for_path(&path),
            text: session.active_source().to_string(),
            path,
            theme,
        }
    }

    /// Change callback: writes the full text of the bound file.
    pub fn apply_edit(&mut self, store: &SessionStore, text: impl Into<String>) {
        self.text = text.into();
        store.update_file(&self.path, self.text.clone());
    }
}
