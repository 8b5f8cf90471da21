//! Sandboxed frame hosting a preview document.

use super::document::PreviewDocument;
use super::escape;

/// Sandbox tokens of the preview frame: scripts only. No same-origin
/// access, no top-level navigation, no forms, no popups.
pub const SANDBOX: &str = "allow-scripts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFrame {
    title: String,
}

impl PreviewFrame {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }

    /// `<iframe>` markup embedding `document` through `srcdoc`.
    pub fn markup(&self, document: &PreviewDocument) -> String {
        format!(
            r#"<iframe class="preview-iframe" sandbox="{}" title="{}" srcdoc="{}"></iframe>"#,
            SANDBOX,
            escape::html_attr(&self.title),
            escape::html_attr(&document.html)
        )
    }
}

impl Default for PreviewFrame {
    fn default() -> Self {
        Self::new("preview")
    }
}
