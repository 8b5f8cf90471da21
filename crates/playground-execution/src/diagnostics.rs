//! Diagnostic channel for preview failures.
//!
//! The generated document posts a [`PreviewDiagnostic`] to its parent window
//! for every load, transpile or runtime failure. Hosts parse it and
//! [`report`](PreviewDiagnostic::report) it as a tracing event on
//! [`PREVIEW_TARGET`]; [`DiagnosticEventLayer`] forwards those events to a
//! channel for external inspection.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use strum::{AsRefStr, Display, EnumString};
use tokio::sync::mpsc;
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// `source` field of every message the preview posts.
pub const DIAGNOSTIC_SOURCE: &str = "antd-playground";

/// Tracing target of preview diagnostics.
pub const PREVIEW_TARGET: &str = "playground::preview";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DiagnosticKind {
    /// A dependency script failed to load or define its global.
    Load,
    Transpile,
    Runtime,
}

/// Message posted by the preview document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewDiagnostic {
    pub source: String,
    pub kind: DiagnosticKind,
    pub message: String,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl PreviewDiagnostic {
    /// Parses a posted message; messages from other sources yield `None`.
    pub fn parse(message: &Value) -> Option<Self> {
        let diagnostic: Self = serde_json::from_value(message.clone()).ok()?;
        (diagnostic.source == DIAGNOSTIC_SOURCE).then_some(diagnostic)
    }

    /// Emits this diagnostic as an error event on [`PREVIEW_TARGET`].
    pub fn report(&self) {
        tracing::error!(
            target: "playground::preview",
            kind = %self.kind,
            package = self.package.as_deref().unwrap_or(""),
            url = self.url.as_deref().unwrap_or(""),
            "{}",
            self.message
        );
    }
}

/// Event forwarded by [`DiagnosticEventLayer`].
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticEvent {
    pub target: String,
    /// Log level (INFO, DEBUG, WARN, ERROR)
    pub level: String,
    pub message: String,
    pub fields: HashMap<String, Value>,
    /// RFC 3339
    pub timestamp: String,
}

/// Tracing layer forwarding preview events to a channel.
pub struct DiagnosticEventLayer {
    sender: mpsc::UnboundedSender<DiagnosticEvent>,
}

impl DiagnosticEventLayer {
    pub fn new(sender: mpsc::UnboundedSender<DiagnosticEvent>) -> Self {
        Self { sender }
    }

    /// A layer plus the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DiagnosticEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl<S> Layer<S> for DiagnosticEventLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with(PREVIEW_TARGET) {
            return;
        }

        let mut fields = HashMap::new();
        event.record(&mut FieldVisitor(&mut fields));

        let message = match fields.remove("message") {
            Some(Value::String(message)) => message,
            Some(other) => other.to_string(),
            None => String::new(),
        };

        let diagnostic = DiagnosticEvent {
            target: metadata.target().to_string(),
            level: metadata.level().to_string(),
            message,
            fields,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        // Receiver may be gone; diagnostics are best effort.
        let _ = self.sender.send(diagnostic);
    }
}

struct FieldVisitor<'a>(&'a mut HashMap<String, Value>);

impl tracing::field::Visit for FieldVisitor<'_> {
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(format!("{:?}", value)));
    }
}
