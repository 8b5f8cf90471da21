//! Preview execution for the playground.
//!
//! Generates the isolated preview document from the live session and
//! carries preview failures back to the host.

pub mod diagnostics;
pub mod preview;

pub use diagnostics::{DiagnosticEvent, DiagnosticEventLayer, DiagnosticKind, PreviewDiagnostic};
pub use preview::{PreviewCompiler, PreviewDocument, PreviewFrame, PreviewRunner, PreviewSurface};
