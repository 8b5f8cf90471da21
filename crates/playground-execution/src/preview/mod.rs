//! Preview pipeline: assemble program text, generate the document, show it
//! in a sandboxed frame, regenerate on change.

pub mod document;
pub mod escape;
pub mod frame;
pub mod program;
pub mod runner;

pub use document::{PreviewCompiler, PreviewDocument, ScriptTag};
pub use frame::PreviewFrame;
pub use program::RuntimeProgram;
pub use runner::{PreviewRunner, PreviewSurface};
