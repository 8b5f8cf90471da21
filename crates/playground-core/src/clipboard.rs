//! Host clipboard integration.

use crate::error::Result;

/// Clipboard write access. Hosts may deny it; callers must not treat that
/// as fatal.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<()>;
}
