//! In-process host adapters for headless use and tests.

use std::sync::{Mutex, PoisonError};

use playground_core::clipboard::Clipboard;
use playground_core::error::{PlaygroundError, Result};
use playground_core::location::{AddressBar, split_fragment};

#[derive(Debug)]
struct History {
    /// Visited URLs, oldest first; the last one is the current page.
    entries: Vec<String>,
    replacements: usize,
}

impl History {
    fn current(&self) -> &str {
        self.entries.last().map_or("", String::as_str)
    }
}

/// An address bar over an in-memory session history.
///
/// `replace_fragment` rewrites the current entry in place; only
/// [`navigate`](Self::navigate) adds an entry.
#[derive(Debug)]
pub struct MemoryAddressBar {
    history: Mutex<History>,
}

impl MemoryAddressBar {
    pub fn new(url: &str) -> Self {
        Self {
            history: Mutex::new(History {
                entries: vec![url.to_string()],
                replacements: 0,
            }),
        }
    }

    /// Opens `url` as a new history entry, like following a link.
    pub fn navigate(&self, url: &str) {
        self.lock().entries.push(url.to_string());
    }

    pub fn replacements(&self) -> usize {
        self.lock().replacements
    }

    pub fn history_len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn history(&self) -> Vec<String> {
        self.lock().entries.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AddressBar for MemoryAddressBar {
    fn fragment(&self) -> Option<String> {
        split_fragment(self.lock().current()).1.map(str::to_string)
    }

    fn replace_fragment(&self, fragment: &str) {
        let mut history = self.lock();
        let base = split_fragment(history.current()).0.to_string();
        let url = if fragment.is_empty() {
            base
        } else {
            format!("{}#{}", base, fragment)
        };
        match history.entries.last_mut() {
            Some(entry) => *entry = url,
            None => history.entries.push(url),
        }
        history.replacements += 1;
    }

    fn href(&self) -> String {
        self.lock().current().to_string()
    }
}

/// Clipboard keeping the last written text.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    denied: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that rejects every write, like a host without permission.
    pub fn denied() -> Self {
        Self {
            contents: Mutex::new(None),
            denied: true,
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        if self.denied {
            return Err(PlaygroundError::internal("Clipboard access denied"));
        }
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}
