//! Application layer for the playground.
//!
//! Coordinates the domain model with host adapters: the session store, the
//! version pickers and the editor / toolbar contracts.

pub mod catalog;
pub mod editor;
pub mod store;
pub mod toolbar;

pub use catalog::VersionCatalog;
pub use editor::{EditorBinding, LanguageMode};
pub use store::{SeedSource, SessionStore};
pub use toolbar::{Notification, NotificationLevel, Theme, Toolbar};
