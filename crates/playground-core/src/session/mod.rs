//! Session domain: the reproducible playground state.

pub mod model;
pub mod template;

pub use model::{ENTRY_FILE, Files, MAIN_FILE, SETUP_FILE, Session, SessionSnapshot};
