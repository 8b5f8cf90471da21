pub mod cdn;
pub mod clipboard;
pub mod codec;
pub mod dependency;
pub mod error;
pub mod import_map;
pub mod location;
pub mod preference;
pub mod registry;
pub mod session;

// Re-export common types
pub use cdn::{Cdn, CdnSetting, resolve_url};
pub use codec::{Decoded, SnapshotCodec};
pub use dependency::{DependencyDescriptor, DependencyResolver, VersionKey, Versions};
pub use error::{PlaygroundError, Result};
pub use import_map::ImportMap;
pub use session::{Session, SessionSnapshot};
