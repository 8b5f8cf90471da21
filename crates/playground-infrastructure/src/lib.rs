pub mod codec;
pub mod host;
pub mod paths;
pub mod preference_store;
pub mod registry;
pub mod storage;

pub use crate::codec::{CodecError, CompressedJsonCodec};
pub use crate::host::{MemoryAddressBar, MemoryClipboard};
pub use crate::paths::PlaygroundPaths;
pub use crate::preference_store::{FilePreferenceStore, MemoryPreferenceStore};
pub use crate::registry::JsdelivrRegistry;
