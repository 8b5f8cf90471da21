//! State codec contract: session snapshot to shareable token and back.

use crate::error::Result;
use crate::session::SessionSnapshot;

/// Result of decoding a shareable token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Restored(SessionSnapshot),
    /// The token was absent or unusable; callers start from defaults.
    NoPriorState,
}

impl Decoded {
    pub fn into_snapshot(self) -> Option<SessionSnapshot> {
        match self {
            Decoded::Restored(snapshot) => Some(snapshot),
            Decoded::NoPriorState => None,
        }
    }
}

/// Serializes snapshots into URL-fragment-safe tokens.
///
/// `decode(encode(s))` must restore `s`. Decoding never fails: malformed
/// input yields [`Decoded::NoPriorState`].
pub trait SnapshotCodec: Send + Sync {
    fn encode(&self, snapshot: &SessionSnapshot) -> Result<String>;

    fn decode(&self, token: &str) -> Decoded;
}
