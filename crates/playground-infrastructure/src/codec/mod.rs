//! Compressed JSON token codec.
//!
//! A token is `base64url(zlib(json(payload)))` without padding, so it can sit
//! in a URL fragment untouched. Payloads carry a schema tag and older schemas
//! are migrated forward on decode.

pub mod dto;
pub mod migration;

use std::io::{Read, Write};
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use serde_json::Value;
use thiserror::Error;

use playground_core::codec::{Decoded, SnapshotCodec};
use playground_core::dependency::DependencyResolver;
use playground_core::error::Result;
use playground_core::session::SessionSnapshot;

use self::dto::{SingleFileToMultiFile, SnapshotV2_0, latest_schema, schema_version_of};
use self::migration::MigrationRegistry;

/// Upper bound for the inflated payload.
pub const MAX_DECODED_BYTES: usize = 4 * 1024 * 1024;

/// Why a token could not be turned back into a snapshot.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("token is empty")]
    Empty,

    #[error("token is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("token payload is not valid zlib data: {0}")]
    Compression(#[from] std::io::Error),

    #[error("token payload exceeds {0} bytes once inflated")]
    TooLarge(usize),

    #[error("token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("token payload schema is unusable: {0}")]
    Schema(String),
}

/// [`SnapshotCodec`] producing compressed, URL-safe tokens.
#[derive(Debug)]
pub struct CompressedJsonCodec {
    resolver: DependencyResolver,
    registry: MigrationRegistry,
    max_decoded_bytes: usize,
}

impl CompressedJsonCodec {
    pub fn new(resolver: DependencyResolver) -> Self {
        let mut registry = MigrationRegistry::new(latest_schema());
        registry.register(Arc::new(SingleFileToMultiFile));

        Self {
            resolver,
            registry,
            max_decoded_bytes: MAX_DECODED_BYTES,
        }
    }

    pub fn with_max_decoded_bytes(mut self, limit: usize) -> Self {
        self.max_decoded_bytes = limit;
        self
    }

    /// Decodes a token, reporting why it was rejected.
    pub fn try_decode(&self, token: &str) -> std::result::Result<SessionSnapshot, CodecError> {
        let token = token.trim().trim_start_matches('#');
        if token.is_empty() {
            return Err(CodecError::Empty);
        }

        let compressed = match URL_SAFE_NO_PAD.decode(token) {
            Ok(bytes) => bytes,
            // Tokens minted before the URL-safe alphabet was adopted.
            Err(err) => STANDARD.decode(token).map_err(|_| err)?,
        };

        let json = self.inflate(&compressed)?;
        let payload: Value = serde_json::from_slice(&json)?;

        let version = schema_version_of(&payload).map_err(|e| CodecError::Schema(format!("{:#}", e)))?;
        let payload = self
            .registry
            .migrate_to_latest(payload, &version)
            .map_err(|e| CodecError::Schema(format!("{:#}", e)))?;

        let dto: SnapshotV2_0 = serde_json::from_value(payload)?;
        Ok(dto.into_snapshot(&self.resolver))
    }

    fn inflate(&self, compressed: &[u8]) -> std::result::Result<Vec<u8>, CodecError> {
        let limit = self.max_decoded_bytes;
        let mut out = Vec::new();
        ZlibDecoder::new(compressed)
            .take(limit as u64 + 1)
            .read_to_end(&mut out)?;
        if out.len() > limit {
            return Err(CodecError::TooLarge(limit));
        }
        Ok(out)
    }
}

impl SnapshotCodec for CompressedJsonCodec {
    fn encode(&self, snapshot: &SessionSnapshot) -> Result<String> {
        let json = serde_json::to_vec(&SnapshotV2_0::from_snapshot(snapshot))?;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&json)?;
        let compressed = encoder.finish()?;

        Ok(URL_SAFE_NO_PAD.encode(compressed))
    }

    fn decode(&self, token: &str) -> Decoded {
        match self.try_decode(token) {
            Ok(snapshot) => Decoded::Restored(snapshot),
            Err(CodecError::Empty) => Decoded::NoPriorState,
            Err(err) => {
                tracing::warn!(error = %err, "Discarding unreadable session token");
                Decoded::NoPriorState
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_core::dependency::VersionKey;
    use playground_core::session::Session;
    use playground_core::session::model::{ENTRY_FILE, SETUP_FILE};
    use serde_json::json;

    fn codec() -> CompressedJsonCodec {
        CompressedJsonCodec::new(DependencyResolver::default())
    }

    fn pack(payload: &Value, engine: &impl Engine) -> String {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(payload.to_string().as_bytes()).unwrap();
        engine.encode(encoder.finish().unwrap())
    }

    #[test]
    fn test_round_trip_restores_snapshot() {
        let resolver = DependencyResolver::default();
        let session = Session::with_defaults(&resolver)
            .with_file(ENTRY_FILE, "export default () => <span>`${x}` </script></span>")
            .with_file("utils.ts", "export const x = '日本語';")
            .with_version(VersionKey::Antd, "5.20.0", &resolver);
        let session = session.with_active_file("utils.ts").unwrap();
        let snapshot = session.snapshot();

        let codec = codec();
        let token = codec.encode(&snapshot).unwrap();

        assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(codec.decode(&token), Decoded::Restored(snapshot));
    }

    #[test]
    fn test_garbage_yields_no_prior_state() {
        let codec = codec();
        for token in ["", "#", "!!!not-base64!!!", "aGVsbG8", "abc$%^"] {
            assert_eq!(codec.decode(token), Decoded::NoPriorState, "token {:?}", token);
        }
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        let codec = codec();
        let token = pack(&json!([1, 2, 3]), &URL_SAFE_NO_PAD);
        assert!(codec.try_decode(&token).is_err());
    }

    #[test]
    fn test_legacy_standard_alphabet_token() {
        let payload = dto::legacy_payload("const App = () => <b>+/</b>;");
        let token = pack(&payload, &STANDARD);

        let snapshot = codec().try_decode(&token).unwrap();
        assert_eq!(snapshot.files[ENTRY_FILE], "const App = () => <b>+/</b>;");
        assert!(snapshot.files[SETUP_FILE].contains("antd@5.3.0"));
        assert_eq!(snapshot.versions.react, "18.2.0");
        assert_eq!(snapshot.active_file, ENTRY_FILE);
        assert_eq!(
            snapshot.import_map.get("react"),
            Some("https://unpkg.com/react@18.2.0/umd/react.production.min.js")
        );
    }

    #[test]
    fn test_newer_schema_is_not_restored() {
        let token = pack(&json!({ "v": "9.0.0", "files": {} }), &URL_SAFE_NO_PAD);
        let result = codec().try_decode(&token);
        assert!(matches!(result, Err(CodecError::Schema(_))));
        assert_eq!(codec().decode(&token), Decoded::NoPriorState);
    }

    #[test]
    fn test_inflated_size_is_capped() {
        let payload = json!({ "v": "2.0.0", "files": { "App.tsx": "x".repeat(4096) } });
        let token = pack(&payload, &URL_SAFE_NO_PAD);

        let result = codec().with_max_decoded_bytes(1024).try_decode(&token);
        assert!(matches!(result, Err(CodecError::TooLarge(1024))));
        assert!(codec().try_decode(&token).is_ok());
    }

    #[test]
    fn test_leading_hash_is_ignored() {
        let codec = codec();
        let snapshot = Session::with_defaults(&DependencyResolver::default()).snapshot();
        let token = codec.encode(&snapshot).unwrap();
        assert_eq!(codec.decode(&format!("#{}", token)), Decoded::Restored(snapshot));
    }
}
