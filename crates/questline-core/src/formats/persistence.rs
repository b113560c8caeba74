//! Snapshot encoding.
//!
//! Layout: `b"QLSN"` | version byte | postcard-encoded [`StoreSnapshot`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// File magic.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"QLSN";

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u8 = 1;

const HEADER_LEN: usize = SNAPSHOT_MAGIC.len() + 1;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("not a questline snapshot (bad magic)")]
    BadMagic,

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u8),

    #[error("snapshot truncated")]
    Truncated,

    #[error("snapshot body: {0}")]
    Postcard(#[from] postcard::Error),
}

/// Every key-value entry of a store at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub entries: BTreeMap<String, Vec<u8>>,
}

/// Encode a snapshot with header.
pub fn encode_snapshot(snapshot: &StoreSnapshot) -> Result<Vec<u8>, FormatError> {
    let body = postcard::to_allocvec(snapshot)?;
    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.extend_from_slice(&SNAPSHOT_MAGIC);
    out.push(SNAPSHOT_VERSION);
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decode a snapshot, checking magic and version.
pub fn decode_snapshot(bytes: &[u8]) -> Result<StoreSnapshot, FormatError> {
    if bytes.len() < HEADER_LEN {
        return Err(FormatError::Truncated);
    }
    let (header, body) = bytes.split_at(HEADER_LEN);
    if header[..SNAPSHOT_MAGIC.len()] != SNAPSHOT_MAGIC {
        return Err(FormatError::BadMagic);
    }
    let version = header[SNAPSHOT_MAGIC.len()];
    if version != SNAPSHOT_VERSION {
        return Err(FormatError::UnsupportedVersion(version));
    }
    Ok(postcard::from_bytes(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StoreSnapshot {
        let mut entries = BTreeMap::new();
        entries.insert("player_stats".to_string(), b"{\"level\":1}".to_vec());
        StoreSnapshot { entries }
    }

    #[test]
    fn encoded_snapshot_starts_with_header() {
        let bytes = encode_snapshot(&sample());
        assert!(bytes.is_ok());
        let bytes = bytes.unwrap_or_default();
        assert_eq!(&bytes[..4], b"QLSN");
        assert_eq!(bytes[4], SNAPSHOT_VERSION);
        assert_eq!(decode_snapshot(&bytes).ok(), Some(sample()));
    }

    #[test]
    fn rejects_bad_magic() {
        assert!(matches!(
            decode_snapshot(b"NOPE\x01rest"),
            Err(FormatError::BadMagic)
        ));
    }

    #[test]
    fn rejects_future_version() {
        assert!(matches!(
            decode_snapshot(b"QLSN\x09"),
            Err(FormatError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn rejects_short_input() {
        assert!(matches!(decode_snapshot(b"QL"), Err(FormatError::Truncated)));
    }
}
