//! In-memory backend.

use super::{KeyValueBackend, StoreError};
use crate::formats::StoreSnapshot;
use std::collections::BTreeMap;

/// Key-value map held in memory. Convertible to and from a [`StoreSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            entries: snapshot.entries,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            entries: self.entries.clone(),
        }
    }

    /// Store raw bytes directly, bypassing JSON encoding.
    pub fn insert_raw(&mut self, key: &str, value: impl Into<Vec<u8>>) {
        self.entries.insert(key.to_string(), value.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let mut backend = MemoryBackend::new();
        assert!(matches!(backend.read("k"), Ok(None)));
        assert!(backend.write("k", b"v").is_ok());
        assert!(matches!(backend.read("k"), Ok(Some(ref v)) if v == b"v"));
    }

    #[test]
    fn snapshot_preserves_entries() {
        let mut backend = MemoryBackend::new();
        backend.insert_raw("a", b"1".to_vec());
        backend.insert_raw("b", b"2".to_vec());
        let restored = MemoryBackend::from_snapshot(backend.snapshot());
        assert_eq!(restored.len(), 2);
        assert!(matches!(restored.read("b"), Ok(Some(ref v)) if v == b"2"));
    }
}
