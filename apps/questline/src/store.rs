//! Host-side storage: the snapshot file backend and backend selection.

use questline_core::formats::{decode_snapshot, encode_snapshot};
use questline_core::{KeyValueBackend, MemoryBackend, RedbBackend, StoreError};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

// =============================================================================
// FILE BACKEND
// =============================================================================

/// Whole-store snapshot file. Every write rewrites the file.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    entries: MemoryBackend,
}

impl FileBackend {
    /// Load the snapshot at `path`.
    ///
    /// A missing file starts empty. So does an unreadable or undecodable one,
    /// with a warning; the next write replaces it.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let entries = if path.exists() {
            match load_snapshot(path) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "unreadable snapshot, starting empty");
                    MemoryBackend::new()
                }
            }
        } else {
            MemoryBackend::new()
        };
        debug!(path = %path.display(), entries = entries.len(), "opened snapshot file");
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Write an empty snapshot to `path`.
    pub fn create(path: &Path) -> Result<Self, StoreError> {
        let backend = Self {
            path: path.to_path_buf(),
            entries: MemoryBackend::new(),
        };
        backend.flush()?;
        Ok(backend)
    }

    /// Write to a sibling temp file, then rename over the snapshot.
    fn flush(&self) -> Result<(), StoreError> {
        let bytes = encode_snapshot(&self.entries.snapshot())?;
        let staging = staging_path(&self.path);
        std::fs::write(&staging, bytes)?;
        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

fn load_snapshot(path: &Path) -> Result<MemoryBackend, StoreError> {
    let bytes = std::fs::read(path)?;
    Ok(MemoryBackend::from_snapshot(decode_snapshot(&bytes)?))
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

impl KeyValueBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.entries.read(key)
    }

    fn write(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries.write(key, value)?;
        self.flush()
    }
}

// =============================================================================
// BACKEND SELECTION
// =============================================================================

/// Either persistent backend, chosen at runtime by name.
#[derive(Debug)]
pub enum HostBackend {
    File(FileBackend),
    Redb(RedbBackend),
}

impl HostBackend {
    /// Open the backend named `kind` ("file" or "redb") at `path`.
    pub fn open(path: &Path, kind: &str) -> Result<Self, Box<dyn std::error::Error>> {
        match kind {
            "file" => Ok(Self::File(FileBackend::open(path)?)),
            "redb" => Ok(Self::Redb(RedbBackend::open(path)?)),
            other => Err(format!("Unknown backend: {other}. Use 'file' or 'redb'").into()),
        }
    }

    /// Create a fresh store of kind `kind` at `path`.
    pub fn create(path: &Path, kind: &str) -> Result<Self, Box<dyn std::error::Error>> {
        match kind {
            "file" => Ok(Self::File(FileBackend::create(path)?)),
            "redb" => Ok(Self::Redb(RedbBackend::open(path)?)),
            other => Err(format!("Unknown backend: {other}. Use 'file' or 'redb'").into()),
        }
    }
}

impl KeyValueBackend for HostBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match self {
            Self::File(backend) => backend.read(key),
            Self::Redb(backend) => backend.read(key),
        }
    }

    fn write(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        match self {
            Self::File(backend) => backend.write(key, value),
            Self::Redb(backend) => backend.write(key, value),
        }
    }
}
