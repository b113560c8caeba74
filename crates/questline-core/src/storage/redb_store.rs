//! redb-backed key-value store.
//!
//! One table, `entries`, mapping string keys to JSON bytes. Every write is
//! its own committed transaction (last write wins, single writer).

use super::{KeyValueBackend, StoreError};
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;
use tracing::debug;

const ENTRIES: TableDefinition<&str, &[u8]> = TableDefinition::new("entries");

fn db_err(err: impl Into<redb::Error>) -> StoreError {
    StoreError::Database(err.into())
}

/// Persistent backend on a redb database file.
pub struct RedbBackend {
    db: Database,
}

impl std::fmt::Debug for RedbBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbBackend").finish()
    }
}

impl RedbBackend {
    /// Open (or create) the database at `path` and make sure the table exists.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(db_err)?;

        let txn = db.begin_write().map_err(db_err)?;
        {
            let _table = txn.open_table(ENTRIES).map_err(db_err)?;
        }
        txn.commit().map_err(db_err)?;

        debug!(path = %path.display(), "opened redb store");
        Ok(Self { db })
    }
}

impl KeyValueBackend for RedbBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let txn = self.db.begin_read().map_err(db_err)?;
        let table = txn.open_table(ENTRIES).map_err(db_err)?;
        let value = table.get(key).map_err(db_err)?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn write(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let txn = self.db.begin_write().map_err(db_err)?;
        {
            let mut table = txn.open_table(ENTRIES).map_err(db_err)?;
            table.insert(key, value).map_err(db_err)?;
        }
        txn.commit().map_err(db_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quests.redb");

        {
            let mut backend = RedbBackend::open(&path).unwrap();
            backend.write("player_stats", b"{\"level\":2}").unwrap();
            backend.write("player_stats", b"{\"level\":3}").unwrap();
        }

        let backend = RedbBackend::open(&path).unwrap();
        let value = backend.read("player_stats").unwrap();
        assert_eq!(value.as_deref(), Some(&b"{\"level\":3}"[..]));
        assert!(backend.read("missing").unwrap().is_none());
    }
}
