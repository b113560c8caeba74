//! JSON value layer over a raw backend.

use super::{KeyValueBackend, StoreError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Best-effort JSON persistence.
///
/// `get` never fails: a missing key, a backend error or an undecodable value
/// all yield the caller's default. `set` never fails either: errors are
/// logged and the write is dropped.
#[derive(Debug)]
pub struct JsonStore<B: KeyValueBackend> {
    backend: B,
}

impl<B: KeyValueBackend> JsonStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Read the value under `key`, or `default`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.backend.read(key) {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(err) => {
                    warn!(key, error = %err, "stored value unreadable, using default");
                    default
                }
            },
            Ok(None) => default,
            Err(err) => {
                warn!(key, error = %err, "store read failed, using default");
                default
            }
        }
    }

    /// [`get`](Self::get) with `T::default()`.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.get(key, T::default())
    }

    /// Write `value` under `key`. Failures are logged, not returned.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) {
        if let Err(err) = self.try_set(key, value) {
            warn!(key, error = %err, "store write failed, value not persisted");
        }
    }

    /// Write `value` under `key`, reporting failures.
    pub fn try_set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.write(key, &bytes)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_inner(self) -> B {
        self.backend
    }
}
