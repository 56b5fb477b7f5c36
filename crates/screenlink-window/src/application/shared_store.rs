//! Shared store port and JSON adapter.
//!
//! The shared store is the only channel between windows: a process-wide
//! string-to-string map that outlives any single window.  There are no locks,
//! transactions, or multi-key operations.  Each single-key write is atomic and
//! the last writer wins.
//!
//! [`SharedStore`] is the raw port implemented by the infrastructure layer
//! (`MemoryStore`, `FileStore`).  Use cases talk to it through [`JsonStore`],
//! which encodes values and scopes enumeration by key prefix.

use std::path::PathBuf;
use std::sync::Arc;

use screenlink_core::{decode_value, encode_value, CodecError};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Error type for shared store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The write would take the store past its size limit.
    #[error("storage quota exceeded writing {key:?}: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    /// The key cannot be represented by this store.
    #[error("invalid store key {0:?}")]
    InvalidKey(String),

    /// A file system I/O error occurred.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store cannot be reached right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The value under `key` could not be encoded or decoded.
    #[error("bad value under {key:?}: {source}")]
    Codec {
        key: String,
        #[source]
        source: CodecError,
    },
}

/// Raw key-value store shared by every window.
pub trait SharedStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes `key`.  Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Returns every key currently present, in no particular order.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Typed access to a [`SharedStore`].
///
/// Cheap to clone; every clone talks to the same underlying store.
#[derive(Clone)]
pub struct JsonStore {
    inner: Arc<dyn SharedStore>,
}

impl JsonStore {
    pub fn new(inner: Arc<dyn SharedStore>) -> Self {
        Self { inner }
    }

    /// Reads a raw string value.
    pub fn get_str(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    /// Writes a raw string value.
    pub fn set_str(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(key, value)
    }

    /// Reads and decodes a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Codec`] if the stored text does not decode as `T`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.inner.get(key)? {
            Some(text) => decode_value(&text)
                .map(Some)
                .map_err(|source| StoreError::Codec {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Encodes `value` as JSON and writes it.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let text = encode_value(value).map_err(|source| StoreError::Codec {
            key: key.to_string(),
            source,
        })?;
        self.inner.set(key, &text)
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key)
    }

    /// Returns every key starting with `prefix`.
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .inner
            .keys()?
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect())
    }
}
