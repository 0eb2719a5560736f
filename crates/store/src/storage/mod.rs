//! Key-value storage backends for the snapshot slot.
//!
//! The store needs exactly one named slot holding a string. Backends:
//!
//! - [`MemoryStore`] - shared in-process map, optionally quota-limited
//! - [`FileStore`] - one JSON file per key in a directory

mod file;
mod memory;

use std::path::PathBuf;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the value would exceed the backend's capacity.
    #[error("storage quota exceeded: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Keys are restricted to ASCII letters, digits, `_` and `-`.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A string-valued key-value store.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails or exceeds capacity.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Whether `key` is usable by every backend (it doubles as a file name).
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn check_key(key: &str) -> Result<(), StorageError> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
