//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{KeyValueStore, StorageError, check_key};

/// In-process key-value store.
///
/// Clones share the same map, so two stores built on clones of one
/// `MemoryStore` see each other's writes (last writer wins). An optional
/// quota caps the total bytes of keys plus values, mimicking browser
/// storage limits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryInner {
    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl MemoryStore {
    /// Create an empty, unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store holding at most `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryInner {
                entries: HashMap::new(),
                quota: Some(quota),
            })),
        }
    }

    /// Change the quota; `None` removes it. Existing entries are kept.
    pub fn set_quota(&self, quota: Option<usize>) {
        self.lock().quota = quota;
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        // A panic while holding the lock cannot leave the map half-written.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        check_key(key)?;
        Ok(self.lock().entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        check_key(key)?;
        let mut inner = self.lock();
        if let Some(quota) = inner.quota {
            let needed = inner.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        inner.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        check_key(key)?;
        self.lock().entries.remove(key);
        Ok(())
    }
}
