//! Snapshot persistence.
//!
//! The persisted subset of the state is written as one JSON object under a
//! single key:
//!
//! ```json
//! {
//!   "favorites": [],
//!   "cartItems": [],
//!   "addresses": [],
//!   "selectedAddressId": null,
//!   "browseHistory": [],
//!   "orders": []
//! }
//! ```
//!
//! Unknown top-level fields are ignored and missing ones default, but a
//! field with the wrong shape rejects the whole snapshot. A rejected or
//! unreadable snapshot is never fatal: the store starts from defaults.

use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use heritage_mall_core::{Address, AddressId, CartItem, Favorite, HistoryItem, Order};

use crate::storage::{KeyValueStore, StorageError};

/// Errors raised while reading or writing the snapshot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The stored snapshot is not valid JSON or has the wrong shape.
    #[error("malformed snapshot: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The snapshot could not be encoded.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// The storage backend failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// The persisted subset of the store state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub favorites: Vec<Favorite>,
    pub cart_items: Vec<CartItem>,
    pub addresses: Vec<Address>,
    pub selected_address_id: Option<AddressId>,
    pub browse_history: Vec<HistoryItem>,
    pub orders: Vec<Order>,
}

impl PersistedState {
    /// Parse a snapshot blob.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Malformed` if the blob is not a snapshot.
    pub fn from_json(raw: &str) -> Result<Self, PersistenceError> {
        serde_json::from_str(raw).map_err(PersistenceError::Malformed)
    }

    /// Encode as a snapshot blob.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Encode` if serialization fails.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        serde_json::to_string(self).map_err(PersistenceError::Encode)
    }

    /// Bring restored data back within the store's invariants.
    ///
    /// Returns the names of the repairs made; empty when the snapshot was
    /// already consistent.
    pub fn repair(&mut self, history_limit: usize) -> Vec<&'static str> {
        let mut repairs = Vec::new();

        let mut shadowed = false;
        for favorite in &mut self.favorites {
            shadowed |= favorite.strip_owned_extras();
        }
        for item in &mut self.cart_items {
            shadowed |= item.strip_owned_extras();
        }
        for order in &mut self.orders {
            shadowed |= order.strip_owned_extras();
        }
        if shadowed {
            repairs.push("extra fields shadowing typed fields");
        }

        if dedup_by_key(&mut self.favorites, |f| f.id) {
            repairs.push("duplicate favorites");
        }
        if dedup_by_key(&mut self.cart_items, |item| item.id) {
            repairs.push("duplicate cart items");
        }
        let mut zero_quantity = false;
        for item in self.cart_items.iter_mut().filter(|item| item.quantity == 0) {
            item.quantity = 1;
            zero_quantity = true;
        }
        if zero_quantity {
            repairs.push("zero cart quantities");
        }

        if dedup_by_key(&mut self.addresses, |a| a.id) {
            repairs.push("duplicate addresses");
        }
        let mut seen_default = false;
        let mut extra_default = false;
        for address in self.addresses.iter_mut().filter(|a| a.is_default) {
            if seen_default {
                address.is_default = false;
                extra_default = true;
            }
            seen_default = true;
        }
        if extra_default {
            repairs.push("multiple default addresses");
        }
        if let Some(id) = self.selected_address_id
            && !self.addresses.iter().any(|a| a.id == id)
        {
            self.selected_address_id = self
                .addresses
                .iter()
                .find(|a| a.is_default)
                .or_else(|| self.addresses.first())
                .map(|a| a.id);
            repairs.push("dangling selected address");
        }

        if dedup_by_key(&mut self.browse_history, |h| h.id) {
            repairs.push("duplicate history entries");
        }
        if self.browse_history.len() > history_limit {
            self.browse_history.truncate(history_limit);
            repairs.push("history over limit");
        }

        repairs
    }
}

/// Keep the first element for each key. Returns whether anything was removed.
fn dedup_by_key<T, K, F>(items: &mut Vec<T>, key: F) -> bool
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let before = items.len();
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(key(item)));
    items.len() != before
}

/// The durable slot a store snapshots into.
#[derive(Debug, Clone)]
pub struct SnapshotSlot<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStore> SnapshotSlot<S> {
    /// A slot named `key` in `storage`.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Slot name.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Backing storage.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Read the snapshot, if one is stored.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the slot cannot be read or parsed.
    pub fn load(&self) -> Result<Option<PersistedState>, PersistenceError> {
        match self.storage.get(&self.key)? {
            Some(raw) => PersistedState::from_json(&raw).map(Some),
            None => Ok(None),
        }
    }

    /// Read the snapshot, falling back to defaults on absence or failure.
    ///
    /// The result is repaired against the invariants before it is returned.
    pub fn restore(&self, history_limit: usize) -> PersistedState {
        let mut persisted = match self.load() {
            Ok(Some(persisted)) => persisted,
            Ok(None) => {
                debug!(key = %self.key, "no stored snapshot; starting empty");
                return PersistedState::default();
            }
            Err(error) => {
                warn!(
                    key = %self.key,
                    error = %error,
                    "failed to load stored snapshot; starting empty",
                );
                return PersistedState::default();
            }
        };

        let repairs = persisted.repair(history_limit);
        if !repairs.is_empty() {
            warn!(
                key = %self.key,
                repairs = ?repairs,
                "stored snapshot violated store invariants; repaired",
            );
        }
        persisted
    }

    /// Overwrite the slot with `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if encoding or the write fails.
    pub fn save(&self, snapshot: &PersistedState) -> Result<(), PersistenceError> {
        let raw = snapshot.to_json()?;
        self.storage.set(&self.key, &raw)?;
        Ok(())
    }

    /// Remove the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Storage` if the backend fails.
    pub fn clear(&self) -> Result<(), PersistenceError> {
        self.storage.remove(&self.key)?;
        Ok(())
    }
}
