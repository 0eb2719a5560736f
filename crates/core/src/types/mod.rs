//! Core types for Heritage Mall.
//!
//! This module provides type-safe wrappers for common domain concepts and
//! the entities the state container stores.

pub mod address;
pub mod cart;
pub mod favorite;
pub mod history;
pub mod id;
pub mod kind;
pub mod order;
pub mod price;
pub mod status;

pub use address::{Address, AddressInput};
pub use cart::{CartItem, Product};
pub use favorite::Favorite;
pub use history::{HistoryEntry, HistoryItem};
pub use id::*;
pub use kind::ItemKind;
pub use order::{Order, OrderLine, OrderTimestamp};
pub use price::{CurrencyCode, Price};
pub use status::OrderStatus;

/// Display fields owned by the catalog that the store carries along without
/// interpreting.
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// Drop every key of `extra` that names one of the entity's typed fields.
///
/// A flattened map holding such a key would serialize it twice, and the
/// resulting object no longer deserializes. Returns whether anything was
/// removed.
pub fn strip_owned_keys(extra: &mut Extra, owned: &[&str]) -> bool {
    let before = extra.len();
    extra.retain(|key, _| !owned.contains(&key.as_str()));
    extra.len() != before
}
