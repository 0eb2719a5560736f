//! Heritage Mall Store - client-side application state container.
//!
//! Holds favorites, the shopping cart, saved addresses, browse history and
//! orders for one user session, and keeps a snapshot of them in a key-value
//! slot so they survive restarts.
//!
//! # Architecture
//!
//! - [`Store`] owns the state. Every change is a [`Mutation`] applied through
//!   [`Store::commit`]; the named methods on `Store` are thin wrappers.
//! - [`StoreState`] exposes the derived views (totals, filters, the resolved
//!   shipping address). They are recomputed on every read.
//! - [`persistence`] defines the snapshot schema and the slot it is written
//!   to after each committed mutation; [`storage`] provides the backends.
//!
//! The store is single-threaded: mutations take `&mut self` and run to
//! completion, including the snapshot write, before returning.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod mutation;
pub mod persistence;
pub mod state;
pub mod storage;
pub mod store;
mod views;

pub use config::{ConfigError, LogFormat, StoreConfig};
pub use error::{Result, StoreError};
pub use mutation::Mutation;
pub use persistence::{PersistedState, PersistenceError, SnapshotSlot};
pub use state::StoreState;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::Store;
