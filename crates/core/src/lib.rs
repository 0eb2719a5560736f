//! Heritage Mall Core - Shared domain types.
//!
//! This crate provides the entity types held by the client state container:
//! - `store` - The state container, derived views, and durability layer
//! - `cli` - Command-line front end for driving a file-backed store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! logging. Invariants that span a collection (unique ids, a single default
//! address, the history bound) are enforced by the store, not here.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, statuses, and the persisted entities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
