//! Subcommand groups.
//!
//! Each group parses its own arguments, commits through the store, and
//! returns the JSON to print.

pub mod address;
pub mod cart;
pub mod favorite;
pub mod history;
pub mod order;

pub use address::AddressAction;
pub use cart::CartAction;
pub use favorite::FavoriteAction;
pub use history::HistoryAction;
pub use order::OrderAction;

use heritage_mall_store::{PersistenceError, StoreError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The store rejected the mutation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Reading or clearing the snapshot failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Output could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The command cannot run against the current state.
    #[error("{0}")]
    Precondition(&'static str),

    /// Snapshot writes failed; the change will not survive this process.
    #[error("{0} snapshot write(s) failed; changes were not saved")]
    NotSaved(u64),
}
