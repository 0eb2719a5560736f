//! `mall-cli history ...`

use chrono::{DateTime, Utc};
use clap::Subcommand;
use rust_decimal::Decimal;
use serde_json::Value;

use heritage_mall_core::{HistoryEntry, ItemId, ItemKind};
use heritage_mall_store::{KeyValueStore, Store};

use super::CliError;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Record a view of an item
    Add {
        #[arg(long)]
        id: ItemId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        kind: Option<ItemKind>,
        #[arg(long)]
        price: Option<Decimal>,
        /// Heritage category
        #[arg(long)]
        category: Option<String>,
        /// Heritage region of origin
        #[arg(long)]
        region: Option<String>,
        /// Year of heritage listing
        #[arg(long)]
        year: Option<i32>,
        /// Shop selling a cultural product
        #[arg(long)]
        shop: Option<String>,
        /// Viewing time as RFC 3339 (default: now)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Remove an item from the history
    Remove {
        #[arg(long)]
        id: ItemId,
    },
    /// Forget the whole history
    Clear,
    /// List history, newest first
    List,
}

pub fn run<S: KeyValueStore>(
    store: &mut Store<S>,
    action: HistoryAction,
) -> Result<Value, CliError> {
    match action {
        HistoryAction::Add {
            id,
            name,
            kind,
            price,
            category,
            region,
            year,
            shop,
            at,
        } => {
            let entry = HistoryEntry {
                id,
                name,
                image: None,
                kind,
                price,
                category,
                region,
                year,
                shop,
            };
            match at {
                Some(time) => store.add_to_history_at(entry, time)?,
                None => store.add_to_history(entry)?,
            }
        }
        HistoryAction::Remove { id } => store.remove_from_history(id)?,
        HistoryAction::Clear => store.clear_history()?,
        HistoryAction::List => {}
    }
    Ok(serde_json::to_value(store.state().browse_history())?)
}
