//! `mall-cli favorite ...`

use clap::Subcommand;
use serde_json::{Value, json};

use heritage_mall_core::{Favorite, ItemId, ItemKind};
use heritage_mall_store::{KeyValueStore, Store};

use super::CliError;

#[derive(Subcommand)]
pub enum FavoriteAction {
    /// Favorite an item (no-op if already favorited)
    Add {
        #[arg(long)]
        id: ItemId,
        #[arg(long)]
        name: String,
        /// `intangible` or `cultural`
        #[arg(long, default_value = "cultural")]
        kind: ItemKind,
        #[arg(long)]
        image: Option<String>,
    },
    /// Remove a favorite
    Remove {
        #[arg(long)]
        id: ItemId,
    },
    /// List favorites, optionally of one kind
    List {
        #[arg(long)]
        kind: Option<ItemKind>,
    },
}

pub fn run<S: KeyValueStore>(store: &mut Store<S>, action: FavoriteAction) -> Result<Value, CliError> {
    match action {
        FavoriteAction::Add {
            id,
            name,
            kind,
            image,
        } => {
            let mut favorite = Favorite::new(id, kind, name);
            favorite.image = image;
            store.add_favorite(favorite)?;
        }
        FavoriteAction::Remove { id } => store.remove_favorite(id)?,
        FavoriteAction::List { kind: Some(kind) } => {
            return Ok(serde_json::to_value(store.state().favorites_of_kind(kind))?);
        }
        FavoriteAction::List { kind: None } => {}
    }

    let state = store.state();
    Ok(json!({
        "favorites": state.all_favorites(),
        "intangible": state.intangible_favorites().len(),
        "cultural": state.cultural_favorites().len(),
    }))
}
