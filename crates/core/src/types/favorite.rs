//! Favorited catalog items.

use serde::{Deserialize, Serialize};

use super::{Extra, ItemId, ItemKind, strip_owned_keys};

/// A catalog item the user has favorited.
///
/// Holds a denormalized copy of the catalog display fields; anything the
/// store does not interpret is kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    /// Catalog item ID.
    pub id: ItemId,
    /// Catalog family, serialized as `type`.
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Remaining catalog display fields.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Favorite {
    /// Create a favorite with no extra display fields.
    #[must_use]
    pub fn new(id: ItemId, kind: ItemKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            image: None,
            extra: Extra::new(),
        }
    }

    /// Wire names of the typed fields.
    pub const OWNED_KEYS: &'static [&'static str] = &["id", "type", "name", "image"];

    /// Remove extras that collide with typed fields. Returns whether any did.
    pub fn strip_owned_extras(&mut self) -> bool {
        strip_owned_keys(&mut self.extra, Self::OWNED_KEYS)
    }
}
