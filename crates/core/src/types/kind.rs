//! Catalog item kinds.

use serde::{Deserialize, Serialize};

/// The two catalog families the mall sells and displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// An intangible cultural heritage item.
    Intangible,
    /// A cultural creative product.
    #[default]
    Cultural,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intangible => write!(f, "intangible"),
            Self::Cultural => write!(f, "cultural"),
        }
    }
}

impl std::str::FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intangible" => Ok(Self::Intangible),
            "cultural" => Ok(Self::Cultural),
            _ => Err(format!("invalid item kind: {s}")),
        }
    }
}
