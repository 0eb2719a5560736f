//! Browse history entries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ItemId, ItemKind};

/// A catalog item as reported by a detail page when it is viewed.
///
/// Heritage items carry `category`, `region` and `year`; cultural products
/// carry `shop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HistoryEntry {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<ItemKind>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub shop: Option<String>,
}

impl HistoryEntry {
    /// Normalize into the stored shape, stamped with the viewing time.
    #[must_use]
    pub fn into_item(self, time: DateTime<Utc>) -> HistoryItem {
        HistoryItem {
            id: self.id,
            name: self.name,
            image: self.image,
            time,
            kind: self.kind.unwrap_or_default(),
            price: self.price,
            category: self.category,
            region: self.region,
            year: self.year,
            shop: self.shop,
        }
    }
}

/// A stored browse history row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// When the item was viewed.
    pub time: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_into_item_defaults_kind_to_cultural() {
        let time = DateTime::parse_from_rfc3339("2026-03-01T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let item = HistoryEntry {
            id: ItemId::new(5),
            name: "Celadon bowl".to_string(),
            shop: Some("Longquan Kiln".to_string()),
            ..HistoryEntry::default()
        }
        .into_item(time);

        assert_eq!(item.kind, ItemKind::Cultural);
        assert_eq!(item.time, time);
        assert_eq!(item.shop.as_deref(), Some("Longquan Kiln"));
    }

    #[test]
    fn test_into_item_keeps_explicit_kind() {
        let item = HistoryEntry {
            id: ItemId::new(9),
            kind: Some(ItemKind::Intangible),
            year: Some(2006),
            ..HistoryEntry::default()
        }
        .into_item(Utc::now());

        assert_eq!(item.kind, ItemKind::Intangible);
        assert_eq!(item.year, Some(2006));
    }
}
