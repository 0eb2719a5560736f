//! Orders and their lifecycle timestamps.
//!
//! Orders are produced by checkout outside the store and handed over as
//! payloads; the store only moves them through [`OrderStatus`] and stamps
//! the matching [`OrderTimestamp`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Address, CartItem, Extra, ItemId, OrderId, OrderStatus, strip_owned_keys};

/// One purchased line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub price: Decimal,
    pub quantity: u32,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            image: item.image.clone(),
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// An order placed by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<OrderLine>,
    /// Amount charged; when absent the line items are summed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,
    /// Shipping address as it was at checkout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipped_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Set only when the order is cancelled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    /// Remaining checkout payload fields.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Order {
    /// A pending order with no lines.
    #[must_use]
    pub fn new(id: OrderId) -> Self {
        Self {
            id,
            status: OrderStatus::PendingPayment,
            items: Vec::new(),
            total_amount: None,
            address: None,
            created_at: None,
            paid_at: None,
            shipped_at: None,
            completed_at: None,
            cancelled_at: None,
            cancel_reason: None,
            extra: Extra::new(),
        }
    }

    /// Amount charged for the order.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.total_amount.unwrap_or_else(|| {
            self.items
                .iter()
                .map(|line| line.price * Decimal::from(line.quantity))
                .sum()
        })
    }

    /// Wire names of the typed fields.
    pub const OWNED_KEYS: &'static [&'static str] = &[
        "id",
        "status",
        "items",
        "totalAmount",
        "address",
        "createdAt",
        "paidAt",
        "shippedAt",
        "completedAt",
        "cancelledAt",
        "cancelReason",
    ];

    /// Remove extras that collide with typed fields. Returns whether any did.
    pub fn strip_owned_extras(&mut self) -> bool {
        strip_owned_keys(&mut self.extra, Self::OWNED_KEYS)
    }

    /// Set the lifecycle field named by `field`.
    ///
    /// A custom field is written into `extra` as an RFC 3339 string; a custom
    /// name that collides with a typed field is ignored.
    pub fn stamp(&mut self, field: OrderTimestamp, at: DateTime<Utc>) {
        let slot = match field {
            OrderTimestamp::Created => &mut self.created_at,
            OrderTimestamp::Paid => &mut self.paid_at,
            OrderTimestamp::Shipped => &mut self.shipped_at,
            OrderTimestamp::Completed => &mut self.completed_at,
            OrderTimestamp::Cancelled => &mut self.cancelled_at,
            OrderTimestamp::Custom(name) => {
                if !Self::OWNED_KEYS.contains(&name.as_str()) {
                    self.extra
                        .insert(name, serde_json::Value::String(at.to_rfc3339()));
                }
                return;
            }
        };
        *slot = Some(at);
    }

    /// Read the lifecycle field named by `field`.
    #[must_use]
    pub fn timestamp(&self, field: &OrderTimestamp) -> Option<DateTime<Utc>> {
        match field {
            OrderTimestamp::Created => self.created_at,
            OrderTimestamp::Paid => self.paid_at,
            OrderTimestamp::Shipped => self.shipped_at,
            OrderTimestamp::Completed => self.completed_at,
            OrderTimestamp::Cancelled => self.cancelled_at,
            OrderTimestamp::Custom(name) => self
                .extra
                .get(name)
                .and_then(serde_json::Value::as_str)
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map(|at| at.with_timezone(&Utc)),
        }
    }
}

/// Names a lifecycle timestamp on [`Order`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderTimestamp {
    Created,
    Paid,
    Shipped,
    Completed,
    Cancelled,
    /// Any other checkout-defined field, stored in the order's extras.
    Custom(String),
}

impl OrderTimestamp {
    /// The timestamp that normally accompanies a move into `status`.
    #[must_use]
    pub const fn for_status(status: OrderStatus) -> Option<Self> {
        match status {
            OrderStatus::PendingPayment => Some(Self::Created),
            OrderStatus::Paid => Some(Self::Paid),
            OrderStatus::Shipped => Some(Self::Shipped),
            OrderStatus::Completed => Some(Self::Completed),
            OrderStatus::Cancelled => Some(Self::Cancelled),
            OrderStatus::Other(_) => None,
        }
    }
}

impl std::str::FromStr for OrderTimestamp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" | "createdAt" | "createTime" => Ok(Self::Created),
            "paid" | "paidAt" | "payTime" => Ok(Self::Paid),
            "shipped" | "shippedAt" | "shipTime" => Ok(Self::Shipped),
            "completed" | "completedAt" | "completeTime" => Ok(Self::Completed),
            "cancelled" | "cancelledAt" | "cancelTime" => Ok(Self::Cancelled),
            _ if Order::OWNED_KEYS.contains(&s) => {
                Err(format!("`{s}` is not a timestamp field"))
            }
            _ if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') => {
                Ok(Self::Custom(s.to_string()))
            }
            _ => Err(format!("invalid order timestamp field: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_stamp_sets_named_field() {
        let mut order = Order::new(OrderId::new(1));
        order.stamp(OrderTimestamp::Shipped, at("2026-05-02T10:00:00Z"));

        assert_eq!(
            order.timestamp(&OrderTimestamp::Shipped),
            Some(at("2026-05-02T10:00:00Z"))
        );
        assert!(order.paid_at.is_none());
    }

    #[test]
    fn test_total_prefers_charged_amount() {
        let mut order = Order::new(OrderId::new(1));
        order.items.push(OrderLine {
            id: ItemId::new(1),
            name: "Silk fan".to_string(),
            image: None,
            price: Decimal::new(3000, 2),
            quantity: 2,
        });
        assert_eq!(order.total(), Decimal::from(60));

        order.total_amount = Some(Decimal::from(55));
        assert_eq!(order.total(), Decimal::from(55));
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{"id":1700000000001,"status":4,"cancelReason":"out of stock","remark":"gift wrap"}"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.cancel_reason.as_deref(), Some("out of stock"));
        assert_eq!(order.extra.get("remark").unwrap(), "gift wrap");

        let back = serde_json::to_value(&order).unwrap();
        assert_eq!(back["status"], 4);
        assert_eq!(back["cancelReason"], "out of stock");
        assert!(back.get("paidAt").is_none());
    }

    #[test]
    fn test_timestamp_field_names() {
        assert_eq!(
            "paidAt".parse::<OrderTimestamp>().unwrap(),
            OrderTimestamp::Paid
        );
        assert_eq!(
            OrderTimestamp::for_status(OrderStatus::Shipped),
            Some(OrderTimestamp::Shipped)
        );
        assert_eq!(OrderTimestamp::for_status(OrderStatus::Other(6)), None);
        assert_eq!(
            "deliveredAt".parse::<OrderTimestamp>().unwrap(),
            OrderTimestamp::Custom("deliveredAt".to_string())
        );
        assert!("status".parse::<OrderTimestamp>().is_err());
        assert!("".parse::<OrderTimestamp>().is_err());
        assert!("paid at".parse::<OrderTimestamp>().is_err());
    }

    #[test]
    fn test_custom_stamp_lands_in_extra() {
        let mut order = Order::new(OrderId::new(1));
        let field: OrderTimestamp = "refundTime".parse().unwrap();
        order.stamp(field.clone(), at("2026-05-03T09:30:00Z"));

        assert_eq!(order.timestamp(&field), Some(at("2026-05-03T09:30:00Z")));
        let back: Order =
            serde_json::from_str(&serde_json::to_string(&order).unwrap()).unwrap();
        assert_eq!(back.timestamp(&field), Some(at("2026-05-03T09:30:00Z")));

        // A custom name that shadows a typed field is never written.
        order.stamp(
            OrderTimestamp::Custom("status".to_string()),
            at("2026-05-03T09:30:00Z"),
        );
        assert!(!order.extra.contains_key("status"));
    }

    #[test]
    fn test_strip_owned_extras() {
        let mut order = Order::new(OrderId::new(1));
        order.extra.insert("status".to_string(), serde_json::json!(3));
        order.extra.insert("remark".to_string(), serde_json::json!("gift"));

        assert!(order.strip_owned_extras());
        let back: Order =
            serde_json::from_str(&serde_json::to_string(&order).unwrap()).unwrap();
        assert_eq!(back, order);
        assert_eq!(back.status, OrderStatus::PendingPayment);
    }
}
