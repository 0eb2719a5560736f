//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Serialized as its integer code so snapshots stay compatible with the
/// order payloads handed to the store (`0` pending through `4` cancelled).
/// Checkout may use further intermediate codes; those are kept as
/// [`OrderStatus::Other`] and written back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "u8", into = "u8")]
pub enum OrderStatus {
    /// Placed, awaiting payment.
    #[default]
    PendingPayment,
    /// Paid, awaiting shipment.
    Paid,
    /// Shipped, awaiting receipt.
    Shipped,
    /// Received by the buyer.
    Completed,
    /// Cancelled before completion.
    Cancelled,
    /// A code outside 0-4. Build it with `OrderStatus::from(code)` so known
    /// codes map to their named variant.
    Other(u8),
}

impl OrderStatus {
    /// The named statuses in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::PendingPayment,
        Self::Paid,
        Self::Shipped,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Integer code used on the wire.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::PendingPayment => 0,
            Self::Paid => 1,
            Self::Shipped => 2,
            Self::Completed => 3,
            Self::Cancelled => 4,
            Self::Other(code) => code,
        }
    }

    /// Whether the order can no longer move to another status.
    ///
    /// Unrecognized codes are treated as in progress.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl From<u8> for OrderStatus {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::PendingPayment,
            1 => Self::Paid,
            2 => Self::Shipped,
            3 => Self::Completed,
            4 => Self::Cancelled,
            other => Self::Other(other),
        }
    }
}

impl From<OrderStatus> for u8 {
    fn from(status: OrderStatus) -> Self {
        status.code()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PendingPayment => write!(f, "pending_payment"),
            Self::Paid => write!(f, "paid"),
            Self::Shipped => write!(f, "shipped"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Other(code) => write!(f, "status_{code}"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_payment" | "pending" => Ok(Self::PendingPayment),
            "paid" => Ok(Self::Paid),
            "shipped" => Ok(Self::Shipped),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => s
                .strip_prefix("status_")
                .unwrap_or(s)
                .parse::<u8>()
                .map(Self::from)
                .map_err(|_| format!("invalid order status: {s}")),
        }
    }
}
