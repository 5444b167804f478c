//! Status enums for orders.

use serde::{Deserialize, Serialize};

/// Kitchen progress of an order.
///
/// Progression is forward-only:
/// `pending -> confirmed -> preparing -> ready -> completed`.
///
/// The remote store keeps the status as free text. Values outside the five
/// known states are carried through verbatim as [`OrderStatus::Unrecognized`]
/// instead of being rejected, so a newer backend can introduce states without
/// breaking order lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    /// A status string the store returned that is not one of the known states.
    Unrecognized(String),
}

impl OrderStatus {
    /// The stored string form of this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Unrecognized(raw) => raw.as_str(),
        }
    }

    /// Position in the forward progression, `None` for unrecognized values.
    #[must_use]
    pub const fn rank(&self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Confirmed => Some(1),
            Self::Preparing => Some(2),
            Self::Ready => Some(3),
            Self::Completed => Some(4),
            Self::Unrecognized(_) => None,
        }
    }

    /// Whether this is one of the five known states.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        self.rank().is_some()
    }

    /// Whether an order may move from `self` to `next`.
    ///
    /// Only strictly forward moves between known states are allowed; skipping
    /// intermediate states is fine.
    #[must_use]
    pub fn can_advance_to(&self, next: &Self) -> bool {
        matches!((self.rank(), next.rank()), (Some(from), Some(to)) if to > from)
    }
}

impl From<&str> for OrderStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "preparing" => Self::Preparing,
            "ready" => Self::Ready,
            "completed" => Self::Completed,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        match Self::from(s.as_str()) {
            Self::Unrecognized(_) => Self::Unrecognized(s),
            known => known,
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment state recorded alongside an order.
///
/// Payments are taken at the counter; orders are always created `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
}

impl PaymentStatus {
    /// The stored string form of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
        }
    }
}
