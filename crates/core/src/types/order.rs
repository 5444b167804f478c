//! Orders and order requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::{CartItem, cart_total};
use super::id::OrderId;
use super::price::Price;
use super::status::OrderStatus;

/// An order as seen by the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    pub items: Vec<CartItem>,
    pub total: Price,
    pub status: OrderStatus,
    /// Position in the pickup queue, assigned by the remote store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_number: Option<u32>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_ready_time: Option<DateTime<Utc>>,
}

impl Order {
    /// Whether this order was synthesized locally.
    #[must_use]
    pub fn is_mock(&self) -> bool {
        self.id.is_mock()
    }
}

/// Everything needed to place an order from a cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<CartItem>,
    pub total: Price,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub table_number: Option<String>,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

impl CreateOrderRequest {
    /// Sum of price × quantity over the requested items, or `None` if the
    /// amounts overflow.
    #[must_use]
    pub fn computed_total(&self) -> Option<Price> {
        cart_total(&self.items)
    }
}
