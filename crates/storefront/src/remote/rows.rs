//! Row types mirroring the remote tables.
//!
//! Column names follow the database (`snake_case`). Embedded relations
//! (`dishes` under a category, `order_items` under an order, `dishes` under an
//! order item) default to empty when the select did not ask for them.

use chrono::{DateTime, Utc};
use corner_cafe_core::{CategoryId, DishId, OrderId, OrderItemId, Price};
use serde::{Deserialize, Serialize};

const fn default_true() -> bool {
    true
}

/// `categories` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub dishes: Vec<DishRow>,
}

/// `dishes` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishRow {
    pub id: DishId,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub display_order: i32,
}

/// `orders` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: OrderId,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub queue_number: Option<u32>,
    pub total_amount: Price,
    pub status: String,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub table_number: Option<String>,
    #[serde(default)]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub estimated_ready_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub order_items: Vec<OrderItemRow>,
}

/// `order_items` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemRow {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub dish_id: DishId,
    pub quantity: u32,
    pub unit_price: Price,
    pub total_price: Price,
    #[serde(default)]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Embedded dish details, when requested.
    #[serde(default)]
    pub dishes: Option<DishSummaryRow>,
}

/// Dish columns embedded under an order item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishSummaryRow {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Insert payload for `orders`. Store-assigned columns are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrderRow {
    pub total_amount: Price,
    pub status: String,
    pub payment_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Insert payload for `order_items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrderItemRow {
    pub order_id: OrderId,
    pub dish_id: DishId,
    pub quantity: u32,
    pub unit_price: Price,
    pub total_price: Price,
}
