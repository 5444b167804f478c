//! Remote store access.
//!
//! # Architecture
//!
//! - [`RemoteStore`] is the seam every service talks through. It is injected
//!   as `Arc<dyn RemoteStore>` so tests can substitute an in-memory double.
//! - [`RestStore`] is the production implementation, speaking PostgREST
//!   (`/rest/v1/<table>`) over `reqwest`.
//! - Rows are decoded into the table-shaped types in [`rows`]; turning them
//!   into menu and order view models is the services' job.
//!
//! # Tables
//!
//! - `categories` - menu sections (`is_active`, `display_order`)
//! - `dishes` - menu items (`is_available`, `display_order`)
//! - `orders` - placed orders; `queue_number` is assigned by the store
//! - `order_items` - one row per cart line

mod rest;
pub mod rows;

pub use rest::{Query, RestStore, SortOrder, Table};
pub use rows::*;

use async_trait::async_trait;
use chrono::NaiveDate;
use corner_cafe_core::{OrderId, OrderStatus};
use thiserror::Error;

/// Error codes meaning the expected tables do not exist (yet).
const RELATION_MISSING_CODES: &[&str] = &["42P01", "PGRST205", "PGRST116"];

/// Errors that can occur when interacting with the remote store.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store rejected the request.
    #[error("API error: {status} {} - {message}", .code.as_deref().unwrap_or("-"))]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Requested row does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client could not be built from configuration.
    #[error("Invalid remote configuration: {0}")]
    Config(String),
}

impl RemoteError {
    /// Whether the error means the queried table does not exist, i.e. the
    /// backend has not been provisioned.
    #[must_use]
    pub fn is_relation_missing(&self) -> bool {
        match self {
            Self::Api { code, message, .. } => {
                code.as_deref()
                    .is_some_and(|c| RELATION_MISSING_CODES.contains(&c))
                    || message.contains("schema cache")
                    || (message.contains("relation") && message.contains("does not exist"))
            }
            _ => false,
        }
    }
}

/// Filters for listing orders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Only orders in this status.
    pub status: Option<OrderStatus>,
    /// Only orders created on this calendar day (UTC).
    pub day: Option<NaiveDate>,
}

/// Typed operations over the four record kinds the storefront uses.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Minimal read (`select id from categories limit 1`) used to check that
    /// the tables exist.
    async fn probe(&self) -> Result<(), RemoteError>;

    /// Active categories in display order, each with its available dishes
    /// embedded in display order.
    async fn fetch_menu(&self) -> Result<Vec<CategoryRow>, RemoteError>;

    /// Active categories in display order, without dishes.
    async fn fetch_categories(&self) -> Result<Vec<CategoryRow>, RemoteError>;

    /// Insert one order row and return it as stored.
    async fn insert_order(&self, order: &NewOrderRow) -> Result<OrderRow, RemoteError>;

    /// Insert a batch of order item rows.
    async fn insert_order_items(
        &self,
        items: &[NewOrderItemRow],
    ) -> Result<Vec<OrderItemRow>, RemoteError>;

    /// Read one order with its items.
    async fn fetch_order(&self, id: &OrderId) -> Result<OrderRow, RemoteError>;

    /// Overwrite an order's status and return the updated row.
    async fn update_order_status(
        &self,
        id: &OrderId,
        status: &OrderStatus,
    ) -> Result<OrderRow, RemoteError>;

    /// Orders matching `filter`, newest first, with their items.
    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<OrderRow>, RemoteError>;
}

/// Stand-in used when no endpoint is configured. Every call fails with
/// `RemoteError::Config`, so callers take their offline paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredStore;

impl UnconfiguredStore {
    fn error<T>() -> Result<T, RemoteError> {
        Err(RemoteError::Config("remote store is not configured".to_string()))
    }
}

#[async_trait]
impl RemoteStore for UnconfiguredStore {
    async fn probe(&self) -> Result<(), RemoteError> {
        Self::error()
    }

    async fn fetch_menu(&self) -> Result<Vec<CategoryRow>, RemoteError> {
        Self::error()
    }

    async fn fetch_categories(&self) -> Result<Vec<CategoryRow>, RemoteError> {
        Self::error()
    }

    async fn insert_order(&self, _order: &NewOrderRow) -> Result<OrderRow, RemoteError> {
        Self::error()
    }

    async fn insert_order_items(
        &self,
        _items: &[NewOrderItemRow],
    ) -> Result<Vec<OrderItemRow>, RemoteError> {
        Self::error()
    }

    async fn fetch_order(&self, _id: &OrderId) -> Result<OrderRow, RemoteError> {
        Self::error()
    }

    async fn update_order_status(
        &self,
        _id: &OrderId,
        _status: &OrderStatus,
    ) -> Result<OrderRow, RemoteError> {
        Self::error()
    }

    async fn list_orders(&self, _filter: &OrderFilter) -> Result<Vec<OrderRow>, RemoteError> {
        Self::error()
    }
}
