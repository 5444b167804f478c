//! Integration test support for Corner Cafe.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p corner-cafe-integration-tests
//! ```
//!
//! No external services are needed: [`InMemoryStore`] stands in for the
//! remote store, and `tests/rest_store.rs` starts a local fake of the REST
//! interface.
//!
//! # Test Categories
//!
//! - `menu_fallback` - remote, cache and bundled menu tiers
//! - `order_submission` - order writes, mock orders, status tracking
//! - `rest_store` - the REST client against a fake server

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use corner_cafe_core::{CategoryId, DishId, OrderId, OrderItemId, OrderStatus, Price};
use corner_cafe_storefront::config::RemoteConfig;
use corner_cafe_storefront::probe::ConfigProbe;
use corner_cafe_storefront::remote::{
    CategoryRow, DishRow, DishSummaryRow, NewOrderItemRow, NewOrderRow, OrderFilter,
    OrderItemRow, OrderRow, RemoteError, RemoteStore,
};
use secrecy::SecretString;

/// Remote store operations, for call counting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Probe,
    FetchMenu,
    FetchCategories,
    InsertOrder,
    InsertOrderItems,
    FetchOrder,
    UpdateOrderStatus,
    ListOrders,
}

#[derive(Debug, Default)]
struct StoreData {
    categories: Vec<CategoryRow>,
    orders: Vec<OrderRow>,
    items: Vec<OrderItemRow>,
    calls: HashMap<Op, usize>,
    failing: HashSet<Op>,
    tables_missing: bool,
}

/// In-memory remote store.
///
/// Assigns ids, order numbers and queue numbers the way the real store does,
/// counts calls per operation, and can be told to fail any operation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    data: Arc<Mutex<StoreData>>,
}

impl InMemoryStore {
    /// An empty, provisioned store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding `categories`.
    #[must_use]
    pub fn with_menu(categories: Vec<CategoryRow>) -> Self {
        let store = Self::new();
        store.lock().categories = categories;
        store
    }

    /// Make `op` fail with a server error from now on.
    pub fn fail(&self, op: Op) {
        self.lock().failing.insert(op);
    }

    /// Make `op` succeed again.
    pub fn recover(&self, op: Op) {
        self.lock().failing.remove(&op);
    }

    /// Behave like a project whose tables were never created.
    pub fn drop_tables(&self) {
        self.lock().tables_missing = true;
    }

    /// Times `op` was called.
    #[must_use]
    pub fn calls(&self, op: Op) -> usize {
        self.lock().calls.get(&op).copied().unwrap_or(0)
    }

    /// Total calls across all operations.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.lock().calls.values().sum()
    }

    /// Stored order rows, in insertion order.
    #[must_use]
    pub fn orders(&self) -> Vec<OrderRow> {
        self.lock().orders.clone()
    }

    /// Stored order item rows, in insertion order.
    #[must_use]
    pub fn order_items(&self) -> Vec<OrderItemRow> {
        self.lock().items.clone()
    }

    /// Shift an order's creation time, for date filter tests.
    pub fn backdate(&self, id: &OrderId, by: Duration) {
        let mut data = self.lock();
        if let Some(order) = data.orders.iter_mut().find(|o| &o.id == id) {
            order.created_at -= by;
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count the call and apply injected failures.
    fn enter(&self, op: Op) -> Result<MutexGuard<'_, StoreData>, RemoteError> {
        let mut data = self.lock();
        *data.calls.entry(op).or_default() += 1;

        if data.tables_missing {
            return Err(RemoteError::Api {
                status: 404,
                code: Some("PGRST205".to_string()),
                message: "Could not find the table 'public.categories' in the schema cache"
                    .to_string(),
            });
        }
        if data.failing.contains(&op) {
            return Err(RemoteError::Api {
                status: 500,
                code: Some("XX000".to_string()),
                message: format!("injected failure in {op:?}"),
            });
        }
        Ok(data)
    }
}

impl StoreData {
    fn with_items(&self, order: &OrderRow) -> OrderRow {
        let mut order = order.clone();
        order.order_items = self
            .items
            .iter()
            .filter(|item| item.order_id == order.id)
            .map(|item| {
                let mut item = item.clone();
                item.dishes = self.dish_summary(&item.dish_id);
                item
            })
            .collect();
        order
    }

    fn dish_summary(&self, id: &DishId) -> Option<DishSummaryRow> {
        self.categories
            .iter()
            .flat_map(|c| c.dishes.iter())
            .find(|d| &d.id == id)
            .map(|d| DishSummaryRow {
                name: d.name.clone(),
                description: d.description.clone(),
                image_url: d.image_url.clone(),
            })
    }

    fn sorted_categories(&self) -> Vec<CategoryRow> {
        let mut categories = self.categories.clone();
        categories.sort_by_key(|c| c.display_order);
        categories
    }
}

#[async_trait]
impl RemoteStore for InMemoryStore {
    async fn probe(&self) -> Result<(), RemoteError> {
        self.enter(Op::Probe).map(|_| ())
    }

    async fn fetch_menu(&self) -> Result<Vec<CategoryRow>, RemoteError> {
        let data = self.enter(Op::FetchMenu)?;
        Ok(data.sorted_categories())
    }

    async fn fetch_categories(&self) -> Result<Vec<CategoryRow>, RemoteError> {
        let data = self.enter(Op::FetchCategories)?;
        Ok(data
            .sorted_categories()
            .into_iter()
            .map(|mut c| {
                c.dishes.clear();
                c
            })
            .collect())
    }

    async fn insert_order(&self, order: &NewOrderRow) -> Result<OrderRow, RemoteError> {
        let mut data = self.enter(Op::InsertOrder)?;
        let n = data.orders.len() + 1;
        let queue_number = u32::try_from(n).unwrap_or(u32::MAX);

        let row = OrderRow {
            id: OrderId::new(format!("order-{n}")),
            order_number: Some(format!("ORD-{n:04}")),
            queue_number: Some(queue_number),
            total_amount: order.total_amount,
            status: order.status.clone(),
            payment_status: Some(order.payment_status.clone()),
            payment_method: None,
            customer_name: order.customer_name.clone(),
            customer_phone: None,
            table_number: order.table_number.clone(),
            special_instructions: order.special_instructions.clone(),
            estimated_ready_time: None,
            created_at: Utc::now(),
            order_items: Vec::new(),
        };
        data.orders.push(row.clone());
        Ok(row)
    }

    async fn insert_order_items(
        &self,
        items: &[NewOrderItemRow],
    ) -> Result<Vec<OrderItemRow>, RemoteError> {
        let mut data = self.enter(Op::InsertOrderItems)?;
        let mut stored = Vec::with_capacity(items.len());
        for item in items {
            let row = OrderItemRow {
                id: OrderItemId::new(format!("item-{}", data.items.len() + 1)),
                order_id: item.order_id.clone(),
                dish_id: item.dish_id.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                total_price: item.total_price,
                special_instructions: None,
                created_at: Some(Utc::now()),
                dishes: None,
            };
            data.items.push(row.clone());
            stored.push(row);
        }
        Ok(stored)
    }

    async fn fetch_order(&self, id: &OrderId) -> Result<OrderRow, RemoteError> {
        let data = self.enter(Op::FetchOrder)?;
        data.orders
            .iter()
            .find(|o| &o.id == id)
            .map(|o| data.with_items(o))
            .ok_or_else(|| RemoteError::NotFound(format!("order {id}")))
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: &OrderStatus,
    ) -> Result<OrderRow, RemoteError> {
        let mut data = self.enter(Op::UpdateOrderStatus)?;
        let order = data
            .orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| RemoteError::NotFound(format!("order {id}")))?;
        order.status = status.as_str().to_string();
        Ok(order.clone())
    }

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<OrderRow>, RemoteError> {
        let data = self.enter(Op::ListOrders)?;
        let mut orders: Vec<OrderRow> = data
            .orders
            .iter()
            .rev()
            .filter(|o| {
                filter
                    .status
                    .as_ref()
                    .is_none_or(|status| o.status == status.as_str())
            })
            .filter(|o| filter.day.is_none_or(|day| o.created_at.date_naive() == day))
            .map(|o| data.with_items(o))
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Remote configuration that passes the placeholder checks.
#[must_use]
pub fn remote_config(url: &str) -> RemoteConfig {
    RemoteConfig {
        url: Some(url.to_string()),
        anon_key: Some(SecretString::from("sb-test-anon-key-0123456789")),
        timeout: std::time::Duration::from_secs(5),
    }
}

/// A probe over `store` that considers the backend configured.
#[must_use]
pub fn configured_probe(store: &InMemoryStore) -> ConfigProbe {
    ConfigProbe::with_configured(true, Arc::new(store.clone()))
}

/// A probe over `store` that considers the backend not configured.
#[must_use]
pub fn unconfigured_probe(store: &InMemoryStore) -> ConfigProbe {
    ConfigProbe::with_configured(false, Arc::new(store.clone()))
}

/// An available dish row.
#[must_use]
pub fn dish(id: &str, name: &str, price: u32, display_order: i32) -> DishRow {
    DishRow {
        id: DishId::new(id),
        category_id: None,
        name: name.to_string(),
        description: Some(format!("{name} description")),
        price: Price::from_units(price),
        image_url: Some(format!("https://img.example/{id}.jpg")),
        is_available: true,
        is_featured: None,
        prep_time_minutes: Some(5),
        display_order,
    }
}

/// An active category row.
#[must_use]
pub fn category(id: &str, name: &str, display_order: i32, dishes: Vec<DishRow>) -> CategoryRow {
    CategoryRow {
        id: CategoryId::new(id),
        name: name.to_string(),
        slug: Some(name.to_lowercase()),
        description: None,
        display_order,
        is_active: true,
        dishes,
    }
}

/// A small remote menu: coffee and pastries.
#[must_use]
pub fn remote_menu() -> Vec<CategoryRow> {
    vec![
        category(
            "c-coffee",
            "Coffee",
            1,
            vec![dish("d-latte", "Latte", 170, 2), dish("d-espresso", "Espresso", 120, 1)],
        ),
        category(
            "c-pastries",
            "Pastries",
            2,
            vec![dish("d-croissant", "Croissant", 150, 1)],
        ),
    ]
}
