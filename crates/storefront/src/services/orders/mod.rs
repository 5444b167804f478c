//! Order placement and tracking.
//!
//! With a ready backend, orders are written to the remote store: the order row
//! first, then one row per cart line. Without one, a mock order is built
//! locally so the customer still gets a queue number.

mod error;

use std::ops::RangeInclusive;

use chrono::{DateTime, Duration, Utc};
use corner_cafe_core::{
    CartItem, CreateOrderRequest, MOCK_ORDER_PREFIX, MenuItem, Order, OrderId, OrderStatus,
    PaymentStatus, Price,
};
use rand::Rng;
use tracing::{error, info, instrument, warn};

pub use error::OrderError;

use crate::probe::ConfigProbe;
use crate::remote::{NewOrderItemRow, NewOrderRow, OrderFilter, OrderItemRow, OrderRow};

/// Queue numbers handed out to mock orders.
pub const MOCK_QUEUE_NUMBERS: RangeInclusive<u32> = 1..=50;

/// Minutes until a mock order is expected to be ready.
pub const MOCK_PREP_MINUTES: i64 = 15;

/// Places orders and reports their status.
#[derive(Debug, Clone)]
pub struct OrderService {
    probe: ConfigProbe,
}

impl OrderService {
    #[must_use]
    pub const fn new(probe: ConfigProbe) -> Self {
        Self { probe }
    }

    /// Place an order.
    ///
    /// Returns a mock order when the remote store is not ready. Otherwise the
    /// order and its items are written and the stored order is returned.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::InvalidRequest` for malformed requests and
    /// `OrderError::Submission` if either remote write fails. When the item
    /// write fails the order row has already been stored and is left as is.
    #[instrument(
        skip(self, request),
        fields(items = request.items.len(), total = %request.total)
    )]
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, OrderError> {
        validate(&request)?;

        if !self.probe.is_ready().await {
            let order = mock_order(request, Utc::now());
            info!(
                order_id = %order.id,
                queue_number = ?order.queue_number,
                "Remote store not ready, created mock order"
            );
            return Ok(order);
        }

        self.submit(request).await
    }

    async fn submit(&self, request: CreateOrderRequest) -> Result<Order, OrderError> {
        let store = self.probe.store();

        let new_order = NewOrderRow {
            total_amount: request.total,
            status: OrderStatus::Pending.as_str().to_string(),
            payment_status: PaymentStatus::Pending.as_str().to_string(),
            customer_name: request.customer_name.clone(),
            table_number: request.table_number.clone(),
            special_instructions: request.special_instructions.clone(),
        };

        let row = store.insert_order(&new_order).await.map_err(|e| {
            error!(error = %e, "Failed to create order");
            OrderError::Submission(e)
        })?;

        if !request.items.is_empty() {
            let lines = request
                .items
                .iter()
                .map(|line| {
                    let total_price = line.line_total().ok_or_else(|| {
                        OrderError::InvalidRequest("total out of range".to_string())
                    })?;
                    Ok(NewOrderItemRow {
                        order_id: row.id.clone(),
                        dish_id: line.item.id.clone(),
                        quantity: line.quantity,
                        unit_price: line.item.price,
                        total_price,
                    })
                })
                .collect::<Result<Vec<_>, OrderError>>()?;

            store.insert_order_items(&lines).await.map_err(|e| {
                error!(
                    error = %e,
                    order_id = %row.id,
                    "Failed to create order items, order stored without items"
                );
                OrderError::Submission(e)
            })?;
        }

        info!(
            order_id = %row.id,
            queue_number = ?row.queue_number,
            "Order created"
        );
        Ok(order_from_row(row, request.items))
    }

    /// Look up an order.
    ///
    /// Mock ids never reach the remote store: they always report a ready
    /// order, since there is nothing to track.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if no such order exists (including any
    /// non-mock id while the remote store is not configured) and
    /// `OrderError::Lookup` if the read fails.
    #[instrument(skip(self, id), fields(order_id = %id))]
    pub async fn get_order_status(&self, id: &OrderId) -> Result<Order, OrderError> {
        if id.is_mock() {
            return Ok(mock_status(id));
        }
        if !self.probe.is_configured() {
            return Err(OrderError::NotFound(id.clone()));
        }

        let row = self
            .probe
            .store()
            .fetch_order(id)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to get order status"))
            .map_err(|e| OrderError::lookup(id, e))?;

        Ok(order_with_stored_items(row))
    }

    /// Move an order forward to `next`.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotPersisted` for mock orders,
    /// `OrderError::InvalidTransition` unless `next` comes after the current
    /// status, and `OrderError::Lookup`/`OrderError::Update` on remote
    /// failures.
    #[instrument(skip(self, id, next), fields(order_id = %id, next = %next))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        next: OrderStatus,
    ) -> Result<Order, OrderError> {
        if id.is_mock() {
            return Err(OrderError::NotPersisted(id.clone()));
        }
        if !self.probe.is_configured() {
            return Err(OrderError::NotFound(id.clone()));
        }

        let store = self.probe.store();
        let current = store
            .fetch_order(id)
            .await
            .map_err(|e| OrderError::lookup(id, e))?;

        let from = parse_status(&current.status, id);
        if !from.can_advance_to(&next) {
            return Err(OrderError::InvalidTransition { from, to: next });
        }

        let updated = store
            .update_order_status(id, &next)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to update order status");
                OrderError::Update(e)
            })?;

        info!(from = %from, to = %next, "Order status updated");

        let items = current.order_items.into_iter().map(cart_line).collect();
        Ok(order_from_row(updated, items))
    }

    /// List stored orders, newest first. Empty when the remote store is not
    /// ready.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Lookup` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, OrderError> {
        if !self.probe.is_ready().await {
            return Ok(Vec::new());
        }

        let rows = self
            .probe
            .store()
            .list_orders(filter)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list orders");
                OrderError::Lookup(e)
            })?;

        Ok(rows.into_iter().map(order_with_stored_items).collect())
    }
}

fn validate(request: &CreateOrderRequest) -> Result<(), OrderError> {
    if let Some(line) = request.items.iter().find(|line| line.quantity == 0) {
        return Err(OrderError::InvalidRequest(format!(
            "quantity for {} must be at least 1",
            line.item.name
        )));
    }

    let computed = request
        .computed_total()
        .ok_or_else(|| OrderError::InvalidRequest("total out of range".to_string()))?;
    if computed != request.total {
        return Err(OrderError::InvalidRequest(format!(
            "total {} does not match items ({computed})",
            request.total
        )));
    }

    Ok(())
}

/// Build the locally synthesized stand-in for an order placed at `now`.
fn mock_order(request: CreateOrderRequest, now: DateTime<Utc>) -> Order {
    let queue_number = rand::rng().random_range(MOCK_QUEUE_NUMBERS);

    Order {
        id: OrderId::mock(now),
        order_number: None,
        items: request.items,
        total: request.total,
        status: OrderStatus::Pending,
        queue_number: Some(queue_number),
        created_at: now,
        customer_name: request.customer_name,
        table_number: request.table_number,
        special_instructions: request.special_instructions,
        estimated_ready_time: Some(now + Duration::minutes(MOCK_PREP_MINUTES)),
    }
}

/// Canned status for a mock id.
fn mock_status(id: &OrderId) -> Order {
    let created_at = id
        .as_str()
        .strip_prefix(MOCK_ORDER_PREFIX)
        .and_then(|millis| millis.parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_else(Utc::now);

    Order {
        id: id.clone(),
        order_number: None,
        items: Vec::new(),
        total: Price::ZERO,
        status: OrderStatus::Ready,
        queue_number: None,
        created_at,
        customer_name: None,
        table_number: None,
        special_instructions: None,
        estimated_ready_time: None,
    }
}

fn parse_status(raw: &str, id: &OrderId) -> OrderStatus {
    let status = OrderStatus::from(raw);
    if !status.is_known() {
        warn!(order_id = %id, status = raw, "Unrecognized order status");
    }
    status
}

fn order_with_stored_items(mut row: OrderRow) -> Order {
    let items = std::mem::take(&mut row.order_items)
        .into_iter()
        .map(cart_line)
        .collect();
    order_from_row(row, items)
}

fn order_from_row(row: OrderRow, items: Vec<CartItem>) -> Order {
    let status = parse_status(&row.status, &row.id);
    Order {
        id: row.id,
        order_number: row.order_number,
        items,
        total: row.total_amount,
        status,
        queue_number: row.queue_number,
        created_at: row.created_at,
        customer_name: row.customer_name,
        table_number: row.table_number,
        special_instructions: row.special_instructions,
        estimated_ready_time: row.estimated_ready_time,
    }
}

fn cart_line(row: OrderItemRow) -> CartItem {
    let (name, description, image) = row.dishes.map_or_else(
        || (String::new(), String::new(), String::new()),
        |dish| {
            (
                dish.name,
                dish.description.unwrap_or_default(),
                dish.image_url.unwrap_or_default(),
            )
        },
    );

    CartItem::new(
        MenuItem {
            id: row.dish_id,
            name,
            description,
            price: row.unit_price,
            image,
            is_available: None,
            is_featured: None,
            prep_time_minutes: None,
        },
        row.quantity,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use corner_cafe_core::{DishId, OrderItemId};

    use super::*;

    fn espresso() -> MenuItem {
        MenuItem {
            id: DishId::new("1"),
            name: "Espresso".to_string(),
            description: "Rich and bold espresso shot".to_string(),
            price: Price::from_units(120),
            image: String::new(),
            is_available: None,
            is_featured: None,
            prep_time_minutes: None,
        }
    }

    fn request(quantity: u32, total: u32) -> CreateOrderRequest {
        CreateOrderRequest {
            items: vec![CartItem::new(espresso(), quantity)],
            total: Price::from_units(total),
            table_number: Some("4".to_string()),
            ..CreateOrderRequest::default()
        }
    }

    #[test]
    fn test_validate_accepts_matching_total() {
        assert!(validate(&request(2, 240)).is_ok());
    }

    #[test]
    fn test_validate_accepts_empty_cart_with_zero_total() {
        assert!(validate(&CreateOrderRequest::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        let err = validate(&request(0, 0)).unwrap_err();
        assert!(matches!(err, OrderError::InvalidRequest(msg) if msg.contains("Espresso")));
    }

    #[test]
    fn test_validate_rejects_total_mismatch() {
        let err = validate(&request(2, 200)).unwrap_err();
        assert!(matches!(err, OrderError::InvalidRequest(_)));
    }

    #[test]
    fn test_validate_rejects_overflowing_total() {
        let near_max = rust_decimal::Decimal::from_str_exact("70000000000000000000000000000");
        let mut request = request(2, 0);
        request.items[0].item.price = Price::new(near_max.unwrap()).unwrap();

        let err = validate(&request).unwrap_err();
        assert!(matches!(err, OrderError::InvalidRequest(msg) if msg == "total out of range"));
    }

    #[test]
    fn test_mock_order_fields() {
        let now = Utc::now();
        let order = mock_order(request(1, 120), now);

        assert!(order.is_mock());
        assert_eq!(order.id, OrderId::mock(now));
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(MOCK_QUEUE_NUMBERS.contains(&order.queue_number.unwrap()));
        assert_eq!(
            order.estimated_ready_time,
            Some(now + Duration::minutes(MOCK_PREP_MINUTES))
        );
        assert_eq!(order.table_number.as_deref(), Some("4"));
        assert_eq!(order.items.len(), 1);
    }

    #[test]
    fn test_mock_status_is_ready_and_keeps_creation_time() {
        let at = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let order = mock_status(&OrderId::mock(at));
        assert_eq!(order.status, OrderStatus::Ready);
        assert_eq!(order.created_at, at);
        assert!(order.items.is_empty());
    }

    #[test]
    fn test_order_from_row_passes_unknown_status_through() {
        let row = OrderRow {
            id: OrderId::new("o1"),
            order_number: Some("ORD-0001".to_string()),
            queue_number: Some(3),
            total_amount: Price::from_units(240),
            status: "on_hold".to_string(),
            payment_status: None,
            payment_method: None,
            customer_name: None,
            customer_phone: None,
            table_number: None,
            special_instructions: None,
            estimated_ready_time: None,
            created_at: Utc::now(),
            order_items: vec![OrderItemRow {
                id: OrderItemId::new("i1"),
                order_id: OrderId::new("o1"),
                dish_id: DishId::new("1"),
                quantity: 2,
                unit_price: Price::from_units(120),
                total_price: Price::from_units(240),
                special_instructions: None,
                created_at: None,
                dishes: None,
            }],
        };

        let order = order_with_stored_items(row);
        assert_eq!(order.status, OrderStatus::Unrecognized("on_hold".to_string()));
        assert_eq!(order.queue_number, Some(3));
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.items[0].item.name, "");
    }
}
