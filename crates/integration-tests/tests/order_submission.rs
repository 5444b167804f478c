//! Integration tests for order placement and tracking.

#![allow(clippy::unwrap_used)]

use chrono::{Duration, Utc};
use corner_cafe_core::{
    CartItem, CreateOrderRequest, DishId, MenuItem, OrderId, OrderStatus, Price,
};
use corner_cafe_integration_tests::{
    InMemoryStore, Op, configured_probe, remote_menu, unconfigured_probe,
};
use corner_cafe_storefront::remote::OrderFilter;
use corner_cafe_storefront::services::{OrderError, OrderService};

fn item(id: &str, name: &str, price: u32) -> MenuItem {
    MenuItem {
        id: DishId::new(id),
        name: name.to_string(),
        description: String::new(),
        price: Price::from_units(price),
        image: String::new(),
        is_available: Some(true),
        is_featured: None,
        prep_time_minutes: None,
    }
}

/// Two lattes and a croissant: 2 x 170 + 150 = 490.
fn latte_order() -> CreateOrderRequest {
    CreateOrderRequest {
        items: vec![
            CartItem::new(item("d-latte", "Latte", 170), 2),
            CartItem::new(item("d-croissant", "Croissant", 150), 1),
        ],
        total: Price::from_units(490),
        customer_name: Some("Sam".to_string()),
        table_number: Some("4".to_string()),
        special_instructions: Some("Oat milk".to_string()),
    }
}

fn connected() -> (InMemoryStore, OrderService) {
    let store = InMemoryStore::with_menu(remote_menu());
    let orders = OrderService::new(configured_probe(&store));
    (store, orders)
}

// =============================================================================
// Submission
// =============================================================================

#[tokio::test]
async fn test_order_and_items_are_written() {
    let (store, orders) = connected();

    let order = orders.create_order(latte_order()).await.unwrap();

    assert!(!order.is_mock());
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.queue_number, Some(1));
    assert_eq!(order.total, Price::from_units(490));
    assert_eq!(order.items.len(), 2);

    let rows = store.orders();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, "pending");
    assert_eq!(rows[0].payment_status.as_deref(), Some("pending"));
    assert_eq!(rows[0].special_instructions.as_deref(), Some("Oat milk"));

    let items = store.order_items();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.order_id == order.id));
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[0].unit_price, Price::from_units(170));
    assert_eq!(items[0].total_price, Price::from_units(340));
}

#[tokio::test]
async fn test_queue_numbers_come_from_the_store() {
    let (_store, orders) = connected();
    let first = orders.create_order(latte_order()).await.unwrap();
    let second = orders.create_order(latte_order()).await.unwrap();
    assert_eq!(first.queue_number, Some(1));
    assert_eq!(second.queue_number, Some(2));
}

#[tokio::test]
async fn test_empty_cart_is_accepted_without_item_write() {
    let (store, orders) = connected();

    let order = orders
        .create_order(CreateOrderRequest::default())
        .await
        .unwrap();

    assert_eq!(order.total, Price::ZERO);
    assert!(order.items.is_empty());
    assert_eq!(store.calls(Op::InsertOrder), 1);
    assert_eq!(store.calls(Op::InsertOrderItems), 0);
}

#[tokio::test]
async fn test_order_write_failure_skips_items() {
    let (store, orders) = connected();
    store.fail(Op::InsertOrder);

    let err = orders.create_order(latte_order()).await.unwrap_err();

    assert!(matches!(err, OrderError::Submission(_)));
    assert_eq!(err.to_string(), "Failed to create order. Please try again.");
    assert_eq!(store.calls(Op::InsertOrderItems), 0);
    assert!(store.orders().is_empty());
}

#[tokio::test]
async fn test_item_write_failure_leaves_order_row() {
    let (store, orders) = connected();
    store.fail(Op::InsertOrderItems);

    let err = orders.create_order(latte_order()).await.unwrap_err();

    assert!(matches!(err, OrderError::Submission(_)));
    assert_eq!(store.orders().len(), 1);
    assert!(store.order_items().is_empty());
}

#[tokio::test]
async fn test_invalid_request_never_reaches_store() {
    let (store, orders) = connected();
    let mut request = latte_order();
    request.total = Price::from_units(1);

    let err = orders.create_order(request).await.unwrap_err();

    assert!(matches!(err, OrderError::InvalidRequest(_)));
    assert_eq!(store.total_calls(), 0);
}

// =============================================================================
// Mock orders
// =============================================================================

#[tokio::test]
async fn test_unconfigured_backend_gets_mock_order() {
    let store = InMemoryStore::new();
    let orders = OrderService::new(unconfigured_probe(&store));
    let before = Utc::now();

    let order = orders.create_order(latte_order()).await.unwrap();

    assert!(order.is_mock());
    assert!(order.id.as_str().starts_with("mock-"));
    assert_eq!(order.status, OrderStatus::Pending);
    assert!((1..=50).contains(&order.queue_number.unwrap()));
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.customer_name.as_deref(), Some("Sam"));
    let ready = order.estimated_ready_time.unwrap();
    assert!(ready >= before + Duration::minutes(15));
    assert!(ready <= Utc::now() + Duration::minutes(15));
    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn test_unprovisioned_backend_gets_mock_order() {
    let store = InMemoryStore::new();
    store.drop_tables();
    let orders = OrderService::new(configured_probe(&store));

    let order = orders.create_order(latte_order()).await.unwrap();

    assert!(order.is_mock());
    assert_eq!(store.calls(Op::InsertOrder), 0);
}

#[tokio::test]
async fn test_mock_order_status_is_ready_without_store_call() {
    let (store, orders) = connected();
    let order = orders
        .get_order_status(&OrderId::new("mock-1700000000000"))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Ready);
    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn test_mock_order_cannot_be_updated() {
    let (store, orders) = connected();
    let err = orders
        .update_order_status(&OrderId::new("mock-1"), OrderStatus::Ready)
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::NotPersisted(_)));
    assert_eq!(store.total_calls(), 0);
}

// =============================================================================
// Status tracking
// =============================================================================

#[tokio::test]
async fn test_stored_order_status_round_trip() {
    let (_store, orders) = connected();
    let placed = orders.create_order(latte_order()).await.unwrap();

    let fetched = orders.get_order_status(&placed.id).await.unwrap();

    assert_eq!(fetched.id, placed.id);
    assert_eq!(fetched.status, OrderStatus::Pending);
    assert_eq!(fetched.items.len(), 2);
    assert_eq!(fetched.items[0].item.name, "Latte");
    assert_eq!(fetched.order_number.as_deref(), Some("ORD-0001"));
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let (_store, orders) = connected();
    let err = orders
        .get_order_status(&OrderId::new("order-99"))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::NotFound(_)));
}

#[tokio::test]
async fn test_lookup_failure_uses_generic_message() {
    let (store, orders) = connected();
    let placed = orders.create_order(latte_order()).await.unwrap();
    store.fail(Op::FetchOrder);

    let err = orders.get_order_status(&placed.id).await.unwrap_err();

    assert!(matches!(err, OrderError::Lookup(_)));
    assert_eq!(err.to_string(), "Failed to get order status. Please try again.");
}

#[tokio::test]
async fn test_status_moves_forward_only() {
    let (store, orders) = connected();
    let placed = orders.create_order(latte_order()).await.unwrap();

    let preparing = orders
        .update_order_status(&placed.id, OrderStatus::Preparing)
        .await
        .unwrap();
    assert_eq!(preparing.status, OrderStatus::Preparing);
    assert_eq!(preparing.items.len(), 2);
    assert_eq!(store.orders()[0].status, "preparing");

    let err = orders
        .update_order_status(&placed.id, OrderStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderError::InvalidTransition {
            from: OrderStatus::Preparing,
            to: OrderStatus::Pending
        }
    ));
    assert_eq!(store.calls(Op::UpdateOrderStatus), 1);
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_orders_listed_newest_first_and_filtered() {
    let (store, orders) = connected();
    let first = orders.create_order(latte_order()).await.unwrap();
    let second = orders.create_order(latte_order()).await.unwrap();
    store.backdate(&first.id, Duration::minutes(5));
    orders
        .update_order_status(&second.id, OrderStatus::Ready)
        .await
        .unwrap();

    let all = orders.list_orders(&OrderFilter::default()).await.unwrap();
    let ids: Vec<_> = all.iter().map(|o| o.id.clone()).collect();
    assert_eq!(ids, [second.id.clone(), first.id.clone()]);

    let ready = orders
        .list_orders(&OrderFilter {
            status: Some(OrderStatus::Ready),
            day: None,
        })
        .await
        .unwrap();
    assert_eq!(ready.len(), 1);
    assert_eq!(ready[0].id, second.id);
}

#[tokio::test]
async fn test_listing_is_empty_when_unconfigured() {
    let store = InMemoryStore::new();
    let orders = OrderService::new(unconfigured_probe(&store));
    assert!(orders.list_orders(&OrderFilter::default()).await.unwrap().is_empty());
    assert_eq!(store.total_calls(), 0);
}
