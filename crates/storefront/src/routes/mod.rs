//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET   /health                  - Liveness check
//! GET   /health/ready            - Readiness check (503 if backend failing)
//!
//! # Menu
//! GET   /api/menu                - Menu from the first available source
//! GET   /api/categories          - Active categories
//!
//! # Orders
//! POST  /api/orders              - Place an order
//! GET   /api/orders              - List orders (?status=&date=)
//! GET   /api/orders/{id}         - Order status
//! PATCH /api/orders/{id}/status  - Advance order status
//!
//! # Backend
//! GET   /api/connection          - Backend state for the status banner
//! ```

pub mod health;
pub mod menu;
pub mod orders;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", patch(orders::update_status))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/menu", get(menu::show))
        .route("/categories", get(menu::categories))
        .route("/connection", get(health::connection))
        .nest("/orders", order_routes())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
}
