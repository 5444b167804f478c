//! Order route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use corner_cafe_core::{CreateOrderRequest, Order, OrderId, OrderStatus};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::remote::OrderFilter;
use crate::state::AppState;

/// Query string for order listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: Option<NaiveDate>,
}

impl ListOrdersQuery {
    fn into_filter(self) -> Result<OrderFilter> {
        let status = self
            .status
            .filter(|raw| !raw.is_empty())
            .map(|raw| known_status(&raw))
            .transpose()?;
        Ok(OrderFilter {
            status,
            day: self.date,
        })
    }
}

/// Body of a status change.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

fn known_status(raw: &str) -> Result<OrderStatus> {
    let status = OrderStatus::from(raw);
    if status.is_known() {
        Ok(status)
    } else {
        Err(AppError::BadRequest(format!("unknown order status: {raw}")))
    }
}

/// POST /api/orders
///
/// Returns 201 with the stored order, or with a mock order when the backend
/// is not ready.
///
/// # Errors
///
/// Fails on invalid requests or when a remote write fails.
#[instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = state.orders().create_order(request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders?status=&date=
///
/// # Errors
///
/// Fails on an unknown status filter or when the query fails.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<Order>>> {
    let filter = query.into_filter()?;
    Ok(Json(state.orders().list_orders(&filter).await?))
}

/// GET /api/orders/{id}
///
/// # Errors
///
/// Fails when the order does not exist or cannot be read.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Order>> {
    let id = OrderId::new(id);
    Ok(Json(state.orders().get_order_status(&id).await?))
}

/// PATCH /api/orders/{id}/status
///
/// # Errors
///
/// Fails for mock orders, unknown or backward statuses, and remote failures.
#[instrument(skip(state, body))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let next = known_status(&body.status)?;
    let id = OrderId::new(id);
    Ok(Json(state.orders().update_order_status(&id, next).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_status_filter_is_ignored() {
        let query = ListOrdersQuery {
            status: Some(String::new()),
            date: None,
        };
        assert_eq!(query.into_filter().ok(), Some(OrderFilter::default()));
    }

    #[test]
    fn test_unknown_status_filter_is_rejected() {
        let query = ListOrdersQuery {
            status: Some("lost".to_string()),
            date: None,
        };
        assert!(matches!(query.into_filter(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_filter_carries_status_and_day() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 18);
        let query = ListOrdersQuery {
            status: Some("ready".to_string()),
            date: day,
        };
        let filter = query.into_filter().ok();
        assert_eq!(
            filter,
            Some(OrderFilter {
                status: Some(OrderStatus::Ready),
                day,
            })
        );
    }
}
