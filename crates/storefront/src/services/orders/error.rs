//! Order error types.

use corner_cafe_core::{OrderId, OrderStatus};
use thiserror::Error;

use crate::remote::RemoteError;

/// Errors that can occur while placing or tracking orders.
///
/// Remote failures carry their cause for logging, but display only a generic
/// message that is safe to show customers.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The request is malformed (zero quantity, total mismatch).
    #[error("invalid order: {0}")]
    InvalidRequest(String),

    /// Writing the order or its items failed.
    #[error("Failed to create order. Please try again.")]
    Submission(#[source] RemoteError),

    /// Reading an order failed.
    #[error("Failed to get order status. Please try again.")]
    Lookup(#[source] RemoteError),

    /// Writing a status change failed.
    #[error("Failed to update order status. Please try again.")]
    Update(#[source] RemoteError),

    /// No order has this id.
    #[error("order not found: {0}")]
    NotFound(OrderId),

    /// Mock orders exist only on the customer's side and cannot change.
    #[error("order {0} was never submitted and cannot be updated")]
    NotPersisted(OrderId),

    /// Status changes only move forward.
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}

impl OrderError {
    /// Classify a failed read of `id`.
    pub(super) fn lookup(id: &OrderId, err: RemoteError) -> Self {
        match err {
            RemoteError::NotFound(_) => Self::NotFound(id.clone()),
            other => Self::Lookup(other),
        }
    }
}
