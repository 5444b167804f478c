//! Core types for Corner Cafe.
//!
//! This module provides type-safe wrappers for the cafe's domain concepts.

pub mod cart;
pub mod id;
pub mod menu;
pub mod order;
pub mod price;
pub mod status;

pub use cart::{CartItem, cart_total};
pub use id::*;
pub use menu::{CategorySummary, MenuCategory, MenuData, MenuItem};
pub use order::{CreateOrderRequest, Order};
pub use price::{Price, PriceError};
pub use status::*;
