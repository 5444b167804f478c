//! Corner Cafe Core - Shared domain types.
//!
//! This crate provides the types shared by the storefront service and its
//! integration tests:
//! - menu shapes (`MenuItem`, `MenuCategory`, `MenuData`)
//! - cart lines and orders
//! - order and payment statuses
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no caches.
//! Everything that talks to the remote store lives in the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, prices, statuses, menu, cart and order types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
