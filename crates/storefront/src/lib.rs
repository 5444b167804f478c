//! Corner Cafe storefront library.
//!
//! Menu resolution, order placement and the HTTP routes over them, exposed
//! as a library so they can be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod error;
pub mod probe;
pub mod remote;
pub mod routes;
pub mod services;
pub mod state;
