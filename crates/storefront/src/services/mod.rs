//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `menu` - resolves the menu from the remote store, the local cache or the
//!   bundled sample catalog, in that order
//! - `orders` - places orders (or mock orders when no backend is available)
//!   and reports their queue status
//! - `fallback` - the first-success-wins combinator behind menu resolution

pub mod fallback;
pub mod menu;
pub mod orders;

pub use menu::{MenuError, MenuService, MenuSource, ResolvedMenu};
pub use orders::{OrderError, OrderService};
