//! Newtype IDs for type-safe entity references.
//!
//! The remote store hands out string identifiers (UUIDs for persisted rows,
//! short numeric strings for the bundled sample menu). Use the `define_id!`
//! macro to create wrappers that prevent mixing ids of different records.

use chrono::{DateTime, Utc};

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<&str>`, `From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use corner_cafe_core::define_id;
/// define_id!(TableId);
/// define_id!(ReceiptId);
///
/// let table = TableId::new("12");
/// assert_eq!(table.as_str(), "12");
///
/// // These are different types, so this won't compile:
/// // let _: ReceiptId = table;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(CategoryId);
define_id!(DishId);
define_id!(OrderId);
define_id!(OrderItemId);

/// Prefix carried by ids of orders that were synthesized locally and never
/// written to the remote store.
pub const MOCK_ORDER_PREFIX: &str = "mock-";

impl OrderId {
    /// Build the id of a locally synthesized order created at `at`.
    #[must_use]
    pub fn mock(at: DateTime<Utc>) -> Self {
        Self(format!("{MOCK_ORDER_PREFIX}{}", at.timestamp_millis()))
    }

    /// Whether this id belongs to a mock order.
    #[must_use]
    pub fn is_mock(&self) -> bool {
        self.0.starts_with(MOCK_ORDER_PREFIX)
    }
}
