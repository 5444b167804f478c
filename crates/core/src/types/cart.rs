//! Cart lines submitted with an order.

use serde::{Deserialize, Serialize};

use super::menu::MenuItem;
use super::price::Price;

/// A menu item together with the quantity the customer wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub item: MenuItem,
    pub quantity: u32,
}

impl CartItem {
    /// Create a cart line.
    #[must_use]
    pub const fn new(item: MenuItem, quantity: u32) -> Self {
        Self { item, quantity }
    }

    /// Unit price × quantity, or `None` if it overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Price> {
        self.item.price.checked_times(self.quantity)
    }
}

/// Sum of line totals over a cart, or `None` if any step overflows.
#[must_use]
pub fn cart_total(items: &[CartItem]) -> Option<Price> {
    items.iter().try_fold(Price::ZERO, |total, line| {
        line.line_total().and_then(|amount| total.checked_add(amount))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::id::DishId;

    fn line(price: u32, quantity: u32) -> CartItem {
        CartItem::new(
            MenuItem {
                id: DishId::new("7"),
                name: "Fresh Lemonade".to_string(),
                description: "Freshly squeezed lemon juice".to_string(),
                price: Price::from_units(price),
                image: String::new(),
                is_available: None,
                is_featured: None,
                prep_time_minutes: None,
            },
            quantity,
        )
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line(130, 3).line_total(), Some(Price::from_units(390)));
    }

    #[test]
    fn test_cart_total_empty_is_zero() {
        assert_eq!(cart_total(&[]), Some(Price::ZERO));
    }

    #[test]
    fn test_cart_total_sums_lines() {
        assert_eq!(
            cart_total(&[line(120, 2), line(150, 1)]),
            Some(Price::from_units(390))
        );
    }

    #[test]
    fn test_cart_total_overflow_is_none() {
        let mut huge = line(1, 1);
        huge.item.price = Price::new(rust_decimal::Decimal::MAX).unwrap();
        assert_eq!(cart_total(&[huge.clone(), huge]), None);
    }

    #[test]
    fn test_cart_item_json_is_flat() {
        let json = serde_json::to_value(line(120, 2)).unwrap();
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["name"], "Fresh Lemonade");
        assert!(json.get("item").is_none());
    }
}
