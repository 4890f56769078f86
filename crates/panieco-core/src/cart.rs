//! The shopper's cart as read from the host storefront, and the amount it
//! contributes to a group order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One line of the shopper's cart at the merchant.
///
/// The cart belongs to the host storefront; nothing in this workspace
/// mutates it. Prices travel as JSON numbers, as the backend expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

impl CartItem {
    /// `quantity × unit_price`, or `None` when it does not fit a `Decimal`.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.unit_price)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("cart is empty")]
    Empty,

    #[error("cart item {id} has a zero quantity")]
    ZeroQuantity { id: String },

    #[error("cart item {id} has a negative unit price")]
    NegativePrice { id: String },

    #[error("cart total is too large to represent")]
    AmountOverflow,
}

/// Amount a shopper contributes: `Σ quantity × unit_price`, computed fresh
/// from the cart every time.
///
/// # Errors
///
/// Returns [`CartError::AmountOverflow`] when a line or the sum overflows.
pub fn cart_total(items: &[CartItem]) -> Result<Decimal, CartError> {
    items.iter().try_fold(Decimal::ZERO, |total, item| {
        item.line_total()
            .and_then(|line| total.checked_add(line))
            .ok_or(CartError::AmountOverflow)
    })
}

/// Checks the cart before any request is issued on its behalf.
///
/// # Errors
///
/// Returns [`CartError::Empty`] for an empty cart, the first item with a
/// zero quantity or negative unit price, or [`CartError::AmountOverflow`]
/// when the total cannot be computed.
pub fn validate_cart(items: &[CartItem]) -> Result<(), CartError> {
    if items.is_empty() {
        return Err(CartError::Empty);
    }
    for item in items {
        if item.quantity == 0 {
            return Err(CartError::ZeroQuantity {
                id: item.id.clone(),
            });
        }
        if item.unit_price < Decimal::ZERO {
            return Err(CartError::NegativePrice {
                id: item.id.clone(),
            });
        }
    }
    cart_total(items).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, quantity: u32, cents: i64) -> CartItem {
        CartItem {
            id: id.to_owned(),
            name: format!("Produit {id}"),
            quantity,
            unit_price: Decimal::new(cents, 2),
        }
    }

    #[test]
    fn cart_total_sums_line_totals() {
        let cart = [item("a", 2, 1250), item("b", 1, 399)];
        assert_eq!(cart_total(&cart), Ok(Decimal::new(2899, 2)));
    }

    #[test]
    fn cart_total_of_empty_cart_is_zero() {
        assert_eq!(cart_total(&[]), Ok(Decimal::ZERO));
    }

    #[test]
    fn oversized_line_is_an_overflow_not_a_panic() {
        let item: CartItem = serde_json::from_value(serde_json::json!({
            "id": "bulk", "name": "Palette", "quantity": 4_000_000_000u32, "unit_price": 1e20
        }))
        .unwrap();
        assert_eq!(item.line_total(), None);
        assert_eq!(cart_total(&[item.clone()]), Err(CartError::AmountOverflow));
        assert_eq!(validate_cart(&[item]), Err(CartError::AmountOverflow));
    }

    #[test]
    fn overflowing_sum_is_rejected() {
        let huge = CartItem {
            id: "a".to_owned(),
            name: "Lot".to_owned(),
            quantity: 1,
            unit_price: Decimal::MAX,
        };
        let cart = [huge.clone(), CartItem { id: "b".to_owned(), ..huge }];
        assert_eq!(cart_total(&cart), Err(CartError::AmountOverflow));
        assert_eq!(validate_cart(&cart), Err(CartError::AmountOverflow));
    }

    #[test]
    fn validate_cart_rejects_empty() {
        assert_eq!(validate_cart(&[]), Err(CartError::Empty));
    }

    #[test]
    fn validate_cart_rejects_zero_quantity() {
        let err = validate_cart(&[item("a", 0, 100)]).unwrap_err();
        assert!(matches!(err, CartError::ZeroQuantity { ref id } if id == "a"));
    }

    #[test]
    fn validate_cart_rejects_negative_price() {
        let err = validate_cart(&[item("a", 1, 100), item("b", 1, -5)]).unwrap_err();
        assert!(matches!(err, CartError::NegativePrice { ref id } if id == "b"));
    }

    #[test]
    fn validate_cart_accepts_free_items() {
        assert!(validate_cart(&[item("gift", 1, 0)]).is_ok());
    }

    #[test]
    fn unit_price_serializes_as_number() {
        let value = serde_json::to_value(item("a", 3, 450)).unwrap();
        assert_eq!(value["unit_price"], serde_json::json!(4.5));
        assert_eq!(value["quantity"], serde_json::json!(3));
    }

    #[test]
    fn cart_item_decodes_from_json() {
        let item: CartItem = serde_json::from_value(serde_json::json!({
            "id": "sku-1", "name": "Miel", "quantity": 2, "unit_price": 7.5
        }))
        .unwrap();
        assert_eq!(item.line_total(), Some(Decimal::from(15)));
    }
}
