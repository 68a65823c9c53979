//! Display data for rendering a cart.

use rocketshoes_core::{Cart, CartEntry, CurrencyCode, Price, ProductId};
use rust_decimal::Decimal;
use serde::Serialize;

/// Shown in place of an amount too large to represent.
pub const UNAVAILABLE_AMOUNT: &str = "n/a";

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub title: String,
    pub image_url: String,
    pub quantity: u32,
    pub price: String,
    pub subtotal: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    /// Distinct products, as shown on the header badge.
    pub item_count: usize,
    pub total_quantity: u64,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty(currency: CurrencyCode) -> Self {
        Self::from_cart(&Cart::new(), currency)
    }

    #[must_use]
    pub fn from_cart(cart: &Cart, currency: CurrencyCode) -> Self {
        Self {
            items: cart
                .iter()
                .map(|entry| CartItemView::from_entry(entry, currency))
                .collect(),
            total: display_amount(cart.total(), currency),
            item_count: cart.len(),
            total_quantity: cart.total_quantity(),
        }
    }
}

impl CartItemView {
    fn from_entry(entry: &CartEntry, currency: CurrencyCode) -> Self {
        Self {
            product_id: entry.product_id,
            title: entry.title.clone(),
            image_url: entry.image_url.clone(),
            quantity: entry.quantity,
            price: Price::new(entry.price, currency).display(),
            subtotal: display_amount(entry.subtotal(), currency),
        }
    }
}

fn display_amount(amount: Option<Decimal>, currency: CurrencyCode) -> String {
    amount.map_or_else(
        || UNAVAILABLE_AMOUNT.to_string(),
        |amount| Price::new(amount, currency).display(),
    )
}
