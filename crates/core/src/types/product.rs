//! Catalog and inventory records served by the remote inventory API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Product display metadata from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    /// Image URL (`image` on the wire).
    #[serde(rename = "image")]
    pub image_url: String,
}

/// Available units of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub amount: u32,
}

impl StockRecord {
    /// Create a stock record.
    #[must_use]
    pub const fn new(product_id: ProductId, amount: u32) -> Self {
        Self { product_id, amount }
    }

    /// Whether at least one unit is available.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.amount > 0
    }
}
