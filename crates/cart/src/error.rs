//! Unified error handling for cart operations.
//!
//! Every operation on [`CartStore`](crate::store::CartStore) returns
//! `Result<(), CartError>` and also turns the error into exactly one
//! user-facing notice via [`CartError::user_message`].

use rocketshoes_core::{CartInvariantError, ProductId};
use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Message shown whenever a requested quantity exceeds stock.
pub const OUT_OF_STOCK_MESSAGE: &str = "Requested quantity out of stock";

/// The cart operation an error happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

impl CartOperation {
    /// Generic failure message for this operation.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => "Error adding product to cart",
            Self::Remove => "Error removing product",
            Self::UpdateAmount => "Error changing product quantity",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add_product",
            Self::Remove => "remove_product",
            Self::UpdateAmount => "update_product_amount",
        }
    }
}

/// Cart operation error.
#[derive(Debug, Error)]
pub enum CartError {
    /// The stock service has no units of the product.
    #[error("No stock record for product {0}")]
    StockNotFound(ProductId),

    /// Requested quantity exceeds available stock.
    #[error("Product {product_id}: requested {requested}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// The product is not in the cart.
    #[error("Product {0} is not in the cart")]
    EntryNotFound(ProductId),

    /// Inventory API failure.
    #[error("Inventory API error: {0}")]
    Api(#[from] ApiError),

    /// Persisting the cart failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Encoding the cart snapshot failed.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// A mutation would have broken a cart invariant.
    #[error("Cart invariant violated: {0}")]
    Invariant(#[from] CartInvariantError),
}

impl CartError {
    /// Whether this is a stock-limit rejection rather than a failure.
    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        matches!(self, Self::OutOfStock { .. })
    }

    /// Text shown to the user when `operation` fails with this error.
    ///
    /// Stock-limit rejections share one message; anything else collapses to
    /// the operation's generic failure message.
    #[must_use]
    pub const fn user_message(&self, operation: CartOperation) -> &'static str {
        if self.is_out_of_stock() {
            OUT_OF_STOCK_MESSAGE
        } else {
            operation.failure_message()
        }
    }
}
