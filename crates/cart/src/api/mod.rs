//! Inventory API ports and HTTP client.
//!
//! # Architecture
//!
//! - [`StockService`] and [`ProductCatalog`] are the seams the cart store
//!   depends on; tests plug in fakes, production uses [`ApiClient`]
//! - The inventory API is the source of truth - stock is never cached
//! - Catalog responses are cached via `moka` (configurable TTL)
//!
//! # Endpoints
//!
//! - `GET {base}/stock/{id}` → `{ "id", "amount" }`
//! - `GET {base}/products/{id}` → `{ "id", "title", "price", "image" }`

mod client;

pub use client::ApiClient;

use async_trait::async_trait;
use rocketshoes_core::{Product, ProductId, StockRecord};
use thiserror::Error;

/// Errors that can occur when talking to the inventory API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// Source of truth for available units.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Fetch the stock record for a product; `None` when the API has none.
    async fn stock(&self, product_id: ProductId) -> Result<Option<StockRecord>, ApiError>;
}

/// Source of product display metadata.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch a product.
    ///
    /// Returns [`ApiError::NotFound`] when the catalog has no such product.
    async fn product(&self, product_id: ProductId) -> Result<Product, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product 3".to_string());
        assert_eq!(err.to_string(), "Not found: product 3");

        let err = ApiError::Status {
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ApiError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
