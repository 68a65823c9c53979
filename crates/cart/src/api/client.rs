//! HTTP client for the inventory API.
//!
//! Uses `reqwest` for HTTP. Caches catalog products using `moka`; stock
//! lookups always go to the network.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use rocketshoes_core::{Product, ProductId, StockRecord};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, ProductCatalog, StockService};
use crate::config::ApiConfig;

/// Client for the inventory API.
///
/// Implements both [`StockService`] and [`ProductCatalog`]. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
    catalog: Cache<ProductId, Product>,
}

/// Body of `GET /stock/{id}`; the ID comes from the request.
#[derive(Deserialize)]
struct StockResponse {
    amount: u32,
}

impl ApiClient {
    /// Create a new inventory API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let catalog = Cache::builder()
            .max_capacity(config.catalog_cache_capacity)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                token: config.token.clone(),
                catalog,
            }),
        })
    }

    /// Base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// GET a JSON resource. A 404 yields `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        let url = self.endpoint(path)?;

        let mut request = self
            .inner
            .client
            .get(url)
            .header("Accept", "application/json");
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(path, "Inventory API resource not found");
            return Ok(None);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Inventory API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&response_text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse inventory API response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }
}

#[async_trait]
impl StockService for ApiClient {
    #[instrument(skip(self))]
    async fn stock(&self, product_id: ProductId) -> Result<Option<StockRecord>, ApiError> {
        let response: Option<StockResponse> =
            self.get_json(&format!("stock/{product_id}")).await?;
        Ok(response.map(|r| StockRecord::new(product_id, r.amount)))
    }
}

#[async_trait]
impl ProductCatalog for ApiClient {
    #[instrument(skip(self))]
    async fn product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        if let Some(product) = self.inner.catalog.get(&product_id).await {
            debug!("Catalog cache hit");
            return Ok(product);
        }

        let product: Product = self
            .get_json(&format!("products/{product_id}"))
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("product {product_id}")))?;

        self.inner
            .catalog
            .insert(product_id, product.clone())
            .await;

        Ok(product)
    }
}
