//! Integration test support for the RocketShoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! The tests need no external services: [`FakeInventory`] serves the
//! inventory API (`/stock/{id}`, `/products/{id}`) from an in-process axum
//! router bound to an ephemeral localhost port.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rocketshoes_core::{Product, ProductId, StockRecord};
use rust_decimal::Decimal;
use serde_json::json;
use tokio::task::JoinHandle;

/// Shared state behind the fake inventory API.
#[derive(Default)]
struct InventoryState {
    stock: Mutex<HashMap<i32, u32>>,
    products: Mutex<HashMap<i32, Product>>,
    token: Mutex<Option<String>>,
    failing: AtomicBool,
    rate_limited: AtomicBool,
    stock_requests: AtomicUsize,
    product_requests: AtomicUsize,
}

impl InventoryState {
    fn authorized(&self, headers: &HeaderMap) -> bool {
        let expected = self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        expected.is_none_or(|token| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                == Some(format!("Bearer {token}").as_str())
        })
    }

    /// Response for failure modes shared by every endpoint.
    fn failure(&self, headers: &HeaderMap) -> Option<Response> {
        if !self.authorized(headers) {
            return Some((StatusCode::UNAUTHORIZED, "missing token").into_response());
        }
        if self.rate_limited.load(Ordering::SeqCst) {
            return Some(
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, "7")],
                    "slow down",
                )
                    .into_response(),
            );
        }
        if self.failing.load(Ordering::SeqCst) {
            return Some((StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response());
        }
        None
    }
}

/// An inventory API running on localhost for the duration of a test.
pub struct FakeInventory {
    state: Arc<InventoryState>,
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl FakeInventory {
    /// Bind an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::expect_used)]
    pub async fn start() -> Self {
        let state = Arc::new(InventoryState::default());

        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake inventory listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read fake inventory address");

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { state, addr, task }
    }

    /// Base URL to point the cart's API client at.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Set the available units for a product.
    pub fn set_stock(&self, id: i32, amount: u32) {
        self.state
            .stock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, amount);
    }

    /// Register a catalog product priced at `cents / 100`.
    pub fn add_product(&self, id: i32, title: &str, cents: i64) {
        let product = Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Decimal::new(cents, 2),
            image_url: format!("https://cdn.rocketshoes.test/{id}.jpg"),
        };
        self.state
            .products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, product);
    }

    /// Require `Authorization: Bearer <token>` on every request.
    pub fn require_token(&self, token: &str) {
        *self
            .state
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
    }

    /// Answer every request with HTTP 500.
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    /// Answer every request with HTTP 429 and `Retry-After: 7`.
    pub fn set_rate_limited(&self, limited: bool) {
        self.state.rate_limited.store(limited, Ordering::SeqCst);
    }

    #[must_use]
    pub fn stock_requests(&self) -> usize {
        self.state.stock_requests.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn product_requests(&self) -> usize {
        self.state.product_requests.load(Ordering::SeqCst)
    }
}

impl Drop for FakeInventory {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn stock(
    State(state): State<Arc<InventoryState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    state.stock_requests.fetch_add(1, Ordering::SeqCst);
    if let Some(response) = state.failure(&headers) {
        return response;
    }

    let amount = state
        .stock
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .copied();
    match amount {
        Some(amount) => Json(StockRecord::new(ProductId::new(id), amount)).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn product(
    State(state): State<Arc<InventoryState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    state.product_requests.fetch_add(1, Ordering::SeqCst);
    if let Some(response) = state.failure(&headers) {
        return response;
    }

    let product = state
        .products
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .cloned();
    match product {
        // Serve prices as JSON numbers, the way the storefront's API does
        Some(p) => Json(json!({
            "id": p.id,
            "title": p.title,
            "price": p.price.to_string().parse::<f64>().unwrap_or_default(),
            "image": p.image_url,
        }))
        .into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}
