//! Cart commands.
//!
//! Each command opens the cart from the configured storage file, performs
//! one operation against the inventory API, and prints the resulting cart.

pub mod cart;

use std::sync::Arc;

use rocketshoes_cart::api::{ApiClient, ApiError};
use rocketshoes_cart::config::CartConfig;
use rocketshoes_cart::notify::LogNotifier;
use rocketshoes_cart::storage::{FileStore, StorageError};
use rocketshoes_cart::{CartError, CartServices, CartStore};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Inventory API client could not be built.
    #[error("Inventory API client error: {0}")]
    Api(#[from] ApiError),

    /// Storage file could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart operation failed.
    #[error("{0}")]
    Cart(#[from] CartError),

    /// Output could not be rendered.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl CommandError {
    /// Cart failures have already been logged and notified by the store.
    #[must_use]
    pub const fn already_reported(&self) -> bool {
        matches!(self, Self::Cart(_))
    }
}

/// Build a cart store wired to the inventory API and the storage file.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the storage file
/// cannot be opened.
pub async fn open_store(config: &CartConfig) -> Result<CartStore, CommandError> {
    let api = Arc::new(ApiClient::new(&config.api)?);
    let storage = FileStore::open(&config.storage.path).await?;
    tracing::debug!(
        api = %api.base_url(),
        storage = %storage.path().display(),
        "Opening cart"
    );

    let services = CartServices {
        stock: api.clone(),
        catalog: api,
        storage: Arc::new(storage),
        notifier: Arc::new(LogNotifier),
    };

    Ok(CartStore::initialize(services, config.storage.key.clone()).await)
}
