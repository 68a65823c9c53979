//! RocketShoes cart library.
//!
//! Client-side cart state for the storefront: add, remove, and re-quantify
//! products, validating against the remote stock service and persisting the
//! cart to a key-value store after every successful change.
//!
//! # Architecture
//!
//! - [`store::CartStore`] owns the cart and talks to its collaborators only
//!   through the traits in [`api`], [`storage`], and [`notify`]
//! - [`api::ApiClient`] is the HTTP implementation of the stock and catalog
//!   ports, with catalog responses cached via `moka`
//! - [`storage::FileStore`] persists snapshots to a JSON file on disk
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rocketshoes_cart::{api::ApiClient, config::CartConfig, notify::LogNotifier,
//!     storage::FileStore, store::{CartServices, CartStore}};
//!
//! let config = CartConfig::from_env()?;
//! let api = Arc::new(ApiClient::new(&config.api)?);
//! let services = CartServices {
//!     stock: api.clone(),
//!     catalog: api,
//!     storage: Arc::new(FileStore::open(&config.storage.path).await?),
//!     notifier: Arc::new(LogNotifier),
//! };
//! let mut store = CartStore::initialize(services, &config.storage.key).await;
//! store.add_product(ProductId::new(1)).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;
pub mod view;

pub use error::CartError;
pub use store::{CartServices, CartStore};
