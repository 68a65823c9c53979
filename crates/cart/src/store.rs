//! The cart store.
//!
//! [`CartStore`] holds the cart for one UI session. Its collaborators are
//! injected through [`CartServices`]; nothing is read from ambient state.
//!
//! Every mutation follows the same sequence:
//!
//! 1. validate against the stock service
//! 2. apply the change to a copy of the cart
//! 3. persist the copy under the storage key
//! 4. replace the in-memory cart with the copy
//!
//! A failure at any step leaves the in-memory cart and the persisted
//! snapshot as they were, and emits exactly one notice.

use std::sync::Arc;

use rocketshoes_core::{Cart, CartEntry, CartInvariantError, CurrencyCode, ProductId};
use tracing::{debug, info, instrument, warn};

use crate::api::{ProductCatalog, StockService};
use crate::error::{CartError, CartOperation};
use crate::notify::{Notice, Notifier};
use crate::storage::KeyValueStore;
use crate::view::CartView;

/// Collaborators of a [`CartStore`].
#[derive(Clone)]
pub struct CartServices {
    pub stock: Arc<dyn StockService>,
    pub catalog: Arc<dyn ProductCatalog>,
    pub storage: Arc<dyn KeyValueStore>,
    pub notifier: Arc<dyn Notifier>,
}

/// Cart state for one session, mirrored to key-value storage.
///
/// Mutating operations take `&mut self`; wrap the store in a
/// `tokio::sync::Mutex` to share it between tasks.
pub struct CartStore {
    services: CartServices,
    storage_key: String,
    cart: Cart,
}

impl CartStore {
    /// Create a store from the snapshot persisted under `storage_key`.
    ///
    /// A missing, unreadable, or invalid snapshot yields an empty cart.
    #[instrument(skip_all)]
    pub async fn initialize(services: CartServices, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();

        let cart = match services.storage.get(&storage_key).await {
            Ok(Some(snapshot)) => Cart::from_snapshot(&snapshot).unwrap_or_else(|e| {
                warn!(key = %storage_key, error = %e, "Discarding invalid cart snapshot");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(key = %storage_key, error = %e, "Failed to read cart snapshot");
                Cart::new()
            }
        };

        info!(key = %storage_key, entries = cart.len(), "Cart initialized");

        Self {
            services,
            storage_key,
            cart,
        }
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Key the snapshot is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Display data for the current cart.
    #[must_use]
    pub fn view(&self, currency: CurrencyCode) -> CartView {
        CartView::from_cart(&self.cart, currency)
    }

    /// Add one unit of a product.
    ///
    /// Appends a new entry (fetched from the catalog) or increments the
    /// existing one, as long as stock allows.
    ///
    /// # Errors
    ///
    /// - [`CartError::StockNotFound`] when the product has no stock record
    ///   or zero units
    /// - [`CartError::OutOfStock`] when one more unit exceeds stock
    /// - any API, storage, or invariant error
    #[instrument(skip(self))]
    pub async fn add_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let result = self.try_add_product(product_id).await;
        self.report(CartOperation::Add, result)
    }

    /// Remove a product's entry.
    ///
    /// # Errors
    ///
    /// - [`CartError::EntryNotFound`] when the product is not in the cart
    /// - any storage error
    #[instrument(skip(self))]
    pub async fn remove_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let result = self.try_remove_product(product_id).await;
        self.report(CartOperation::Remove, result)
    }

    /// Set a product's quantity to exactly `amount`.
    ///
    /// `amount <= 0` and products not in the cart are silent no-ops.
    ///
    /// # Errors
    ///
    /// - [`CartError::StockNotFound`] when the product has no stock record
    /// - [`CartError::OutOfStock`] when `amount` exceeds stock
    /// - any API, storage, or invariant error
    #[instrument(skip(self))]
    pub async fn update_product_amount(
        &mut self,
        product_id: ProductId,
        amount: i64,
    ) -> Result<(), CartError> {
        let result = self.try_update_product_amount(product_id, amount).await;
        self.report(CartOperation::UpdateAmount, result)
    }

    async fn try_add_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let existing = self.cart.quantity_of(product_id);

        let stock = self
            .services
            .stock
            .stock(product_id)
            .await?
            .filter(|s| s.is_available())
            .ok_or(CartError::StockNotFound(product_id))?;

        let requested = existing.map_or(1, |q| u64::from(q) + 1);
        if requested > u64::from(stock.amount) {
            return Err(CartError::OutOfStock {
                product_id,
                requested,
                available: stock.amount,
            });
        }

        let mut next = self.cart.clone();
        if existing.is_some() {
            next.increment(product_id)?;
        } else {
            let product = self.services.catalog.product(product_id).await?;
            if product.id != product_id {
                debug!(returned = %product.id, "Catalog returned a different product ID");
            }
            next.push(CartEntry {
                product_id,
                ..CartEntry::new(product)
            })?;
        }

        self.commit(next).await
    }

    async fn try_remove_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let mut next = self.cart.clone();
        next.remove(product_id)
            .ok_or(CartError::EntryNotFound(product_id))?;
        self.commit(next).await
    }

    async fn try_update_product_amount(
        &mut self,
        product_id: ProductId,
        amount: i64,
    ) -> Result<(), CartError> {
        let Ok(requested) = u64::try_from(amount) else {
            return Ok(());
        };
        if requested == 0 {
            return Ok(());
        }

        let stock = self
            .services
            .stock
            .stock(product_id)
            .await?
            .ok_or(CartError::StockNotFound(product_id))?;

        if requested > u64::from(stock.amount) {
            return Err(CartError::OutOfStock {
                product_id,
                requested,
                available: stock.amount,
            });
        }

        if !self.cart.contains(product_id) {
            debug!("Product not in cart, nothing to update");
            return Ok(());
        }

        let quantity = u32::try_from(requested)
            .map_err(|_| CartInvariantError::QuantityOverflow(product_id))?;
        let mut next = self.cart.clone();
        next.set_quantity(product_id, quantity)?;
        self.commit(next).await
    }

    /// Persist `next`, then make it the current cart.
    async fn commit(&mut self, next: Cart) -> Result<(), CartError> {
        let snapshot = next.to_snapshot()?;
        self.services
            .storage
            .set(&self.storage_key, snapshot)
            .await?;
        self.cart = next;
        debug!(entries = self.cart.len(), "Cart persisted");
        Ok(())
    }

    /// Turn a failed operation into a single user-facing notice.
    fn report(
        &self,
        operation: CartOperation,
        result: Result<(), CartError>,
    ) -> Result<(), CartError> {
        if let Err(err) = &result {
            let notice = if err.is_out_of_stock() {
                info!(operation = operation.as_str(), error = %err, "Cart operation rejected");
                Notice::warning(err.user_message(operation))
            } else {
                warn!(operation = operation.as_str(), error = %err, "Cart operation failed");
                Notice::error(err.user_message(operation))
            };
            self.services.notifier.notify(notice);
        }
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rocketshoes_core::{Product, StockRecord};
    use rust_decimal::Decimal;

    use super::*;
    use crate::api::ApiError;
    use crate::error::OUT_OF_STOCK_MESSAGE;
    use crate::notify::{CollectingNotifier, NoticeLevel};
    use crate::storage::{MemoryStore, StorageError};

    const KEY: &str = "@RocketShoes:cart";

    #[derive(Default)]
    struct FakeInventory {
        stock: Mutex<HashMap<ProductId, u32>>,
        products: HashMap<ProductId, Product>,
        offline: bool,
        stock_calls: AtomicUsize,
    }

    impl FakeInventory {
        fn new(stock: &[(i32, u32)], products: &[(i32, &str)]) -> Self {
            Self {
                stock: Mutex::new(
                    stock
                        .iter()
                        .map(|(id, amount)| (ProductId::new(*id), *amount))
                        .collect(),
                ),
                products: products
                    .iter()
                    .map(|(id, title)| (ProductId::new(*id), product(*id, title)))
                    .collect(),
                ..Self::default()
            }
        }

        fn set_stock(&self, id: i32, amount: u32) {
            self.stock
                .lock()
                .unwrap()
                .insert(ProductId::new(id), amount);
        }
    }

    #[async_trait]
    impl StockService for FakeInventory {
        async fn stock(&self, product_id: ProductId) -> Result<Option<StockRecord>, ApiError> {
            self.stock_calls.fetch_add(1, Ordering::SeqCst);
            if self.offline {
                return Err(ApiError::Status {
                    status: 503,
                    body: "offline".to_string(),
                });
            }
            Ok(self
                .stock
                .lock()
                .unwrap()
                .get(&product_id)
                .map(|amount| StockRecord::new(product_id, *amount)))
        }
    }

    #[async_trait]
    impl ProductCatalog for FakeInventory {
        async fn product(&self, product_id: ProductId) -> Result<Product, ApiError> {
            self.products
                .get(&product_id)
                .cloned()
                .ok_or_else(|| ApiError::NotFound(format!("product {product_id}")))
        }
    }

    /// Storage whose writes always fail.
    struct ReadOnlyStore(MemoryStore);

    #[async_trait]
    impl KeyValueStore for ReadOnlyStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key).await
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    /// Storage whose reads always fail.
    struct UnreadableStore;

    #[async_trait]
    impl KeyValueStore for UnreadableStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk gone")))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
            Ok(())
        }
    }

    struct Harness {
        store: CartStore,
        inventory: Arc<FakeInventory>,
        storage: MemoryStore,
        notices: CollectingNotifier,
    }

    impl Harness {
        async fn new(inventory: FakeInventory, snapshot: Option<String>) -> Self {
            let storage = snapshot.map_or_else(MemoryStore::new, |s| MemoryStore::with_value(KEY, s));
            Self::with_storage(inventory, storage.clone(), Arc::new(storage)).await
        }

        async fn with_storage(
            inventory: FakeInventory,
            storage: MemoryStore,
            backend: Arc<dyn KeyValueStore>,
        ) -> Self {
            let inventory = Arc::new(inventory);
            let notices = CollectingNotifier::new();
            let services = CartServices {
                stock: inventory.clone(),
                catalog: inventory.clone(),
                storage: backend,
                notifier: Arc::new(notices.clone()),
            };
            let store = CartStore::initialize(services, KEY).await;
            Self {
                store,
                inventory,
                storage,
                notices,
            }
        }

        fn ids(&self) -> Vec<i32> {
            self.store
                .cart()
                .iter()
                .map(|e| e.product_id.as_i32())
                .collect()
        }

        fn quantity(&self, id: i32) -> Option<u32> {
            self.store.cart().quantity_of(ProductId::new(id))
        }

        async fn persisted(&self) -> Option<Cart> {
            self.storage
                .get(KEY)
                .await
                .unwrap()
                .map(|s| Cart::from_snapshot(&s).unwrap())
        }

        async fn assert_persisted_matches_memory(&self) {
            assert_eq!(self.persisted().await.as_ref(), Some(self.store.cart()));
        }
    }

    fn product(id: i32, title: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Decimal::new(13_990, 2),
            image_url: format!("https://cdn.example.com/{id}.jpg"),
        }
    }

    fn snapshot(entries: &[(i32, u32)]) -> String {
        let entries: Vec<serde_json::Value> = entries
            .iter()
            .map(|(id, amount)| {
                serde_json::json!({
                    "id": id,
                    "title": format!("Shoe {id}"),
                    "price": 139.9,
                    "image": format!("https://cdn.example.com/{id}.jpg"),
                    "amount": amount,
                })
            })
            .collect();
        serde_json::to_string(&entries).unwrap()
    }

    // ------------------------------------------------------------------
    // initialize
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn initialize_without_snapshot_is_empty() {
        let h = Harness::new(FakeInventory::default(), None).await;
        assert!(h.store.cart().is_empty());
        assert_eq!(h.store.storage_key(), KEY);
        assert!(h.persisted().await.is_none());
    }

    #[tokio::test]
    async fn initialize_restores_snapshot() {
        let h = Harness::new(FakeInventory::default(), Some(snapshot(&[(3, 2), (1, 1)]))).await;
        assert_eq!(h.ids(), vec![3, 1]);
        assert_eq!(h.quantity(3), Some(2));
    }

    #[tokio::test]
    async fn initialize_discards_invalid_snapshot() {
        let invalid = vec![
            "not json".to_string(),
            "{}".to_string(),
            snapshot(&[(1, 0)]),
            snapshot(&[(1, 1), (1, 2)]),
        ];
        for bad in &invalid {
            let h = Harness::new(FakeInventory::default(), Some(bad.clone())).await;
            assert!(h.store.cart().is_empty(), "snapshot {bad:?} should be discarded");
        }
    }

    #[tokio::test]
    async fn initialize_survives_storage_read_error() {
        let h = Harness::with_storage(
            FakeInventory::default(),
            MemoryStore::new(),
            Arc::new(UnreadableStore),
        )
        .await;
        assert!(h.store.cart().is_empty());
        assert!(h.notices.messages().is_empty());
    }

    // ------------------------------------------------------------------
    // add_product
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn add_new_product_appends_single_unit() {
        let mut h = Harness::new(FakeInventory::new(&[(2, 5)], &[(2, "Shoe")]), None).await;

        h.store.add_product(ProductId::new(2)).await.unwrap();

        let entry = h.store.cart().get(ProductId::new(2)).unwrap();
        assert_eq!(entry.quantity, 1);
        assert_eq!(entry.title, "Shoe");
        assert_eq!(h.store.cart().len(), 1);
        assert!(h.notices.messages().is_empty());
        h.assert_persisted_matches_memory().await;
    }

    #[tokio::test]
    async fn add_appends_after_existing_entries() {
        let mut h = Harness::new(
            FakeInventory::new(&[(1, 5), (2, 5)], &[(2, "Trail")]),
            Some(snapshot(&[(1, 1)])),
        )
        .await;

        h.store.add_product(ProductId::new(2)).await.unwrap();
        assert_eq!(h.ids(), vec![1, 2]);
    }

    #[tokio::test]
    async fn add_existing_product_increments() {
        let mut h = Harness::new(
            FakeInventory::new(&[(1, 3)], &[]),
            Some(snapshot(&[(1, 1)])),
        )
        .await;

        h.store.add_product(ProductId::new(1)).await.unwrap();
        assert_eq!(h.quantity(1), Some(2));
        h.store.add_product(ProductId::new(1)).await.unwrap();
        assert_eq!(h.quantity(1), Some(3));
        assert_eq!(h.store.cart().len(), 1);
        h.assert_persisted_matches_memory().await;
    }

    #[tokio::test]
    async fn add_beyond_stock_reports_out_of_stock() {
        let mut h = Harness::new(
            FakeInventory::new(&[(1, 1)], &[]),
            Some(snapshot(&[(1, 1)])),
        )
        .await;
        let before = h.store.cart().clone();

        let err = h.store.add_product(ProductId::new(1)).await.unwrap_err();

        assert!(matches!(
            err,
            CartError::OutOfStock {
                requested: 2,
                available: 1,
                ..
            }
        ));
        assert_eq!(h.store.cart(), &before);
        let notices = h.notices.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, OUT_OF_STOCK_MESSAGE);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert!(h.persisted().await.is_some_and(|c| c == before));
    }

    #[tokio::test]
    async fn add_without_stock_record_fails() {
        let mut h = Harness::new(FakeInventory::new(&[], &[(1, "Shoe")]), None).await;

        let err = h.store.add_product(ProductId::new(1)).await.unwrap_err();

        assert!(matches!(err, CartError::StockNotFound(id) if id == ProductId::new(1)));
        assert!(h.store.cart().is_empty());
        assert_eq!(h.notices.messages(), vec!["Error adding product to cart"]);
        assert!(h.persisted().await.is_none());
    }

    #[tokio::test]
    async fn add_with_zero_stock_fails_as_missing_stock() {
        let mut h = Harness::new(FakeInventory::new(&[(1, 0)], &[(1, "Shoe")]), None).await;

        let err = h.store.add_product(ProductId::new(1)).await.unwrap_err();

        assert!(matches!(err, CartError::StockNotFound(_)));
        assert_eq!(h.notices.messages(), vec!["Error adding product to cart"]);
    }

    #[tokio::test]
    async fn add_unknown_product_leaves_cart_unchanged() {
        let mut h = Harness::new(FakeInventory::new(&[(7, 4)], &[]), None).await;

        let err = h.store.add_product(ProductId::new(7)).await.unwrap_err();

        assert!(matches!(err, CartError::Api(ApiError::NotFound(_))));
        assert!(h.store.cart().is_empty());
        assert_eq!(h.notices.messages(), vec!["Error adding product to cart"]);
        assert!(h.persisted().await.is_none());
    }

    #[tokio::test]
    async fn add_while_offline_reports_generic_error() {
        let inventory = FakeInventory {
            offline: true,
            ..FakeInventory::new(&[(1, 4)], &[(1, "Shoe")])
        };
        let mut h = Harness::new(inventory, None).await;

        let err = h.store.add_product(ProductId::new(1)).await.unwrap_err();

        assert!(matches!(err, CartError::Api(ApiError::Status { status: 503, .. })));
        let notices = h.notices.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Error adding product to cart");
        assert_eq!(notices[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn add_uses_live_stock() {
        let mut h = Harness::new(FakeInventory::new(&[(1, 1)], &[(1, "Shoe")]), None).await;

        h.store.add_product(ProductId::new(1)).await.unwrap();
        assert!(h.store.add_product(ProductId::new(1)).await.is_err());

        h.inventory.set_stock(1, 2);
        h.store.add_product(ProductId::new(1)).await.unwrap();
        assert_eq!(h.quantity(1), Some(2));
    }

    #[tokio::test]
    async fn failed_persist_keeps_memory_unchanged() {
        let storage = MemoryStore::with_value(KEY, snapshot(&[(1, 1)]));
        let mut h = Harness::with_storage(
            FakeInventory::new(&[(1, 5), (2, 5)], &[(2, "Shoe")]),
            storage.clone(),
            Arc::new(ReadOnlyStore(storage)),
        )
        .await;
        let before = h.store.cart().clone();

        let err = h.store.add_product(ProductId::new(1)).await.unwrap_err();
        assert!(matches!(err, CartError::Storage(_)));
        assert!(h.store.add_product(ProductId::new(2)).await.is_err());
        assert!(h.store.remove_product(ProductId::new(1)).await.is_err());
        assert!(h.store.update_product_amount(ProductId::new(1), 3).await.is_err());

        assert_eq!(h.store.cart(), &before);
        assert_eq!(
            h.notices.messages(),
            vec![
                "Error adding product to cart",
                "Error adding product to cart",
                "Error removing product",
                "Error changing product quantity",
            ]
        );
    }

    // ------------------------------------------------------------------
    // remove_product
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn remove_keeps_relative_order() {
        let mut h = Harness::new(
            FakeInventory::default(),
            Some(snapshot(&[(1, 1), (2, 3), (3, 1), (4, 2)])),
        )
        .await;

        h.store.remove_product(ProductId::new(2)).await.unwrap();

        assert_eq!(h.ids(), vec![1, 3, 4]);
        assert_eq!(h.quantity(4), Some(2));
        assert!(h.notices.messages().is_empty());
        h.assert_persisted_matches_memory().await;
    }

    #[tokio::test]
    async fn remove_absent_product_reports_error() {
        let mut h = Harness::new(FakeInventory::default(), Some(snapshot(&[(1, 1)]))).await;

        let err = h.store.remove_product(ProductId::new(9)).await.unwrap_err();

        assert!(matches!(err, CartError::EntryNotFound(id) if id == ProductId::new(9)));
        assert_eq!(h.ids(), vec![1]);
        assert_eq!(h.notices.messages(), vec!["Error removing product"]);
    }

    #[tokio::test]
    async fn remove_last_entry_persists_empty_cart() {
        let mut h = Harness::new(FakeInventory::default(), Some(snapshot(&[(1, 1)]))).await;

        h.store.remove_product(ProductId::new(1)).await.unwrap();

        assert!(h.store.cart().is_empty());
        assert_eq!(h.storage.get(KEY).await.unwrap().as_deref(), Some("[]"));
    }

    // ------------------------------------------------------------------
    // update_product_amount
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn update_with_non_positive_amount_is_noop() {
        let original = snapshot(&[(1, 2)]);
        let mut h = Harness::new(FakeInventory::new(&[(1, 5)], &[]), Some(original.clone())).await;

        h.store.update_product_amount(ProductId::new(1), 0).await.unwrap();
        h.store.update_product_amount(ProductId::new(1), -3).await.unwrap();

        assert_eq!(h.quantity(1), Some(2));
        assert!(h.notices.messages().is_empty());
        assert_eq!(h.inventory.stock_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.storage.get(KEY).await.unwrap(), Some(original));
    }

    #[tokio::test]
    async fn update_beyond_stock_reports_out_of_stock() {
        let mut h = Harness::new(
            FakeInventory::new(&[(1, 3)], &[]),
            Some(snapshot(&[(1, 1)])),
        )
        .await;

        let err = h
            .store
            .update_product_amount(ProductId::new(1), 4)
            .await
            .unwrap_err();

        assert!(err.is_out_of_stock());
        assert_eq!(h.quantity(1), Some(1));
        assert_eq!(h.notices.messages(), vec![OUT_OF_STOCK_MESSAGE]);
    }

    #[tokio::test]
    async fn update_sets_quantity_exactly() {
        let mut h = Harness::new(
            FakeInventory::new(&[(1, 10), (2, 10)], &[]),
            Some(snapshot(&[(1, 2), (2, 1)])),
        )
        .await;

        h.store.update_product_amount(ProductId::new(1), 5).await.unwrap();
        assert_eq!(h.quantity(1), Some(5));
        h.store.update_product_amount(ProductId::new(1), 1).await.unwrap();
        assert_eq!(h.quantity(1), Some(1));

        assert_eq!(h.quantity(2), Some(1));
        assert_eq!(h.ids(), vec![1, 2]);
        h.assert_persisted_matches_memory().await;
    }

    #[tokio::test]
    async fn update_to_full_stock_is_allowed() {
        let mut h = Harness::new(
            FakeInventory::new(&[(1, 4)], &[]),
            Some(snapshot(&[(1, 1)])),
        )
        .await;

        h.store.update_product_amount(ProductId::new(1), 4).await.unwrap();
        assert_eq!(h.quantity(1), Some(4));
    }

    #[tokio::test]
    async fn update_absent_entry_is_noop() {
        let mut h = Harness::new(FakeInventory::new(&[(5, 10)], &[]), None).await;

        h.store.update_product_amount(ProductId::new(5), 2).await.unwrap();

        assert!(h.store.cart().is_empty());
        assert!(h.notices.messages().is_empty());
        assert!(h.persisted().await.is_none());
    }

    #[tokio::test]
    async fn update_without_stock_record_reports_generic_error() {
        let mut h = Harness::new(FakeInventory::default(), Some(snapshot(&[(1, 1)]))).await;

        let err = h
            .store
            .update_product_amount(ProductId::new(1), 2)
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::StockNotFound(_)));
        assert_eq!(h.quantity(1), Some(1));
        assert_eq!(h.notices.messages(), vec!["Error changing product quantity"]);
    }

    #[tokio::test]
    async fn update_huge_amount_is_out_of_stock() {
        let mut h = Harness::new(
            FakeInventory::new(&[(1, u32::MAX)], &[]),
            Some(snapshot(&[(1, 1)])),
        )
        .await;

        let err = h
            .store
            .update_product_amount(ProductId::new(1), i64::MAX)
            .await
            .unwrap_err();
        assert!(err.is_out_of_stock());
    }

    // ------------------------------------------------------------------
    // view
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn view_reflects_cart() {
        let h = Harness::new(FakeInventory::default(), Some(snapshot(&[(1, 2), (2, 1)]))).await;

        let view = h.store.view(CurrencyCode::BRL);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.total_quantity, 3);
        assert_eq!(view.total, "R$ 419,70");
    }
}
