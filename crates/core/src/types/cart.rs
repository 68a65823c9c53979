//! The cart: an insertion-ordered list of entries keyed by product.
//!
//! `Cart` enforces its invariants on every mutation and on deserialization,
//! so a value of this type always satisfies them:
//! - every entry has a quantity of at least 1
//! - no two entries share a product ID
//!
//! The serialized form is a JSON array of
//! `{ "id", "title", "price", "image", "amount" }` objects.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::product::Product;

/// Violations of the cart invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartInvariantError {
    #[error("product {0} has a zero quantity")]
    ZeroQuantity(ProductId),
    #[error("product {0} appears more than once")]
    DuplicateProduct(ProductId),
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),
    #[error("quantity overflow for product {0}")]
    QuantityOverflow(ProductId),
}

/// A product reference plus the desired quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub title: String,
    pub price: Decimal,
    #[serde(rename = "image")]
    pub image_url: String,
    #[serde(rename = "amount")]
    pub quantity: u32,
}

impl CartEntry {
    /// Create an entry holding a single unit of `product`.
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            product_id: product.id,
            title: product.title,
            price: product.price,
            image_url: product.image_url,
            quantity: 1,
        }
    }

    /// Unit price times quantity, or `None` if the product overflows
    /// `Decimal`.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Ordered collection of cart entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse a persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot is not valid JSON or violates the
    /// cart invariants.
    pub fn from_snapshot(snapshot: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(snapshot)
    }

    /// Serialize the cart for persistence.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartEntry> {
        self.entries.iter()
    }

    /// Number of distinct products.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.product_id == product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Quantity held for `product_id`, if present.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> Option<u32> {
        self.get(product_id).map(|e| e.quantity)
    }

    /// Append a new entry at the end of the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry has a zero quantity or its product is
    /// already in the cart.
    pub fn push(&mut self, entry: CartEntry) -> Result<(), CartInvariantError> {
        if entry.quantity == 0 {
            return Err(CartInvariantError::ZeroQuantity(entry.product_id));
        }
        if self.contains(entry.product_id) {
            return Err(CartInvariantError::DuplicateProduct(entry.product_id));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Add one unit to an existing entry, returning the new quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not in the cart or the quantity
    /// would overflow.
    pub fn increment(&mut self, product_id: ProductId) -> Result<u32, CartInvariantError> {
        let entry = self.get_mut(product_id)?;
        entry.quantity = entry
            .quantity
            .checked_add(1)
            .ok_or(CartInvariantError::QuantityOverflow(product_id))?;
        Ok(entry.quantity)
    }

    /// Set the quantity of an existing entry.
    ///
    /// # Errors
    ///
    /// Returns an error if `quantity` is zero or the product is not in the
    /// cart.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), CartInvariantError> {
        if quantity == 0 {
            return Err(CartInvariantError::ZeroQuantity(product_id));
        }
        self.get_mut(product_id)?.quantity = quantity;
        Ok(())
    }

    /// Remove the entry for `product_id`, keeping the order of the rest.
    pub fn remove(&mut self, product_id: ProductId) -> Option<CartEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.product_id == product_id)?;
        Some(self.entries.remove(index))
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Sum of all entry subtotals, or `None` if any step overflows `Decimal`.
    #[must_use]
    pub fn total(&self) -> Option<Decimal> {
        self.entries
            .iter()
            .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.subtotal()?))
    }

    fn get_mut(&mut self, product_id: ProductId) -> Result<&mut CartEntry, CartInvariantError> {
        self.entries
            .iter_mut()
            .find(|e| e.product_id == product_id)
            .ok_or(CartInvariantError::NotInCart(product_id))
    }
}

impl TryFrom<Vec<CartEntry>> for Cart {
    type Error = CartInvariantError;

    fn try_from(entries: Vec<CartEntry>) -> Result<Self, Self::Error> {
        let mut cart = Self::new();
        for entry in entries {
            cart.push(entry)?;
        }
        Ok(cart)
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        cart.entries
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
