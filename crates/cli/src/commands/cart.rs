//! Cart inspection and mutation commands.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! rs-cart show
//! rs-cart show --json
//!
//! # Add one unit of product 3
//! rs-cart add 3
//!
//! # Set product 3 to exactly 2 units
//! rs-cart update 3 2
//!
//! # Remove product 3
//! rs-cart remove 3
//! ```

use rocketshoes_cart::CartStore;
use rocketshoes_cart::view::CartView;
use rocketshoes_core::{CurrencyCode, ProductId};
use tracing::info;

use super::CommandError;

/// Print the cart.
///
/// # Errors
///
/// Returns an error if JSON output cannot be rendered.
pub fn show(store: &CartStore, currency: CurrencyCode, json: bool) -> Result<(), CommandError> {
    print_view(&store.view(currency), json)
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if the product cannot be added.
pub async fn add(store: &mut CartStore, product_id: ProductId) -> Result<(), CommandError> {
    store.add_product(product_id).await?;
    info!(%product_id, quantity = ?store.cart().quantity_of(product_id), "Product added");
    Ok(())
}

/// Remove a product.
///
/// # Errors
///
/// Returns an error if the product is not in the cart or storage fails.
pub async fn remove(store: &mut CartStore, product_id: ProductId) -> Result<(), CommandError> {
    store.remove_product(product_id).await?;
    info!(%product_id, "Product removed");
    Ok(())
}

/// Set a product's quantity.
///
/// # Errors
///
/// Returns an error if the amount exceeds stock or the update fails.
pub async fn update(
    store: &mut CartStore,
    product_id: ProductId,
    amount: i64,
) -> Result<(), CommandError> {
    store.update_product_amount(product_id, amount).await?;
    info!(%product_id, quantity = ?store.cart().quantity_of(product_id), "Product quantity updated");
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_view(view: &CartView, json: bool) -> Result<(), CommandError> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    println!("{}", render_table(view));
    Ok(())
}

fn render_table(view: &CartView) -> String {
    if view.items.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut lines = vec![format!(
        "{:>6}  {:<40}  {:>5}  {:>14}  {:>14}",
        "ID", "PRODUCT", "QTY", "PRICE", "SUBTOTAL"
    )];
    lines.extend(view.items.iter().map(|item| {
        format!(
            "{:>6}  {:<40}  {:>5}  {:>14}  {:>14}",
            item.product_id, item.title, item.quantity, item.price, item.subtotal
        )
    }));
    lines.push(format!(
        "{} product(s), {} unit(s), total {}",
        view.item_count, view.total_quantity, view.total
    ));
    lines.join("\n")
}
