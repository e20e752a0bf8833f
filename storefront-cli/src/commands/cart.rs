use storefront_cart::{Cart, CartStore, KeyValueStore};

use crate::client::ShopClient;
use crate::error::CliError;

/// Look the product up by slug and add it at its current effective price.
/// Stock is not checked here; checkout does that against the live catalog.
pub async fn add<S: KeyValueStore>(
    client: &ShopClient,
    store: &mut CartStore<S>,
    slug: &str,
    quantity: u32,
) -> Result<Cart, CliError> {
    if quantity == 0 {
        return Err(CliError::Input("quantity must be at least 1".into()));
    }
    let page = client.product(slug).await?;
    Ok(store.add_item(&page.product, quantity)?)
}

/// Set a line's quantity. Quantities below one leave the cart unchanged;
/// use `remove` to drop a line.
pub fn update<S: KeyValueStore>(
    store: &mut CartStore<S>,
    product_id: &str,
    quantity: u32,
) -> Result<Cart, CliError> {
    let before = store.load()?;
    if before.get(product_id).is_none() {
        return Err(CliError::Input(format!("{product_id} is not in the cart")));
    }
    Ok(store.update_quantity(product_id, quantity)?)
}

pub fn remove<S: KeyValueStore>(
    store: &mut CartStore<S>,
    product_id: &str,
) -> Result<Cart, CliError> {
    Ok(store.remove_item(product_id)?)
}

pub fn clear<S: KeyValueStore>(store: &mut CartStore<S>) -> Result<Cart, CliError> {
    Ok(store.clear()?)
}

pub fn show<S: KeyValueStore>(store: &CartStore<S>) -> Result<Cart, CliError> {
    Ok(store.load()?)
}
