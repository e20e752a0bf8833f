use rust_decimal::Decimal;
use storefront_cart::{
    Cart, CartError, CartStore, FileStore, KeyValueStore, MemoryStore, Purchasable, CART_KEY,
};

struct Product {
    id: String,
    name: String,
    price: Decimal,
    sale_price: Option<Decimal>,
}

impl Product {
    fn new(id: &str, price: i64) -> Self {
        Self {
            id: id.to_string(),
            name: format!("Product {id}"),
            price: Decimal::from(price),
            sale_price: None,
        }
    }
}

impl Purchasable for Product {
    fn product_id(&self) -> &str {
        &self.id
    }
    fn display_name(&self) -> &str {
        &self.name
    }
    fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }
    fn primary_image(&self) -> Option<&str> {
        None
    }
}

#[test]
fn every_mutation_is_flushed() {
    let mut store = CartStore::new(MemoryStore::new());
    store.add_item(&Product::new("a", 10), 2).unwrap();
    store.add_item(&Product::new("b", 5), 3).unwrap();

    let raw = store.into_inner().get(CART_KEY).unwrap().unwrap();
    let cart: Cart = serde_json::from_str(&raw).unwrap();
    assert_eq!(cart.subtotal().unwrap(), Decimal::from(35));
}

#[test]
fn checkout_summary_charges_no_shipping_or_tax() {
    let mut store = CartStore::new(MemoryStore::new());
    let mut hat = Product::new("hat", 30);
    hat.sale_price = Some(Decimal::new(2450, 2));
    store.add_item(&hat, 2).unwrap();

    let summary = store.summary().unwrap();
    assert_eq!(summary.subtotal, Decimal::new(4900, 2));
    assert_eq!(summary.shipping, Decimal::ZERO);
    assert_eq!(summary.tax, Decimal::ZERO);
    assert_eq!(summary.total, summary.subtotal);
    assert_eq!(summary.item_count, 2);
}

#[test]
fn update_below_one_keeps_stored_cart() {
    let mut store = CartStore::new(MemoryStore::new());
    store.add_item(&Product::new("a", 10), 3).unwrap();
    let cart = store.update_quantity("a", 0).unwrap();
    assert_eq!(cart.get("a").unwrap().quantity, 3);
    assert_eq!(store.load().unwrap(), cart);
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("storage.json");

    let mut first = CartStore::new(FileStore::new(&path));
    first.add_item(&Product::new("a", 4), 1).unwrap();
    first.add_item(&Product::new("a", 4), 1).unwrap();
    first.add_item(&Product::new("b", 1), 1).unwrap();
    first.remove_item("b").unwrap();

    let second = CartStore::new(FileStore::new(&path));
    let cart = second.load().unwrap();
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.get("a").unwrap().quantity, 2);
    assert_eq!(cart.subtotal().unwrap(), Decimal::from(8));
}

#[test]
fn file_store_keeps_unrelated_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let mut raw = FileStore::new(&path);
    raw.set("theme", "dark".into()).unwrap();

    let mut carts = CartStore::new(raw);
    carts.add_item(&Product::new("a", 1), 1).unwrap();

    let raw = carts.into_inner();
    assert_eq!(raw.get("theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn corrupt_cart_is_reported_and_clear_recovers() {
    let mut raw = MemoryStore::new();
    raw.set(CART_KEY, "{not json".into()).unwrap();
    let mut store = CartStore::new(raw);

    assert!(matches!(store.load(), Err(CartError::Corrupt(_))));
    assert!(store.clear().unwrap().is_empty());
    assert!(store.load().unwrap().is_empty());
}
