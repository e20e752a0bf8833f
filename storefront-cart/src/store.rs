//! Key-value persistence for the cart.
//!
//! A [`KeyValueStore`] is a tiny string-to-string map, the same shape as
//! browser local storage. [`CartStore`] keeps no state of its own: every call
//! reads the cart from the store, and every mutation writes it back.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cart::{Cart, CheckoutSummary, Purchasable};
use crate::error::CartError;

/// Key the cart document is stored under.
pub const CART_KEY: &str = "cart";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CartError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), CartError>;
    fn remove(&mut self, key: &str) -> Result<(), CartError>;
}

/// Process-local store for tests and short-lived sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CartError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), CartError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CartError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// A JSON object on disk, one entry per key.
///
/// Writes go to a sibling temp file which is then renamed over the target, so
/// a crash mid-write leaves the previous contents intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, CartError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .map_err(|e| CartError::Corrupt(format!("{}: {e}", self.path.display())))
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), CartError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(entries)
            .map_err(|e| CartError::Storage(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CartError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), CartError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), CartError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Cart operations bound to a store. Last write wins.
#[derive(Debug, Clone)]
pub struct CartStore<S> {
    store: S,
}

impl<S: KeyValueStore> CartStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Current cart; an absent key is an empty cart.
    pub fn load(&self) -> Result<Cart, CartError> {
        match self.store.get(CART_KEY)? {
            None => Ok(Cart::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| CartError::Corrupt(e.to_string())),
        }
    }

    fn save(&mut self, cart: &Cart) -> Result<(), CartError> {
        let raw = serde_json::to_string(cart).map_err(|e| CartError::Storage(e.to_string()))?;
        self.store.set(CART_KEY, raw)?;
        tracing::debug!(lines = cart.items().len(), units = cart.item_count(), "cart saved");
        Ok(())
    }

    fn mutate(&mut self, f: impl FnOnce(&mut Cart)) -> Result<Cart, CartError> {
        let mut cart = self.load()?;
        f(&mut cart);
        self.save(&cart)?;
        Ok(cart)
    }

    pub fn add_item(&mut self, product: &impl Purchasable, quantity: u32) -> Result<Cart, CartError> {
        self.mutate(|cart| cart.add_item(product, quantity))
    }

    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) -> Result<Cart, CartError> {
        self.mutate(|cart| cart.update_quantity(product_id, quantity))
    }

    pub fn remove_item(&mut self, product_id: &str) -> Result<Cart, CartError> {
        self.mutate(|cart| cart.remove_item(product_id))
    }

    /// Empty the cart. Does not read the old value, so it also recovers a
    /// corrupt store.
    pub fn clear(&mut self) -> Result<Cart, CartError> {
        let cart = Cart::new();
        self.save(&cart)?;
        Ok(cart)
    }

    pub fn summary(&self) -> Result<CheckoutSummary, CartError> {
        self.load()?.summary()
    }
}
