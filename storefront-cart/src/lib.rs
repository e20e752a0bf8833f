//! Client-side shopping cart.
//!
//! [`Cart`] holds the pure operations; [`CartStore`] persists a cart through
//! any [`KeyValueStore`] after each change.

pub mod cart;
pub mod error;
pub mod store;

pub use cart::{Cart, CartItem, CheckoutSummary, Purchasable, PLACEHOLDER_IMAGE};
pub use error::CartError;
pub use store::{CartStore, FileStore, KeyValueStore, MemoryStore, CART_KEY};

pub mod prelude {
    pub use crate::{Cart, CartItem, CartStore, KeyValueStore, Purchasable};
}
