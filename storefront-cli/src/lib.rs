//! # storefront-cli
//!
//! Shopper client for the storefront API. The cart is kept in a local JSON
//! file and sent to the server only at checkout.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `browse` | List active products with filters, sort and paging |
//! | `show <slug>` | Product details and related products |
//! | `categories` | Categories with active products |
//! | `cart show\|add\|update\|remove\|clear` | Edit the local cart |
//! | `checkout` | Place an order for the cart |

pub mod client;
pub mod commands;
pub mod error;
pub mod render;

pub use client::{ProductPage, ShopClient};
pub use error::CliError;
