//! Command implementations for the `storefront-cli` binary.
//!
//! Each function does the work and returns data; `main` renders it.

/// Shop browsing: `browse`, `show`, `categories`.
pub mod browse;

/// Local cart editing: `cart show|add|update|remove|clear`.
///
/// The cart lives in a JSON file and is rewritten after every change.
pub mod cart;

/// Order placement: `checkout`.
pub mod checkout;
