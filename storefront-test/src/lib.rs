//! In-process HTTP testing for the storefront services.
//!
//! [`TestApp`] drives an axum `Router` without a socket and [`TestJwt`]
//! mints tokens that the matching [`storefront_security::JwtClaimsValidator`]
//! accepts.

mod app;
mod json_path;
mod jwt;

pub use app::{TestApp, TestRequest, TestResponse};
pub use json_path::{resolve_path, tokenize_path, PathToken};
pub use jwt::{TestJwt, TokenBuilder, TEST_AUDIENCE, TEST_ISSUER};
