pub mod config;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod jwt;
pub mod roles;

pub use config::SecurityConfig;
pub use error::SecurityError;
pub use extractor::{extract_bearer_token, extract_jwt_claims};
pub use identity::{AdminUser, AuthenticatedUser, Viewer, ADMIN_ROLE};
pub use jwt::JwtClaimsValidator;
pub use roles::{Composite, MetadataRoleExtractor, RoleExtractor, StandardRoleExtractor};
