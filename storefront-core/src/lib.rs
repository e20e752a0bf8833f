pub mod config;
pub mod error;
pub mod health;
pub mod layers;
pub mod validation;

pub use config::{AppConfig, ConfigError, StorefrontConfig};
pub use error::{error_response, HttpError};
pub use health::{HealthBuilder, HealthIndicator, HealthStatus};
pub use layers::{catch_panic_layer, default_cors, default_trace, init_tracing};
pub use validation::{FieldError, ValidationErrorResponse};

pub mod prelude {
    //! Re-exports of the most commonly used types.
    pub use crate::config::{AppConfig, ConfigError, StorefrontConfig};
    pub use crate::error::HttpError;
    pub use crate::validation::{FieldError, ValidationErrorResponse};
}
