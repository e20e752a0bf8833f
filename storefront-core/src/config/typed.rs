use std::collections::HashMap;

use garde::Validate;

use super::value::ConfigValue;
use super::{AppConfig, ConfigError, ConfigValidationDetail};

/// A strongly-typed configuration section built from raw values.
pub trait ConfigProperties: Sized {
    fn from_config(config: &AppConfig) -> Result<Self, ConfigError>;
}

#[derive(Debug, Clone, Validate)]
pub struct ServerSettings {
    #[garde(length(min = 1))]
    pub host: String,
    #[garde(range(min = 1))]
    pub port: u16,
}

impl ServerSettings {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Validate)]
pub struct DatabaseSettings {
    #[garde(length(min = 1))]
    pub url: String,
    #[garde(range(min = 1))]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Validate)]
pub struct SecuritySettings {
    /// HMAC secret for bearer tokens. Startup fails without it.
    #[garde(skip)]
    pub jwt_secret: Option<String>,
    #[garde(length(min = 1))]
    pub issuer: String,
    #[garde(length(min = 1))]
    pub audience: String,
}

#[derive(Debug, Clone, Validate)]
pub struct CatalogSettings {
    #[garde(range(min = 1))]
    pub default_page_size: u64,
    #[garde(range(min = 1))]
    pub max_page_size: u64,
}

#[derive(Debug, Clone, Validate)]
pub struct MediaSettings {
    #[garde(length(min = 1))]
    pub upload_dir: String,
    #[garde(length(min = 1))]
    pub public_base_url: String,
}

/// Every setting the storefront reads, grouped by section.
#[derive(Debug, Clone, Validate)]
pub struct StorefrontConfig {
    #[garde(dive)]
    pub server: ServerSettings,
    #[garde(dive)]
    pub database: DatabaseSettings,
    #[garde(dive)]
    pub security: SecuritySettings,
    #[garde(dive)]
    pub catalog: CatalogSettings,
    #[garde(dive)]
    pub media: MediaSettings,
}

impl StorefrontConfig {
    /// Base layer under `application.yaml`. Also names every key so that
    /// environment variables such as `DATABASE_MAX_CONNECTIONS` find them.
    pub(crate) fn defaults() -> HashMap<String, ConfigValue> {
        [
            ("server.host", ConfigValue::from("0.0.0.0")),
            ("server.port", ConfigValue::from(3000)),
            ("database.url", ConfigValue::from("sqlite::memory:")),
            ("database.max_connections", ConfigValue::from(5)),
            ("security.jwt_secret", ConfigValue::Null),
            ("security.issuer", ConfigValue::from("storefront")),
            ("security.audience", ConfigValue::from("storefront-api")),
            ("catalog.default_page_size", ConfigValue::from(12)),
            ("catalog.max_page_size", ConfigValue::from(100)),
            ("media.upload_dir", ConfigValue::from("uploads")),
            ("media.public_base_url", ConfigValue::from("/uploads")),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}

impl ConfigProperties for StorefrontConfig {
    fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let typed = StorefrontConfig {
            server: ServerSettings {
                host: config.get("server.host")?,
                port: config.get("server.port")?,
            },
            database: DatabaseSettings {
                url: config.get("database.url")?,
                max_connections: config.get("database.max_connections")?,
            },
            security: SecuritySettings {
                jwt_secret: config.get_or("security.jwt_secret", None)?,
                issuer: config.get("security.issuer")?,
                audience: config.get("security.audience")?,
            },
            catalog: CatalogSettings {
                default_page_size: config.get("catalog.default_page_size")?,
                max_page_size: config.get("catalog.max_page_size")?,
            },
            media: MediaSettings {
                upload_dir: config.get("media.upload_dir")?,
                public_base_url: config.get("media.public_base_url")?,
            },
        };
        let mut details: Vec<ConfigValidationDetail> = match typed.validate() {
            Ok(()) => Vec::new(),
            Err(report) => report
                .iter()
                .map(|(path, error)| ConfigValidationDetail {
                    key: path.to_string(),
                    message: error.message().to_string(),
                })
                .collect(),
        };
        if typed.catalog.max_page_size < typed.catalog.default_page_size {
            details.push(ConfigValidationDetail {
                key: "catalog.max_page_size".into(),
                message: "must not be smaller than catalog.default_page_size".into(),
            });
        }
        if details.is_empty() {
            Ok(typed)
        } else {
            Err(ConfigError::Validation(details))
        }
    }
}
