use jsonwebtoken::Algorithm;

/// Security configuration for JWT validation.
#[derive(Clone, Debug)]
pub struct SecurityConfig {
    /// Expected issuer in the "iss" claim
    pub issuer: String,

    /// Expected audience in the "aud" claim
    pub audience: String,

    /// Tokens using other algorithms are rejected. Default: HS256 only.
    pub allowed_algorithms: Vec<Algorithm>,
}

impl SecurityConfig {
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            allowed_algorithms: vec![Algorithm::HS256],
        }
    }

    /// Set the allowed JWT algorithms. Empty lists will cause validation to fail.
    pub fn with_allowed_algorithms(
        mut self,
        algorithms: impl IntoIterator<Item = Algorithm>,
    ) -> Self {
        self.allowed_algorithms = algorithms.into_iter().collect();
        self
    }
}

impl From<&storefront_core::config::SecuritySettings> for SecurityConfig {
    fn from(settings: &storefront_core::config::SecuritySettings) -> Self {
        SecurityConfig::new(settings.issuer.clone(), settings.audience.clone())
    }
}
