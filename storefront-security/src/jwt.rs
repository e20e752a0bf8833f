use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use tracing::{debug, warn};

use crate::config::SecurityConfig;
use crate::error::SecurityError;

/// Validates bearer tokens against a static key and returns the raw claims.
///
/// Performs header decoding, the algorithm allow-list check, signature
/// verification and the standard claims (iss, aud, exp, nbf).
pub struct JwtClaimsValidator {
    key: DecodingKey,
    config: SecurityConfig,
}

impl JwtClaimsValidator {
    pub fn new_with_static_key(key: DecodingKey, config: SecurityConfig) -> Self {
        Self { key, config }
    }

    /// HMAC validator for a shared secret.
    pub fn from_secret(secret: &[u8], config: SecurityConfig) -> Self {
        Self::new_with_static_key(DecodingKey::from_secret(secret), config)
    }

    pub fn config(&self) -> &SecurityConfig {
        &self.config
    }

    pub fn validate(&self, token: &str) -> Result<serde_json::Value, SecurityError> {
        let header = decode_header(token)
            .map_err(|e| SecurityError::InvalidToken(format!("Failed to decode header: {e}")))?;

        let algorithm = header.alg;
        debug!(?algorithm, "Decoded JWT header");

        if self.config.allowed_algorithms.is_empty() {
            return Err(SecurityError::ValidationFailed(
                "No allowed JWT algorithms configured".into(),
            ));
        }

        if !self.config.allowed_algorithms.contains(&algorithm) {
            return Err(SecurityError::ValidationFailed(format!(
                "Disallowed JWT algorithm: {algorithm:?}"
            )));
        }

        let mut validation = Validation::new(algorithm);
        validation.algorithms = self.config.allowed_algorithms.clone();
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        let token_data =
            decode::<serde_json::Value>(token, &self.key, &validation).map_err(|e| {
                let err = match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        SecurityError::TokenExpired
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                        SecurityError::ValidationFailed("Invalid issuer".into())
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                        SecurityError::ValidationFailed("Invalid audience".into())
                    }
                    _ => SecurityError::InvalidToken(e.to_string()),
                };
                warn!(error = %err, "JWT claim validation failed");
                err
            })?;

        let sub = token_data
            .claims
            .get("sub")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        debug!(sub = %sub, "JWT validated");
        Ok(token_data.claims)
    }
}
