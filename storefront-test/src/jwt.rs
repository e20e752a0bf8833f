use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Map, Value};
use storefront_security::{JwtClaimsValidator, SecurityConfig};

const TEST_SECRET: &[u8] = b"storefront-test-secret-key";
pub const TEST_ISSUER: &str = "storefront";
pub const TEST_AUDIENCE: &str = "storefront-api";

/// Mints HS256 tokens accepted by the validator it hands out.
///
/// ```ignore
/// let jwt = TestJwt::new();
/// let state = AppState::new(.., Arc::new(jwt.validator()));
/// let token = jwt.admin_token();
/// ```
pub struct TestJwt {
    secret: Vec<u8>,
    issuer: String,
    audience: String,
}

impl Default for TestJwt {
    fn default() -> Self {
        Self::new()
    }
}

impl TestJwt {
    pub fn new() -> Self {
        Self {
            secret: TEST_SECRET.to_vec(),
            issuer: TEST_ISSUER.to_string(),
            audience: TEST_AUDIENCE.to_string(),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn validator(&self) -> JwtClaimsValidator {
        JwtClaimsValidator::from_secret(
            &self.secret,
            SecurityConfig::new(&self.issuer, &self.audience),
        )
    }

    pub fn token(&self, sub: &str, roles: &[&str]) -> String {
        self.builder(sub).roles(roles).build()
    }

    pub fn token_with_claims(&self, sub: &str, roles: &[&str], email: Option<&str>) -> String {
        let builder = self.builder(sub).roles(roles);
        match email {
            Some(email) => builder.email(email).build(),
            None => builder.build(),
        }
    }

    pub fn admin_token(&self) -> String {
        self.token("admin-1", &["admin"])
    }

    pub fn shopper_token(&self) -> String {
        self.token("shopper-1", &["customer"])
    }

    pub fn builder(&self, sub: &str) -> TokenBuilder<'_> {
        TokenBuilder {
            jwt: self,
            sub: sub.to_string(),
            extra: Map::new(),
            ttl_secs: 600,
        }
    }
}

/// Fine-grained token construction, e.g. for expired tokens or
/// metadata-carried roles.
pub struct TokenBuilder<'a> {
    jwt: &'a TestJwt,
    sub: String,
    extra: Map<String, Value>,
    ttl_secs: i64,
}

impl TokenBuilder<'_> {
    pub fn roles(mut self, roles: &[&str]) -> Self {
        self.extra.insert("roles".into(), json!(roles));
        self
    }

    pub fn email(self, email: &str) -> Self {
        self.claim("email", email)
    }

    /// Role stored under `public_metadata.role`.
    pub fn metadata_role(self, role: &str) -> Self {
        self.claim("public_metadata", json!({ "role": role }))
    }

    /// Set a raw claim; `iss` and `aud` set here replace the defaults.
    pub fn claim(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    /// Expiry relative to now; negative values mint an already expired token.
    pub fn expires_in(mut self, secs: i64) -> Self {
        self.ttl_secs = secs;
        self
    }

    pub fn build(self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        let mut claims = self.extra;
        claims.insert("sub".into(), json!(self.sub));
        claims
            .entry("iss")
            .or_insert_with(|| json!(self.jwt.issuer));
        claims
            .entry("aud")
            .or_insert_with(|| json!(self.jwt.audience));
        claims.insert("iat".into(), json!(now));
        claims.insert("exp".into(), json!(now + self.ttl_secs));

        encode(
            &Header::new(Algorithm::HS256),
            &Value::Object(claims),
            &EncodingKey::from_secret(&self.jwt.secret),
        )
        .expect("HS256 signing does not fail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_tokens_validate() {
        let jwt = TestJwt::new();
        let claims = jwt.validator().validate(&jwt.admin_token()).unwrap();
        assert_eq!(claims["sub"], "admin-1");
        assert_eq!(claims["roles"][0], "admin");
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let jwt = TestJwt::new();
        let token = jwt.builder("late").expires_in(-600).build();
        assert!(jwt.validator().validate(&token).is_err());
    }
}
