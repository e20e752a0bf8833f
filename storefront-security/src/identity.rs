use serde::{Deserialize, Serialize};

use crate::roles::{default_role_extractor, RoleExtractor};

/// Role that unlocks catalog mutations and the admin dashboard.
pub const ADMIN_ROLE: &str = "admin";

/// Represents an authenticated user extracted from a validated JWT token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Subject claim ("sub") - unique user identifier.
    pub sub: String,

    pub email: Option<String>,

    /// Display name from the "name" claim, if present.
    pub name: Option<String>,

    pub roles: Vec<String>,

    /// Raw claims for advanced access.
    #[serde(skip_serializing)]
    pub claims: serde_json::Value,
}

impl AuthenticatedUser {
    /// Build from validated claims using the default role extractor.
    pub fn from_claims(claims: serde_json::Value) -> Self {
        Self::from_claims_with(claims, &default_role_extractor())
    }

    pub fn from_claims_with(claims: serde_json::Value, extractor: &impl RoleExtractor) -> Self {
        let text = |key: &str| {
            claims
                .get(key)
                .and_then(|v| v.as_str())
                .map(String::from)
        };
        AuthenticatedUser {
            sub: text("sub").unwrap_or_default(),
            email: text("email"),
            name: text("name"),
            roles: extractor.extract_roles(&claims),
            claims,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }
}

/// An authenticated user holding the admin role.
///
/// Extraction fails with 401 without a valid token and 403 when the role is missing.
#[derive(Clone, Debug)]
pub struct AdminUser(pub AuthenticatedUser);

impl std::ops::Deref for AdminUser {
    type Target = AuthenticatedUser;
    fn deref(&self) -> &AuthenticatedUser {
        &self.0
    }
}

/// Who is looking at the storefront. Selects the admin dashboard or the shop.
#[derive(Clone, Debug)]
pub enum Viewer {
    Admin(AuthenticatedUser),
    Shopper(AuthenticatedUser),
    Guest,
}

impl Viewer {
    pub fn from_user(user: Option<AuthenticatedUser>) -> Self {
        match user {
            Some(user) if user.is_admin() => Viewer::Admin(user),
            Some(user) => Viewer::Shopper(user),
            None => Viewer::Guest,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Viewer::Admin(_))
    }

    /// `"admin"`, `"shopper"` or `"guest"`.
    pub fn view(&self) -> &'static str {
        match self {
            Viewer::Admin(_) => "admin",
            Viewer::Shopper(_) => "shopper",
            Viewer::Guest => "guest",
        }
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        match self {
            Viewer::Admin(user) | Viewer::Shopper(user) => Some(user),
            Viewer::Guest => None,
        }
    }
}
