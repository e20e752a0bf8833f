//! Role extraction from JWT claims.
//!
//! Identity providers disagree on where roles live. The storefront accepts a
//! top-level `roles` array, a single `role` string, or a `role` inside the
//! user's public metadata (`public_metadata` or `publicMetadata`).

pub trait RoleExtractor: Send + Sync {
    fn extract_roles(&self, claims: &serde_json::Value) -> Vec<String>;
}

/// Reads the top-level `roles` array.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRoleExtractor;

impl RoleExtractor for StandardRoleExtractor {
    fn extract_roles(&self, claims: &serde_json::Value) -> Vec<String> {
        claims
            .get("roles")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|r| r.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Reads a single `role` string, at the top level or under public metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataRoleExtractor;

impl RoleExtractor for MetadataRoleExtractor {
    fn extract_roles(&self, claims: &serde_json::Value) -> Vec<String> {
        let candidates = [
            claims.get("role"),
            claims.get("public_metadata").and_then(|m| m.get("role")),
            claims.get("publicMetadata").and_then(|m| m.get("role")),
        ];
        candidates
            .into_iter()
            .flatten()
            .filter_map(|v| v.as_str())
            .map(String::from)
            .collect()
    }
}

/// Tries two extractors in order and returns the first non-empty result.
#[derive(Debug, Clone, Copy)]
pub struct Composite<A, B>(pub A, pub B);

impl<A: RoleExtractor, B: RoleExtractor> RoleExtractor for Composite<A, B> {
    fn extract_roles(&self, claims: &serde_json::Value) -> Vec<String> {
        let roles = self.0.extract_roles(claims);
        if !roles.is_empty() {
            roles
        } else {
            self.1.extract_roles(claims)
        }
    }
}

pub type DefaultRoleExtractor = Composite<StandardRoleExtractor, MetadataRoleExtractor>;

pub fn default_role_extractor() -> DefaultRoleExtractor {
    Composite(StandardRoleExtractor, MetadataRoleExtractor)
}
