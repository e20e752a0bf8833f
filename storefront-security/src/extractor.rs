use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use storefront_core::HttpError;
use tracing::{debug, warn};

use crate::error::SecurityError;
use crate::identity::{AdminUser, AuthenticatedUser, Viewer};
use crate::jwt::JwtClaimsValidator;

/// Split `Bearer <token>`; the scheme is case-insensitive.
pub fn extract_bearer_token(header_value: &str) -> Result<&str, SecurityError> {
    match header_value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("Bearer") && !token.is_empty() => {
            Ok(token.trim())
        }
        _ => Err(SecurityError::InvalidAuthScheme),
    }
}

pub fn extract_bearer_token_from_parts(parts: &Parts) -> Result<&str, SecurityError> {
    let auth_header = parts.headers.get(AUTHORIZATION).ok_or_else(|| {
        warn!(uri = %parts.uri, "Missing Authorization header");
        SecurityError::MissingAuthHeader
    })?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| SecurityError::InvalidAuthScheme)?;

    extract_bearer_token(auth_value)
}

/// Validate the bearer token on a request and return its claims.
pub fn extract_jwt_claims<S>(parts: &Parts, state: &S) -> Result<serde_json::Value, HttpError>
where
    Arc<JwtClaimsValidator>: FromRef<S>,
{
    let token = extract_bearer_token_from_parts(parts)?;
    let validator: Arc<JwtClaimsValidator> = Arc::from_ref(state);

    let claims = validator.validate(token).map_err(|e| {
        warn!(uri = %parts.uri, error = %e, "JWT validation failed");
        HttpError::from(e)
    })?;

    debug!(uri = %parts.uri, "JWT claims extracted");
    Ok(claims)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    Arc<JwtClaimsValidator>: FromRef<S>,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = extract_jwt_claims(parts, state)?;
        Ok(AuthenticatedUser::from_claims(claims))
    }
}

/// `Option<AuthenticatedUser>`: no header gives `None`, a bad token is still 401.
impl<S> OptionalFromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    Arc<JwtClaimsValidator>: FromRef<S>,
{
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(None);
        }
        let claims = extract_jwt_claims(parts, state)?;
        Ok(Some(AuthenticatedUser::from_claims(claims)))
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<JwtClaimsValidator>: FromRef<S>,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_claims(extract_jwt_claims(parts, state)?);
        if !user.is_admin() {
            warn!(sub = %user.sub, uri = %parts.uri, "admin role required");
            return Err(HttpError::Forbidden("Insufficient roles".into()));
        }
        Ok(AdminUser(user))
    }
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
    Arc<JwtClaimsValidator>: FromRef<S>,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user =
            <AuthenticatedUser as OptionalFromRequestParts<S>>::from_request_parts(parts, state)
                .await?;
        Ok(Viewer::from_user(user))
    }
}
