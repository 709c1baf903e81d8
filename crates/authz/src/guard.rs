use axum::http::{header, HeaderMap};

use crate::error::AuthError;
use crate::identity::{Identity, IdentityStore};
use crate::role::Role;

/// Resolve the caller from an `Authorization: Bearer <token>` header.
pub async fn authenticate(
    headers: &HeaderMap,
    store: &IdentityStore,
) -> Result<Identity, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MissingToken)?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingToken)?;

    store.resolve_token(token).await
}

/// Gate: the caller must hold at least one of the allowed roles.
pub fn require_any(identity: &Identity, allowed: &[Role]) -> Result<(), AuthError> {
    if identity.roles.iter().any(|role| allowed.contains(role)) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
