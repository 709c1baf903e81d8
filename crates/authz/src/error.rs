use thiserror::Error;

use bookstore_db::RepoError;

/// Identity and authorization failures surfaced to the HTTP layer.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid or expired session token")]
    InvalidToken,

    #[error("caller lacks a required role")]
    Forbidden,

    #[error(transparent)]
    Store(#[from] RepoError),
}

impl AuthError {
    /// True when the underlying store rejected a uniqueness constraint,
    /// e.g. registering an email that already exists.
    pub fn is_conflict(&self) -> bool {
        matches!(self, AuthError::Store(err) if err.is_conflict())
    }
}
