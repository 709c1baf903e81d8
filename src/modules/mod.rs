pub mod authors;
pub mod books;
pub mod home;
pub mod users;

use bookstore_authz::{AuthError, IdentityStore};
use bookstore_db::{Db, RepoError};
use bookstore_http::error::AppError;
use bookstore_kernel::settings::Settings;
use bookstore_kernel::ModuleRegistry;
use bookstore_telemetry::Logger;

/// Register all bookstore modules, wiring each one's repositories to the
/// shared pool. Registration order is also migration/start order.
pub fn register_all(registry: &mut ModuleRegistry, db: &Db, settings: &Settings) {
    let identity = IdentityStore::new(
        db,
        Logger::new("identity"),
        settings.auth.session_ttl_minutes,
    );

    registry.register(authors::create_module(db, identity.clone()));
    registry.register(books::create_module(db, identity.clone()));
    registry.register(users::create_module(identity));
    registry.register(home::create_module());
}

/// Map a repository failure onto the HTTP error taxonomy: absent rows are
/// 404, constraint violations are client-visible conflicts, anything else
/// stays an opaque server failure.
pub(crate) fn repo_error(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound => AppError::not_found("record not found"),
        RepoError::Conflict { constraint } => AppError::conflict(
            vec![serde_json::json!({ "constraint": constraint })],
            "the store rejected the write due to a constraint violation",
        ),
        RepoError::Database(e) => AppError::Internal(anyhow::Error::new(e)),
    }
}

/// Map an identity failure onto the HTTP error taxonomy.
pub(crate) fn auth_error(err: AuthError) -> AppError {
    match err {
        AuthError::InvalidCredentials => AppError::unauthorized("invalid email or password"),
        AuthError::MissingToken => AppError::unauthorized("missing bearer token"),
        AuthError::InvalidToken => AppError::unauthorized("invalid or expired session token"),
        AuthError::Forbidden => AppError::forbidden("caller lacks a required role"),
        AuthError::Store(e) if e.is_conflict() => AppError::conflict(
            vec![serde_json::json!({ "field": "email" })],
            "email address is already registered",
        ),
        AuthError::Store(e) => repo_error(e),
    }
}

/// Field-level validation detail in the shape the error body expects.
pub(crate) fn field_error(field: &str, error: &str) -> serde_json::Value {
    serde_json::json!({ "field": field, "error": error })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn repo_not_found_maps_to_404() {
        let response = repo_error(RepoError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn repo_conflict_maps_to_409() {
        let err = RepoError::Conflict {
            constraint: "foreign key".to_string(),
        };
        let response = repo_error(err).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn auth_forbidden_maps_to_403() {
        let response = auth_error(AuthError::Forbidden).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn auth_missing_token_maps_to_401() {
        let response = auth_error(AuthError::MissingToken).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
