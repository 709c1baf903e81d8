use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;
use uuid::Uuid;

use bookstore_db::Db;
use bookstore_telemetry::Logger;

use crate::error::AuthError;
use crate::password::{hash_password, token_digest, verify_password};
use crate::role::Role;

/// Persisted user account row.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

/// Registration payload accepted by `create_user`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Resolved caller: the outcome of a successful token lookup.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub roles: Vec<Role>,
}

/// Opaque session issued at login. Only its digest is persisted.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: i64,
}

/// User, role, and session access over the shared pool. This is the
/// collaborator surface the controllers and the seed routine consume.
#[derive(Clone)]
pub struct IdentityStore {
    pub(crate) pool: SqlitePool,
    logger: Logger,
    session_ttl_minutes: i64,
}

impl IdentityStore {
    pub fn new(db: &Db, logger: Logger, session_ttl_minutes: i64) -> Self {
        Self {
            pool: db.pool().clone(),
            logger,
            session_ttl_minutes,
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, password_hash, first_name, last_name FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(bookstore_db::RepoError::from)?;
        Ok(user)
    }

    /// Create an account with a salted password digest. A duplicate email
    /// surfaces as a store conflict.
    pub async fn create_user(&self, new: &NewUser, password: &str) -> Result<i64, AuthError> {
        self.logger
            .debug(format!("create_user: {}", new.email));
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, first_name, last_name, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new.email)
        .bind(hash_password(password))
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(bookstore_db::RepoError::from)?;
        Ok(result.last_insert_rowid())
    }

    pub async fn role_exists(&self, role: Role) -> Result<bool, AuthError> {
        let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM roles WHERE name = ?)")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(bookstore_db::RepoError::from)?;
        Ok(found != 0)
    }

    pub async fn create_role(&self, role: Role) -> Result<(), AuthError> {
        self.logger.debug(format!("create_role: {role}"));
        sqlx::query("INSERT INTO roles (name) VALUES (?)")
            .bind(role.as_str())
            .execute(&self.pool)
            .await
            .map_err(bookstore_db::RepoError::from)?;
        Ok(())
    }

    /// Attach a role membership; repeating an existing membership is a no-op.
    pub async fn add_to_role(&self, user_id: i64, role: Role) -> Result<(), AuthError> {
        sqlx::query(
            "INSERT OR IGNORE INTO user_roles (user_id, role_id) \
             SELECT ?, id FROM roles WHERE name = ?",
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(bookstore_db::RepoError::from)?;
        Ok(())
    }

    pub async fn roles_of(&self, user_id: i64) -> Result<Vec<Role>, AuthError> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT r.name FROM roles r \
             JOIN user_roles ur ON ur.role_id = r.id WHERE ur.user_id = ? ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(bookstore_db::RepoError::from)?;

        Ok(names.iter().filter_map(|n| Role::from_name(n)).collect())
    }

    /// Verify credentials and issue a fresh session token.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(UserRecord, IssuedSession), AuthError> {
        let user = self
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            self.logger.warn(format!("login rejected: {email}"));
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.create_session(user.id).await?;
        self.logger.info(format!("login: session issued for {email}"));
        Ok((user, session))
    }

    pub async fn create_session(&self, user_id: i64) -> Result<IssuedSession, AuthError> {
        let token = Uuid::new_v4().to_string();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let expires_at = now + self.session_ttl_minutes * 60;

        sqlx::query(
            "INSERT INTO sessions (user_id, token_hash, expires_at, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(token_digest(&token))
        .bind(expires_at)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(bookstore_db::RepoError::from)?;

        Ok(IssuedSession { token, expires_at })
    }

    /// Resolve a bearer token to the caller's identity and role set.
    pub async fn resolve_token(&self, token: &str) -> Result<Identity, AuthError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let row: Option<(i64, String)> = sqlx::query_as(
            "SELECT u.id, u.email FROM sessions s \
             JOIN users u ON u.id = s.user_id \
             WHERE s.token_hash = ? AND s.expires_at > ?",
        )
        .bind(token_digest(token))
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(bookstore_db::RepoError::from)?;

        let (user_id, email) = row.ok_or(AuthError::InvalidToken)?;
        let roles = self.roles_of(user_id).await?;

        Ok(Identity {
            user_id,
            email,
            roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_store;

    fn demo_user() -> NewUser {
        NewUser {
            email: "reader@example.com".to_string(),
            first_name: "Rea".to_string(),
            last_name: "Der".to_string(),
        }
    }

    #[tokio::test]
    async fn create_user_then_find_by_email() {
        let store = test_store().await;

        let id = store.create_user(&demo_user(), "S3cretPass").await.unwrap();
        assert!(id >= 1);

        let found = store
            .find_by_email("reader@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.first_name, "Rea");
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let store = test_store().await;

        store.create_user(&demo_user(), "S3cretPass").await.unwrap();
        let err = store
            .create_user(&demo_user(), "OtherPass1")
            .await
            .unwrap_err();
        assert!(err.is_conflict(), "expected conflict, got {err:?}");
    }

    #[tokio::test]
    async fn login_issues_resolvable_token() {
        let store = test_store().await;
        let id = store.create_user(&demo_user(), "S3cretPass").await.unwrap();
        store.create_role(Role::Customer).await.unwrap();
        store.add_to_role(id, Role::Customer).await.unwrap();

        let (user, session) = store.login("reader@example.com", "S3cretPass").await.unwrap();
        assert_eq!(user.id, id);

        let identity = store.resolve_token(&session.token).await.unwrap();
        assert_eq!(identity.user_id, id);
        assert_eq!(identity.roles, vec![Role::Customer]);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_rejected() {
        let store = test_store().await;
        store.create_user(&demo_user(), "S3cretPass").await.unwrap();

        let err = store
            .login("reader@example.com", "WrongPass1")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn expired_session_does_not_resolve() {
        let store = test_store().await;
        let id = store.create_user(&demo_user(), "S3cretPass").await.unwrap();

        let token = "expired-token";
        let past = OffsetDateTime::now_utc().unix_timestamp() - 60;
        sqlx::query(
            "INSERT INTO sessions (user_id, token_hash, expires_at, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(token_digest(token))
        .bind(past)
        .bind(past - 3600)
        .execute(&store.pool)
        .await
        .unwrap();

        let err = store.resolve_token(token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn unknown_token_does_not_resolve() {
        let store = test_store().await;
        let err = store.resolve_token("never-issued").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
