//! Authorization: the closed role set, the identity store backing
//! `/api/users`, bearer-session guards for write endpoints, and the
//! idempotent demo seed.

pub mod error;
pub mod guard;
pub mod identity;
pub mod password;
pub mod role;
pub mod seed;

pub use error::AuthError;
pub use guard::{authenticate, require_any};
pub use identity::{Identity, IdentityStore, IssuedSession, NewUser, UserRecord};
pub use role::{Role, DELETE_ROLES, WRITE_ROLES};
pub use seed::seed;

/// Identity tables. Contributed to the migration set by the users module
/// and replayed on every boot, so all DDL is `IF NOT EXISTS`.
pub const IDENTITY_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        created_at INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS roles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    );
    CREATE TABLE IF NOT EXISTS user_roles (
        user_id INTEGER NOT NULL,
        role_id INTEGER NOT NULL,
        PRIMARY KEY (user_id, role_id),
        FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE,
        FOREIGN KEY (role_id) REFERENCES roles (id) ON DELETE CASCADE
    );
    CREATE TABLE IF NOT EXISTS sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        token_hash TEXT NOT NULL UNIQUE,
        expires_at INTEGER NOT NULL,
        created_at INTEGER NOT NULL,
        FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
    );
"#;

#[cfg(test)]
pub(crate) mod test_support {
    use bookstore_db::Db;
    use bookstore_telemetry::Logger;

    use crate::identity::IdentityStore;

    pub async fn test_store() -> IdentityStore {
        let db = Db::in_memory().await.expect("in-memory database");
        db.apply_migrations([("users", "001_identity", crate::IDENTITY_SCHEMA)])
            .await
            .expect("identity schema applied");
        IdentityStore::new(&db, Logger::new("identity"), 60)
    }
}
