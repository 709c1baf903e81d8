//! Idempotent startup bootstrap: the four fixed roles and three demo
//! accounts every deployment starts with. Existence-checked before each
//! insert, so replaying the routine changes nothing.

use bookstore_telemetry::Logger;

use crate::error::AuthError;
use crate::identity::{IdentityStore, NewUser};
use crate::role::Role;

const DEMO_PASSWORD: &str = "Fr33d0m!";

struct DemoAccount {
    email: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    roles: &'static [Role],
}

const DEMO_ACCOUNTS: &[DemoAccount] = &[
    DemoAccount {
        email: "admin@bookstore.co.nz",
        first_name: "Site",
        last_name: "Administrator",
        roles: &[Role::Administrator],
    },
    DemoAccount {
        email: "flic@felicitywinter.com",
        first_name: "Felicity",
        last_name: "Winter",
        roles: &[Role::Customer, Role::Administrator],
    },
    DemoAccount {
        email: "felicity.sommers@gmail.com",
        first_name: "Felicity",
        last_name: "Sommers",
        roles: &[Role::Customer],
    },
];

/// Ensure the fixed role set and demo accounts exist.
///
/// Demo data is not critical: a failed insert is logged and skipped rather
/// than aborting startup.
pub async fn seed(store: &IdentityStore, logger: &Logger) -> Result<(), AuthError> {
    seed_roles(store, logger).await?;
    seed_users(store, logger).await?;
    Ok(())
}

async fn seed_roles(store: &IdentityStore, logger: &Logger) -> Result<(), AuthError> {
    for role in Role::ALL {
        if store.role_exists(role).await? {
            continue;
        }
        match store.create_role(role).await {
            Ok(()) => logger.info(format!("seed: created role {role}")),
            Err(err) => logger.warn(format!("seed: could not create role {role}: {err}")),
        }
    }
    Ok(())
}

async fn seed_users(store: &IdentityStore, logger: &Logger) -> Result<(), AuthError> {
    for account in DEMO_ACCOUNTS {
        if store.find_by_email(account.email).await?.is_some() {
            continue;
        }

        let new_user = NewUser {
            email: account.email.to_string(),
            first_name: account.first_name.to_string(),
            last_name: account.last_name.to_string(),
        };

        let user_id = match store.create_user(&new_user, DEMO_PASSWORD).await {
            Ok(id) => id,
            Err(err) => {
                logger.warn(format!("seed: could not create {}: {err}", account.email));
                continue;
            }
        };

        for role in account.roles {
            if let Err(err) = store.add_to_role(user_id, *role).await {
                logger.warn(format!(
                    "seed: could not attach {role} to {}: {err}",
                    account.email
                ));
            }
        }

        logger.info(format!("seed: created demo account {}", account.email));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_store;

    async fn role_count(store: &IdentityStore) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM roles")
            .fetch_one(&store.pool)
            .await
            .unwrap()
    }

    async fn user_count(store: &IdentityStore) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&store.pool)
            .await
            .unwrap()
    }

    async fn membership_count(store: &IdentityStore) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM user_roles")
            .fetch_one(&store.pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn seed_creates_roles_and_demo_accounts() {
        let store = test_store().await;
        let logger = Logger::new("seed");

        seed(&store, &logger).await.unwrap();

        assert_eq!(role_count(&store).await, 4);
        assert_eq!(user_count(&store).await, 3);
        assert_eq!(membership_count(&store).await, 4);

        let admin = store
            .find_by_email("admin@bookstore.co.nz")
            .await
            .unwrap()
            .unwrap();
        let roles = store.roles_of(admin.id).await.unwrap();
        assert_eq!(roles, vec![Role::Administrator]);
    }

    #[tokio::test]
    async fn seed_twice_changes_nothing() {
        let store = test_store().await;
        let logger = Logger::new("seed");

        seed(&store, &logger).await.unwrap();
        seed(&store, &logger).await.unwrap();

        assert_eq!(role_count(&store).await, 4);
        assert_eq!(user_count(&store).await, 3);
        assert_eq!(membership_count(&store).await, 4);
    }

    #[tokio::test]
    async fn seeded_admin_can_log_in() {
        let store = test_store().await;
        seed(&store, &Logger::new("seed")).await.unwrap();

        let (user, session) = store
            .login("admin@bookstore.co.nz", DEMO_PASSWORD)
            .await
            .unwrap();
        assert_eq!(user.email, "admin@bookstore.co.nz");

        let identity = store.resolve_token(&session.token).await.unwrap();
        assert_eq!(identity.roles, vec![Role::Administrator]);
    }
}
