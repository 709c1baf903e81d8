pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use bookstore_authz::{seed, IdentityStore, NewUser, Role};
use bookstore_http::error::AppError;
use bookstore_kernel::{InitCtx, Migration, Module};
use bookstore_telemetry::Logger;

use crate::modules::auth_error;
use models::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};

#[derive(Clone)]
struct UsersState {
    identity: IdentityStore,
    logger: Logger,
}

/// Users module: registration and login over `/api/users`, plus the
/// identity tables and the startup seed.
pub struct UsersModule {
    state: UsersState,
}

/// Create a new instance of the users module.
pub fn create_module(identity: IdentityStore) -> Arc<dyn Module> {
    Arc::new(UsersModule {
        state: UsersState {
            identity,
            logger: Logger::new("users"),
        },
    })
}

#[async_trait]
impl Module for UsersModule {
    fn name(&self) -> &'static str {
        "users"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "users module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/register", post(register))
            .route("/login", post(login))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/register": {
                    "post": {
                        "summary": "Register a new customer account",
                        "tags": ["Users"],
                        "responses": {
                            "201": { "description": "Account created" },
                            "400": { "description": "Validation failed" },
                            "409": { "description": "Email already registered" }
                        }
                    }
                },
                "/login": {
                    "post": {
                        "summary": "Exchange credentials for a session token",
                        "tags": ["Users"],
                        "responses": {
                            "200": { "description": "Session issued" },
                            "400": { "description": "Validation failed" },
                            "401": { "description": "Invalid email or password" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "User": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "email": { "type": "string", "format": "email" },
                            "firstName": { "type": "string" },
                            "lastName": { "type": "string" },
                            "roles": {
                                "type": "array",
                                "items": { "type": "string" }
                            }
                        },
                        "required": ["id", "email", "firstName", "lastName", "roles"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_identity",
            up: bookstore_authz::IDENTITY_SCHEMA,
        }]
    }

    async fn start(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if ctx.settings.auth.seed_demo_data {
            seed(&self.state.identity, &self.state.logger).await?;
        }
        tracing::info!(module = self.name(), "users module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "users module stopped");
        Ok(())
    }
}

/// POST /register — open; new accounts always start as customers.
async fn register(
    State(state): State<UsersState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    state.logger.info("register: attempted");

    let errors = body.validate();
    if !errors.is_empty() {
        state.logger.warn("register: incomplete data");
        return Err(AppError::validation(
            errors,
            "registration payload failed validation",
        ));
    }

    let new_user = NewUser {
        email: body.email.clone(),
        first_name: body.first_name.clone(),
        last_name: body.last_name.clone(),
    };
    let id = state
        .identity
        .create_user(&new_user, &body.password)
        .await
        .map_err(auth_error)?;
    state
        .identity
        .add_to_role(id, Role::Customer)
        .await
        .map_err(auth_error)?;

    state
        .logger
        .info(format!("register: successful for {}", body.email));

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id,
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
            roles: vec![Role::Customer.to_string()],
        }),
    ))
}

/// POST /login — open; exchanges credentials for an opaque session token.
async fn login(
    State(state): State<UsersState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    state.logger.info("login: attempted");

    let errors = body.validate();
    if !errors.is_empty() {
        state.logger.warn("login: incomplete data");
        return Err(AppError::validation(errors, "login payload failed validation"));
    }

    let (user, session) = state
        .identity
        .login(&body.email, &body.password)
        .await
        .map_err(auth_error)?;
    let roles = state
        .identity
        .roles_of(user.id)
        .await
        .map_err(auth_error)?;

    state
        .logger
        .info(format!("login: successful for {}", user.email));

    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: UserResponse::from_record(
            user,
            roles.iter().map(|role| role.to_string()).collect(),
        ),
    }))
}
