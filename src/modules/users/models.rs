use serde::{Deserialize, Serialize};

use bookstore_authz::UserRecord;

use crate::modules::field_error;

const PASSWORD_MIN_CHARS: usize = 8;
const PASSWORD_MAX_CHARS: usize = 26;

/// Registration payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Login payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Account shape returned to API consumers; never carries the password
/// digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<String>,
}

/// Successful login: the opaque session token plus its expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: i64,
    pub user: UserResponse,
}

fn validate_email(email: &str, errors: &mut Vec<serde_json::Value>) {
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };
    if !well_formed {
        errors.push(field_error("email", "must be a valid email address"));
    }
}

impl RegisterRequest {
    pub fn validate(&self) -> Vec<serde_json::Value> {
        let mut errors = Vec::new();
        validate_email(&self.email, &mut errors);

        let password_chars = self.password.chars().count();
        if !(PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&password_chars) {
            errors.push(field_error(
                "password",
                "must be between 8 and 26 characters",
            ));
        }
        if self.first_name.trim().is_empty() {
            errors.push(field_error("firstName", "required"));
        }
        if self.last_name.trim().is_empty() {
            errors.push(field_error("lastName", "required"));
        }
        errors
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Vec<serde_json::Value> {
        let mut errors = Vec::new();
        validate_email(&self.email, &mut errors);
        if self.password.is_empty() {
            errors.push(field_error("password", "required"));
        }
        errors
    }
}

impl UserResponse {
    pub fn from_record(record: UserRecord, roles: Vec<String>) -> Self {
        UserResponse {
            id: record.id,
            email: record.email,
            first_name: record.first_name,
            last_name: record.last_name,
            roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register() -> RegisterRequest {
        RegisterRequest {
            email: "reader@example.com".to_string(),
            password: "S3cretPass".to_string(),
            first_name: "Rea".to_string(),
            last_name: "Der".to_string(),
        }
    }

    #[test]
    fn valid_registration_has_no_errors() {
        assert!(valid_register().validate().is_empty());
    }

    #[test]
    fn malformed_email_is_rejected() {
        for email in ["", "no-at-sign", "@nodomain", "user@nodot"] {
            let dto = RegisterRequest {
                email: email.to_string(),
                ..valid_register()
            };
            let errors = dto.validate();
            assert_eq!(errors.len(), 1, "email {email:?} should fail");
            assert_eq!(errors[0]["field"], "email");
        }
    }

    #[test]
    fn password_length_bounds_are_enforced() {
        let short = RegisterRequest {
            password: "seven77".to_string(),
            ..valid_register()
        };
        assert_eq!(short.validate().len(), 1);

        let long = RegisterRequest {
            password: "p".repeat(27),
            ..valid_register()
        };
        assert_eq!(long.validate().len(), 1);

        let bounds_ok = RegisterRequest {
            password: "p".repeat(26),
            ..valid_register()
        };
        assert!(bounds_ok.validate().is_empty());
    }

    #[test]
    fn login_requires_email_and_password() {
        let dto = LoginRequest {
            email: String::new(),
            password: String::new(),
        };
        assert_eq!(dto.validate().len(), 2);
    }
}
