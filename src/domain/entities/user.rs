use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use validator::Validate;
use uuid::Uuid;

use crate::domain::password::validate_password_strength;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct UserInsert {
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// New password plus its confirmation, shared by reset and settings.
#[derive(Debug, Deserialize, Validate)]
pub struct PasswordUpdate {
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirm {
    pub token: String,
    #[serde(flatten)]
    pub update: PasswordUpdate,
}

#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            email: user.email,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_six_characters() {
        let login = LoginUser { email: "admin@example.com".into(), password: "12345".into() };
        assert!(login.validate().unwrap_err().field_errors().contains_key("password"));
    }

    #[test]
    fn confirmation_must_match() {
        let update = PasswordUpdate {
            password: "violet-harbor-lantern".into(),
            confirm_password: "violet-harbor-lanterns".into(),
        };
        let errors = update.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
        assert!(!errors.field_errors().contains_key("password"));
    }

    #[test]
    fn reset_confirm_flattens_passwords() {
        let confirm: PasswordResetConfirm = serde_json::from_value(serde_json::json!({
            "token": "abc",
            "password": "violet-harbor-lantern",
            "confirm_password": "violet-harbor-lantern"
        }))
        .unwrap();
        assert_eq!(confirm.token, "abc");
        assert!(confirm.update.validate().is_ok());
    }
}
