use crate::models::user::UserSummary;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "super::trim_optional_string")]
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::trim_optional_string")]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 6, message = "Current password must be at least 6 characters"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_short_password() {
        let req = RegisterRequest {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password: "123".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn register_rejects_bad_email() {
        let req = RegisterRequest {
            name: "Ana".into(),
            email: "not-an-email".into(),
            password: "123456".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn register_accepts_valid_payload() {
        let req = RegisterRequest {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password: "123456".into(),
        };
        assert!(req.validate().is_ok());
    }
}
