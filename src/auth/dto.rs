use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::{Role, User};
use crate::validation::FieldErrors;

/// Registration answer: `{success, message?, role?, errors?}`.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl RegisterResponse {
    pub fn registered(role: Role) -> Self {
        Self {
            success: true,
            message: Some("Registration successful!".into()),
            role: Some(role),
            errors: None,
        }
    }

    pub fn invalid(errors: FieldErrors) -> Self {
        Self {
            success: false,
            message: None,
            role: None,
            errors: Some(errors),
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
            role: None,
            errors: None,
        }
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response returned after login or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            fullname: u.fullname,
            email: u.email,
            role: u.role,
        }
    }
}

/// `{success: "..."}`, the shape of one-line acknowledgements.
#[derive(Debug, Serialize)]
pub struct Notice {
    pub success: String,
}

impl Notice {
    pub fn new(message: &str) -> Self {
        Self {
            success: message.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub token: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: Uuid,
    #[serde(default)]
    pub password: String,
}
