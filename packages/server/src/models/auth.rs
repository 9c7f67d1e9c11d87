use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Request body for user registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Display name (1-100 characters).
    #[schema(example = "Ana")]
    pub name: String,
    /// Email address; stored lower-cased.
    #[schema(example = "ana@x.com")]
    pub email: String,
    /// Password (6-128 characters).
    #[schema(example = "secret1")]
    pub password: String,
}

/// Trim and lower-case an email so lookups and uniqueness are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = email.chars().count() <= 254
        && !email.chars().any(char::is_whitespace)
        && match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            }
            None => false,
        };
    if !valid {
        return Err(AppError::Validation("Email must be a valid address".into()));
    }
    Ok(())
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    let name = payload.name.trim();
    if name.is_empty() || name.chars().count() > 100 {
        return Err(AppError::Validation("Name must be 1-100 characters".into()));
    }
    validate_email(&normalize_email(&payload.email))?;
    let len = payload.password.chars().count();
    if !(6..=128).contains(&len) {
        return Err(AppError::Validation(
            "Password must be 6-128 characters".into(),
        ));
    }
    Ok(())
}

/// Request body for user login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ana@x.com")]
    pub email: String,
    #[schema(example = "secret1")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Public view of a user account. Never carries the password hash.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserSummary {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "Ana")]
    pub name: String,
    #[schema(example = "ana@x.com")]
    pub email: String,
}

impl From<crate::entity::user::Model> for UserSummary {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token, valid for `auth.token_ttl_days` days.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub user: UserSummary,
}

/// Identity decoded from the caller's token.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "ana@x.com")]
    pub email: String,
}
