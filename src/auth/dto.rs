use serde::{Deserialize, Serialize};

use crate::validation::{require_email, require_non_empty, Validate, ValidationError};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl Validate for SignupRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_email("email", self.email.trim())?;
        if self.password.is_empty() {
            return Err(ValidationError::new("password", "must not be empty"));
        }
        require_non_empty("name", &self.name)
    }
}

/// Request body for sign in.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

impl Validate for SigninRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_email("email", self.email.trim())?;
        if self.password.is_empty() {
            return Err(ValidationError::new("password", "must not be empty"));
        }
        Ok(())
    }
}

/// Returned by signup and signin.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
