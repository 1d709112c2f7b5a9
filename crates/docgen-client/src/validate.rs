//! Input checks performed before credentials leave the machine.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::auth::RegisterRequest;
use crate::error::{ApiError, Result};

/// Minimum password length accepted by the backend.
pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern is valid"));

fn auth_failed(reason: &str) -> ApiError {
    ApiError::AuthFailed {
        reason: reason.to_string(),
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

/// Email and password must be present and the email well-formed.
pub fn credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(auth_failed("Email and password are required"));
    }
    if !is_valid_email(email) {
        return Err(auth_failed("Invalid email address"));
    }
    Ok(())
}

pub fn new_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(auth_failed("Password must be at least 8 characters long"));
    }
    Ok(())
}

pub fn registration(request: &RegisterRequest) -> Result<()> {
    credentials(&request.email, &request.password)?;
    new_password(&request.password)
}
