//! `/auth/*` and `/users/profile`.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::http::{ApiClient, RequestOptions};
use crate::models::User;

#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Login/registration response. The token is either top-level or nested
/// under `tokens`, depending on the backend version.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    tokens: Option<TokenPair>,
}

impl AuthResponse {
    pub fn access_token(&self) -> Option<String> {
        pick_token(self.access_token.as_deref(), self.tokens.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    tokens: Option<TokenPair>,
}

impl RefreshResponse {
    pub fn access_token(&self) -> Option<String> {
        pick_token(self.access_token.as_deref(), self.tokens.as_ref())
    }
}

fn pick_token(top_level: Option<&str>, nested: Option<&TokenPair>) -> Option<String> {
    top_level
        .or(nested.map(|t| t.access_token.as_str()))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Authentication endpoints. State changes are left to [`crate::SessionStore`].
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Credential exchanges never carry the current session's token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let options = RequestOptions::new(Method::POST)
            .json(&LoginRequest { email, password })?
            .without_token();
        self.client.request("/auth/login", options).await?.json()
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        let options = RequestOptions::new(Method::POST).json(request)?.without_token();
        self.client.request("/auth/register", options).await?.json()
    }

    pub async fn logout(&self) -> Result<()> {
        self.client.post("/auth/logout", &serde_json::json!({})).await?;
        Ok(())
    }

    pub async fn refresh(&self) -> Result<RefreshResponse> {
        self.client.post("/auth/refresh", &serde_json::json!({})).await?.json()
    }

    pub async fn me(&self) -> Result<User> {
        self.client.get("/auth/me", Vec::new()).await?.field("user")
    }

    pub async fn profile(&self) -> Result<User> {
        self.client.get("/users/profile", Vec::new()).await?.field("user")
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        self.client.put("/users/profile", update).await?.field("user")
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<()> {
        self.client.post("/auth/change-password", request).await?;
        Ok(())
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        self.client
            .post("/auth/request-password-reset", &serde_json::json!({ "email": email }))
            .await?;
        Ok(())
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<()> {
        self.client
            .post(
                "/auth/reset-password",
                &serde_json::json!({ "token": token, "password": password }),
            )
            .await?;
        Ok(())
    }

    pub async fn verify_email(&self, token: &str) -> Result<()> {
        self.client
            .post("/auth/verify-email", &serde_json::json!({ "token": token }))
            .await?;
        Ok(())
    }

    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        self.client
            .post("/auth/resend-verification", &serde_json::json!({ "email": email }))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_top_level_or_nested() {
        let flat: AuthResponse = serde_json::from_value(serde_json::json!({
            "access_token": "t1",
            "user": {"id": 1, "role": "user"}
        }))
        .unwrap();
        assert_eq!(flat.access_token().as_deref(), Some("t1"));

        let nested: AuthResponse = serde_json::from_value(serde_json::json!({
            "message": "Succesvol ingelogd",
            "user": {"id": "u-1", "role": "admin"},
            "tokens": {"access_token": "t2", "refresh_token": "r2", "token_type": "Bearer"}
        }))
        .unwrap();
        assert_eq!(nested.access_token().as_deref(), Some("t2"));

        let missing: RefreshResponse = serde_json::from_value(serde_json::json!({"access_token": ""})).unwrap();
        assert_eq!(missing.access_token(), None);
    }

    #[test]
    fn test_register_request_skips_unset_fields() {
        let req = RegisterRequest {
            email: "a@b.com".into(),
            password: "secret123".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"email": "a@b.com", "password": "secret123"}));
    }
}
