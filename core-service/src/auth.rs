//! Sign-in, registration and password reset against the warehouse backend

use crate::error::Result;
use core_gateway::{Gateway, RequestOptions};
use core_session::{SessionStore, UserProfile};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub phone: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("phone", &self.phone)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub username: String,
    pub phone: String,
    pub new_password: String,
}

impl fmt::Debug for ResetPasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetPasswordRequest")
            .field("username", &self.username)
            .field("phone", &self.phone)
            .field("new_password", &"<redacted>")
            .finish()
    }
}

/// Account endpoints. Sign-in and sign-out update the shared session.
#[derive(Debug, Clone)]
pub struct AuthApi {
    gateway: Gateway,
    session: Arc<SessionStore>,
}

impl AuthApi {
    pub fn new(gateway: Gateway, session: Arc<SessionStore>) -> Self {
        Self { gateway, session }
    }

    /// Sign in and cache the operator's profile.
    ///
    /// The credential normally arrives in the rotation header and is stored by
    /// the gateway. A `token` in the payload (or a bare string payload) is
    /// stored as well. The profile is taken from the payload when it carries
    /// one, otherwise only the username is kept.
    pub async fn login(&self, request: &LoginRequest) -> Result<UserProfile> {
        let payload = self
            .gateway
            .post("/auth/login", RequestOptions::new().json(request)?)
            .await?;

        if let Some(token) = login_token(&payload) {
            self.session.set_token(token).await?;
        }

        let profile = login_profile(&payload, &request.username);
        self.session.set_user_info(profile.clone()).await?;

        info!(
            username = %profile.username,
            admin = profile.is_admin(),
            "Operator signed in"
        );
        Ok(profile)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<Value> {
        debug!(username = %request.username, "Registering operator");
        Ok(self
            .gateway
            .post("/auth/register", RequestOptions::new().json(request)?)
            .await?)
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<Value> {
        debug!(username = %request.username, "Resetting password");
        Ok(self
            .gateway
            .post("/auth/reset-password", RequestOptions::new().json(request)?)
            .await?)
    }

    /// Clear the shared session. Navigation is left to the caller.
    pub async fn logout(&self) -> Result<()> {
        self.session.logout().await?;
        Ok(())
    }
}

fn login_token(payload: &Value) -> Option<&str> {
    let token = match payload {
        Value::String(token) => Some(token.as_str()),
        Value::Object(fields) => fields.get("token").and_then(Value::as_str),
        _ => None,
    };
    token.filter(|token| !token.is_empty())
}

fn login_profile(payload: &Value, username: &str) -> UserProfile {
    let candidate = ["userInfo", "user"]
        .iter()
        .find_map(|key| payload.get(*key))
        .unwrap_or(payload);

    match serde_json::from_value::<UserProfile>(candidate.clone()) {
        Ok(profile) if !profile.username.is_empty() => profile,
        _ => UserProfile::new(username),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_token_sources() {
        assert_eq!(login_token(&json!("abc")), Some("abc"));
        assert_eq!(login_token(&json!({ "token": "abc" })), Some("abc"));
        assert_eq!(login_token(&json!({ "token": "" })), None);
        assert_eq!(login_token(&json!("")), None);
        assert_eq!(login_token(&Value::Null), None);
        assert_eq!(login_token(&json!({ "username": "admin" })), None);
    }

    #[test]
    fn test_login_profile_from_payload() {
        let payload = json!({
            "token": "abc",
            "userInfo": { "id": 1, "username": "admin", "role_key": "admin" }
        });
        let profile = login_profile(&payload, "typed-name");
        assert_eq!(profile.username, "admin");
        assert!(profile.is_admin());

        let flat = json!({ "id": 2, "username": "clerk", "phone": "138" });
        let profile = login_profile(&flat, "typed-name");
        assert_eq!(profile.id, Some(2));
        assert_eq!(profile.phone.as_deref(), Some("138"));
    }

    #[test]
    fn test_login_profile_falls_back_to_username() {
        assert_eq!(login_profile(&Value::Null, "admin"), UserProfile::new("admin"));
        assert_eq!(login_profile(&json!("abc"), "admin"), UserProfile::new("admin"));
        assert_eq!(
            login_profile(&json!({ "username": "" }), "admin"),
            UserProfile::new("admin")
        );
    }

    #[test]
    fn test_request_wire_names_and_redaction() {
        let reset = ResetPasswordRequest {
            username: "admin".to_string(),
            phone: "138".to_string(),
            new_password: "s3cret".to_string(),
        };
        let json = serde_json::to_value(&reset).unwrap();
        assert_eq!(json["newPassword"], "s3cret");
        assert!(!format!("{:?}", reset).contains("s3cret"));

        let login = LoginRequest::new("admin", "hunter2");
        assert!(!format!("{:?}", login).contains("hunter2"));
    }
}
