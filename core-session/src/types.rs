use serde::{Deserialize, Serialize};

/// Role key granting administrator views.
pub const ADMIN_ROLE_KEY: &str = "admin";

/// Cached profile of the signed-in operator.
///
/// Serialized with the field names the backend returns from `/auth/login`, so
/// the stored JSON and the login payload share one shape. Unknown fields are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub username: String,

    #[serde(rename = "avatar", default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_key: Option<String>,
}

impl UserProfile {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_role(mut self, role_key: impl Into<String>) -> Self {
        self.role_key = Some(role_key.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_avatar(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role_key.as_deref() == Some(ADMIN_ROLE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_uses_backend_field_names() {
        let profile = UserProfile::new("alice")
            .with_id(7)
            .with_avatar("https://cdn.example/a.png")
            .with_role("admin");

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["avatar"], "https://cdn.example/a.png");
        assert_eq!(json["role_key"], "admin");
        assert!(json.get("phone").is_none());
    }

    #[test]
    fn test_profile_tolerates_extra_and_missing_fields() {
        let json = r#"{"username":"bob","role_id":"2","description":"clerk"}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.username, "bob");
        assert_eq!(profile.id, None);
        assert!(!profile.is_admin());
    }

    #[test]
    fn test_is_admin_requires_exact_role_key() {
        assert!(UserProfile::new("a").with_role("admin").is_admin());
        assert!(!UserProfile::new("a").with_role("Admin").is_admin());
        assert!(!UserProfile::new("a").is_admin());
    }
}
