//! Operator accounts and file upload on the warehouse backend

use crate::error::Result;
use core_gateway::{Gateway, MultipartForm, RequestOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl Page {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
        }
    }
}

/// Profile edit. A password change also requires `old_password`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserChange {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(
        rename = "oldPassword",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub old_password: Option<String>,
}

impl fmt::Debug for UserChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("UserChange")
            .field("username", &self.username)
            .field("phone", &self.phone)
            .field("avatar", &self.avatar)
            .field("role_key", &self.role_key)
            .field("password", &redact(&self.password))
            .field("old_password", &redact(&self.old_password))
            .finish()
    }
}

/// A file to upload, e.g. an avatar image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Upload {
    fn into_form(self) -> MultipartForm {
        MultipartForm::new()
            .file("file", self.file_name.clone(), self.content_type.clone(), self.data)
            .text("fileName", self.file_name)
            .text("fileType", self.content_type)
    }
}

#[derive(Debug, Clone)]
pub struct UsersApi {
    gateway: Gateway,
}

impl UsersApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn update(&self, id: i64, change: &UserChange) -> Result<Value> {
        let options = RequestOptions::new().json(change)?;
        Ok(self
            .gateway
            .put(&format!("/api/users/{}", id), options)
            .await?)
    }

    pub async fn list(&self, page: &Page) -> Result<Value> {
        let options = RequestOptions::new().query(page)?;
        Ok(self.gateway.get("/api/users", options).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<Value> {
        Ok(self
            .gateway
            .delete(&format!("/api/users/{}", id), RequestOptions::new())
            .await?)
    }

    /// Upload a file. The payload carries the stored `fileUrl`.
    pub async fn upload(&self, upload: Upload) -> Result<Value> {
        debug!(file_name = %upload.file_name, bytes = upload.data.len(), "Uploading file");
        let options = RequestOptions::new().multipart(upload.into_form());
        Ok(self.gateway.post("/api/upload", options).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_change_wire_names_and_redaction() {
        let change = UserChange {
            username: "clerk".to_string(),
            password: Some("new-secret".to_string()),
            old_password: Some("old-secret".to_string()),
            ..UserChange::default()
        };

        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            json!({ "username": "clerk", "password": "new-secret", "oldPassword": "old-secret" })
        );
        let debug = format!("{:?}", change);
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_upload_form_fields() {
        let form = Upload {
            file_name: "me.png".to_string(),
            content_type: "image/png".to_string(),
            data: vec![1, 2, 3],
        }
        .into_form();
        assert_eq!(form.len(), 3);

        let body = String::from_utf8_lossy(&form.encode("b")).into_owned();
        assert!(body.contains("name=\"file\"; filename=\"me.png\""));
        assert!(body.contains("name=\"fileType\"\r\n\r\nimage/png"));
    }
}
