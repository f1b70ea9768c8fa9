//! Per-call request options

use crate::error::{ErrorKind, GatewayError, Result};
use crate::multipart::MultipartForm;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Everything a caller can vary on a single request.
///
/// ```
/// use core_gateway::RequestOptions;
/// use serde_json::json;
/// use std::time::Duration;
///
/// let options = RequestOptions::new()
///     .query_pair("page", "1")
///     .body(json!({ "customer_phone": "13800000000" }))
///     .timeout(Duration::from_secs(3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Sent instead of `body` when set
    pub multipart: Option<MultipartForm>,
    pub headers: Vec<(String, String)>,
    /// Overrides the gateway's configured timeout
    pub timeout: Option<Duration>,
    pub cancellation: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query_pair(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append the fields of a serializable struct as query parameters.
    ///
    /// Fields that serialize to `null` are skipped, so `Option::None` never
    /// reaches the wire.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::BadRequest`] error when `params` does not
    /// serialize to a flat object.
    pub fn query<T: Serialize + ?Sized>(mut self, params: &T) -> Result<Self> {
        let value = serde_json::to_value(params).map_err(|e| invalid_params(e.to_string()))?;
        let Value::Object(fields) = value else {
            return Err(invalid_params("query parameters must be an object".to_string()));
        };

        for (key, value) in fields {
            let rendered = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Bool(_) | Value::Number(_) => value.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(invalid_params(format!(
                        "query parameter '{}' is not a scalar",
                        key
                    )))
                }
            };
            self.query.push((key, rendered));
        }
        Ok(self)
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self.multipart = None;
        self
    }

    /// Send `form` as a `multipart/form-data` body.
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.multipart = Some(form);
        self.body = None;
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body).map_err(|e| invalid_params(e.to_string()))?;
        self.body = Some(value);
        self.multipart = None;
        Ok(self)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

fn invalid_params(detail: String) -> GatewayError {
    GatewayError::new(
        ErrorKind::BadRequest,
        format!("{}: {}", ErrorKind::BadRequest.fallback_message(), detail),
    )
}
