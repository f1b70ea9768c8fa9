//! Gateway error taxonomy

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No response was received (connect failure, DNS, deadline)
    NetworkError,
    BadRequest,
    /// Credential missing or rejected; the session is torn down
    Unauthorized,
    Forbidden,
    NotFound,
    ServerError,
    /// Unlisted status or business code, or an unreadable body
    Unknown,
    /// The caller cancelled the request; no side effects were applied
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NetworkError => "NetworkError",
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::ServerError => "ServerError",
            ErrorKind::Unknown => "Unknown",
            ErrorKind::Cancelled => "Cancelled",
        }
    }

    /// Message used when the server did not supply one.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            ErrorKind::NetworkError => {
                "Network error, please check that the backend service is reachable"
            }
            ErrorKind::BadRequest => "Invalid request parameters",
            ErrorKind::Unauthorized => "Not logged in, please sign in again",
            ErrorKind::Forbidden => "Permission denied",
            ErrorKind::NotFound => "Resource not found",
            ErrorKind::ServerError => "Internal server error",
            ErrorKind::Unknown => "Unknown error",
            ErrorKind::Cancelled => "Request cancelled",
        }
    }

    /// Kind for a non-200/201 HTTP status.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::BadRequest,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            500..=599 => ErrorKind::ServerError,
            _ => ErrorKind::Unknown,
        }
    }

    /// Whether the user should see a notice for this kind.
    pub fn is_reported(&self) -> bool {
        !matches!(self, ErrorKind::Cancelled)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct GatewayError {
    pub kind: ErrorKind,
    pub message: String,
    /// HTTP status when a response was received
    pub http_status: Option<u16>,
    /// Envelope `code` when the body carried one
    pub business_code: Option<i64>,
}

impl GatewayError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            http_status: None,
            business_code: None,
        }
    }

    /// Error carrying the kind's fallback message.
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self::new(kind, kind.fallback_message())
    }

    pub fn cancelled() -> Self {
        Self::from_kind(ErrorKind::Cancelled)
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn with_business_code(mut self, code: i64) -> Self {
        self.business_code = Some(code);
        self
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
