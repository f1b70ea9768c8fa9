//! # Gateway Configuration
//!
//! Per-backend settings for an HTTP gateway.
//!
//! ## Overview
//!
//! Backends fronted by the admin core disagree on conventions: which business
//! code means success, which header carries the credential, whether the
//! credential is sent raw or with a `Bearer` scheme, and whether the server
//! rotates it through a response header. None of this is detected at runtime.
//! Every gateway is built from an explicit [`GatewayConfig`], and several
//! differently configured gateways can share one session store.
//!
//! ## Presets
//!
//! - [`GatewayConfig::warehouse`] - envelope `code == 200`, raw `satoken`
//!   header, credential rotated through the `satoken` response header.
//! - [`GatewayConfig::delivery`] - envelope `code == 0`, `Authorization:
//!   Bearer <token>`, no rotation.
//!
//! ## Usage
//!
//! ```no_run
//! use core_runtime::config::{BusinessCodes, CredentialHeader, GatewayConfig, PayloadPolicy};
//!
//! let config = GatewayConfig::builder("warehouse", "http://localhost/api")
//!     .credential_header(CredentialHeader::raw("satoken"))
//!     .rotation_header("satoken")
//!     .business_codes(BusinessCodes::http_style())
//!     .payload_policy(PayloadPolicy::Data)
//!     .timeout_ms(10_000)
//!     .build()
//!     .expect("valid gateway config");
//! ```
//!
//! ## Error Handling
//!
//! The builder validates eagerly and reports actionable messages:
//!
//! ```should_panic
//! use core_runtime::config::GatewayConfig;
//!
//! // Relative base URLs only work behind a dev-server proxy.
//! let config = GatewayConfig::builder("warehouse", "/api")
//!     .build()
//!     .expect("Should fail - base URL must be absolute");
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Default request timeout (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Upper bound accepted for a request timeout (5 minutes)
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Route the gateway navigates to when the session is torn down
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

/// Storage key for the credential
pub const DEFAULT_TOKEN_KEY: &str = "token";

/// Storage key for the serialized user profile
pub const DEFAULT_PROFILE_KEY: &str = "userInfo";

/// How the credential is written into its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialScheme {
    /// Header value is the token itself (`satoken: abc123`)
    Raw,
    /// Header value is `Bearer <token>`
    Bearer,
}

/// Header used to send the session credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialHeader {
    pub name: String,
    pub scheme: CredentialScheme,
}

impl CredentialHeader {
    /// Custom header carrying the raw token
    pub fn raw(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scheme: CredentialScheme::Raw,
        }
    }

    /// `Authorization: Bearer <token>`
    pub fn bearer() -> Self {
        Self {
            name: "Authorization".to_string(),
            scheme: CredentialScheme::Bearer,
        }
    }

    /// Render the header value for `token`.
    pub fn value_for(&self, token: &str) -> String {
        match self.scheme {
            CredentialScheme::Raw => token.to_string(),
            CredentialScheme::Bearer => format!("Bearer {}", token),
        }
    }
}

impl Default for CredentialHeader {
    fn default() -> Self {
        Self::raw("satoken")
    }
}

/// Business status codes carried in the response envelope.
///
/// Only `success` marks `data` as valid. The other codes select the error kind;
/// any code not listed here is reported as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessCodes {
    pub success: i64,
    pub bad_request: i64,
    pub unauthorized: i64,
    pub forbidden: i64,
    pub not_found: i64,
    pub server_error: i64,
}

impl BusinessCodes {
    /// Envelope codes that mirror HTTP statuses (`200` = success)
    pub fn http_style() -> Self {
        Self {
            success: 200,
            bad_request: 400,
            unauthorized: 401,
            forbidden: 403,
            not_found: 404,
            server_error: 500,
        }
    }

    /// `0` = success, error codes still mirror HTTP statuses
    pub fn zero_success() -> Self {
        Self {
            success: 0,
            ..Self::http_style()
        }
    }

    fn validate(&self) -> Result<()> {
        let errors = [
            ("bad_request", self.bad_request),
            ("unauthorized", self.unauthorized),
            ("forbidden", self.forbidden),
            ("not_found", self.not_found),
            ("server_error", self.server_error),
        ];

        if let Some((name, _)) = errors.iter().find(|(_, code)| *code == self.success) {
            return Err(Error::Config(format!(
                "Business code {} is used for both success and {}",
                self.success, name
            )));
        }

        Ok(())
    }
}

impl Default for BusinessCodes {
    fn default() -> Self {
        Self::http_style()
    }
}

/// What a successful call resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadPolicy {
    /// The envelope's `data`, or `null` when the server sent none
    #[default]
    Data,
    /// The envelope's `data`, or the whole envelope when `data` is absent
    DataOrEnvelope,
    /// Always the whole envelope (`code`, `message`, `data`)
    Envelope,
}

/// Durable storage keys used by the session store.
///
/// Kept separate from the header names: the warehouse backend reads the
/// credential from a `satoken` header while the browser kept it under `token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionKeys {
    pub token_key: String,
    pub profile_key: String,
}

impl SessionKeys {
    pub fn validate(&self) -> Result<()> {
        if self.token_key.is_empty() || self.profile_key.is_empty() {
            return Err(Error::Config(
                "Session storage keys cannot be empty".to_string(),
            ));
        }
        if self.token_key == self.profile_key {
            return Err(Error::Config(format!(
                "Token and profile cannot share the storage key '{}'",
                self.token_key
            )));
        }
        Ok(())
    }
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self {
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            profile_key: DEFAULT_PROFILE_KEY.to_string(),
        }
    }
}

/// Configuration for one HTTP gateway.
///
/// Use [`GatewayConfig::builder`] or one of the presets to construct instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Short name used in logs and events (e.g. "warehouse")
    pub name: String,

    /// Absolute base URL every request path is joined onto
    pub base_url: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Header carrying the session credential
    pub credential_header: CredentialHeader,

    /// Response header the server uses to hand out a fresh credential
    pub rotation_header: Option<String>,

    /// Envelope business codes for this backend
    pub business_codes: BusinessCodes,

    /// What successful calls resolve to
    pub payload_policy: PayloadPolicy,

    /// Route passed to the navigator after a forced logout
    pub login_route: String,

    /// Headers added to every request before caller headers
    pub default_headers: BTreeMap<String, String>,
}

impl GatewayConfig {
    /// Creates a new builder for constructing a `GatewayConfig`.
    pub fn builder(name: impl Into<String>, base_url: impl Into<String>) -> GatewayConfigBuilder {
        GatewayConfigBuilder::new(name, base_url)
    }

    /// Main warehouse/inventory/order backend.
    pub fn warehouse(base_url: impl Into<String>) -> Result<Self> {
        Self::builder("warehouse", base_url)
            .credential_header(CredentialHeader::raw("satoken"))
            .rotation_header("satoken")
            .business_codes(BusinessCodes::http_style())
            .build()
    }

    /// Delivery/dispatch backend.
    pub fn delivery(base_url: impl Into<String>) -> Result<Self> {
        Self::builder("delivery", base_url)
            .credential_header(CredentialHeader::bearer())
            .business_codes(BusinessCodes::zero_success())
            .build()
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Join `path` onto the base URL.
    ///
    /// Exactly one `/` separates the two regardless of how either side is
    /// written.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Name is not empty
    /// - Base URL is an absolute http(s) URL
    /// - Header names are non-empty HTTP tokens
    /// - Timeout is > 0 and within [`MAX_TIMEOUT_MS`]
    /// - Success code does not collide with an error code
    /// - Login route is not empty
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("Gateway name cannot be empty".to_string()));
        }

        let url = Url::parse(&self.base_url).map_err(|e| {
            Error::Config(format!(
                "Gateway '{}' base URL '{}' is not an absolute URL: {}",
                self.name, self.base_url, e
            ))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::Config(format!(
                "Gateway '{}' base URL must use http or https, got '{}'",
                self.name,
                url.scheme()
            )));
        }

        validate_header_name(&self.credential_header.name)?;
        if let Some(rotation) = &self.rotation_header {
            validate_header_name(rotation)?;
        }
        for name in self.default_headers.keys() {
            validate_header_name(name)?;
        }

        if self.timeout_ms == 0 {
            return Err(Error::Config(
                "Request timeout must be greater than 0ms".to_string(),
            ));
        }
        if self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(Error::Config(format!(
                "Request timeout exceeds maximum of {}ms",
                MAX_TIMEOUT_MS
            )));
        }

        self.business_codes.validate()?;

        if self.login_route.trim().is_empty() {
            return Err(Error::Config("Login route cannot be empty".to_string()));
        }

        Ok(())
    }
}

fn validate_header_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b));
    if valid {
        Ok(())
    } else {
        Err(Error::Config(format!("Invalid header name '{}'", name)))
    }
}

/// Builder for constructing [`GatewayConfig`] instances.
///
/// Unset options fall back to the warehouse conventions.
#[derive(Debug, Clone)]
pub struct GatewayConfigBuilder {
    name: String,
    base_url: String,
    timeout_ms: Option<u64>,
    credential_header: Option<CredentialHeader>,
    rotation_header: Option<String>,
    business_codes: Option<BusinessCodes>,
    payload_policy: Option<PayloadPolicy>,
    login_route: Option<String>,
    default_headers: BTreeMap<String, String>,
}

impl GatewayConfigBuilder {
    fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            timeout_ms: None,
            credential_header: None,
            rotation_header: None,
            business_codes: None,
            payload_policy: None,
            login_route: None,
            default_headers: BTreeMap::new(),
        }
    }

    /// Sets the per-request timeout in milliseconds.
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Sets the credential header name and scheme.
    pub fn credential_header(mut self, header: CredentialHeader) -> Self {
        self.credential_header = Some(header);
        self
    }

    /// Accept rotated credentials from this response header.
    pub fn rotation_header(mut self, name: impl Into<String>) -> Self {
        self.rotation_header = Some(name.into());
        self
    }

    /// Sets the envelope business codes.
    pub fn business_codes(mut self, codes: BusinessCodes) -> Self {
        self.business_codes = Some(codes);
        self
    }

    /// Sets the payload unwrapping policy.
    pub fn payload_policy(mut self, policy: PayloadPolicy) -> Self {
        self.payload_policy = Some(policy);
        self
    }

    /// Sets the route used after a forced logout.
    pub fn login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = Some(route.into());
        self
    }

    /// Adds a header sent with every request.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Builds the final configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when validation fails.
    pub fn build(self) -> Result<GatewayConfig> {
        let mut default_headers = self.default_headers;
        default_headers
            .entry("Content-Type".to_string())
            .or_insert_with(|| "application/json".to_string());

        let config = GatewayConfig {
            name: self.name,
            base_url: self.base_url,
            timeout_ms: self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
            credential_header: self.credential_header.unwrap_or_default(),
            rotation_header: self.rotation_header,
            business_codes: self.business_codes.unwrap_or_default(),
            payload_policy: self.payload_policy.unwrap_or_default(),
            login_route: self
                .login_route
                .unwrap_or_else(|| DEFAULT_LOGIN_ROUTE.to_string()),
            default_headers,
        };

        config.validate()?;
        Ok(config)
    }
}
