//! # Request Pipeline
//!
//! The two halves of every exchange, kept free of side effects.
//!
//! - **Outbound**: an ordered list of [`OutboundStage`]s rewrites the
//!   [`HttpRequest`] before it reaches the transport. Stages only read the
//!   gateway configuration and the credential captured for this request.
//! - **Inbound**: [`classify`] turns whatever the transport produced into an
//!   [`Inbound`] verdict. It never touches the session, the navigator or the
//!   notifier; the gateway applies those effects afterwards.
//!
//! ## Precedence
//!
//! ```text
//! transport error ───────────────────────────> NetworkError
//! HTTP 200 / 201  ── envelope.code == success ─> Success(payload)
//!                 ── envelope.code listed ─────> mapped kind
//!                 ── other code ───────────────> Unknown
//!                 ── not an envelope ──────────> Unknown
//! any other HTTP status ──────────────────────> kind by HTTP status
//! ```
//!
//! With HTTP 200/201 only the business code decides. Any other status wins
//! over whatever envelope the body might carry; the envelope only contributes
//! its message.

use crate::envelope::Envelope;
use crate::error::{ErrorKind, GatewayError};
use bridge_traits::error::BridgeError;
use bridge_traits::http::{HttpRequest, HttpResponse};
use core_runtime::config::{BusinessCodes, GatewayConfig};
use serde_json::Value;
use std::sync::Arc;

// ============================================================================
// Outbound
// ============================================================================

/// Read-only inputs available to outbound stages.
#[derive(Debug, Clone, Copy)]
pub struct OutboundContext<'a> {
    pub config: &'a GatewayConfig,
    /// Credential captured from the session when the request was built
    pub token: Option<&'a str>,
}

/// One synchronous rewrite of an outgoing request.
pub trait OutboundStage: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, request: HttpRequest, context: &OutboundContext<'_>) -> HttpRequest;
}

/// Adds the configured default headers unless the caller already set them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHeadersStage;

impl OutboundStage for DefaultHeadersStage {
    fn name(&self) -> &'static str {
        "default_headers"
    }

    fn apply(&self, mut request: HttpRequest, context: &OutboundContext<'_>) -> HttpRequest {
        for (name, value) in &context.config.default_headers {
            if request.header_value(name).is_none() {
                request.headers.insert(name.clone(), value.clone());
            }
        }
        request
    }
}

/// Writes the session credential into the configured header.
///
/// Any header of the same name (in any casing) is replaced so the request
/// carries exactly the captured token. Nothing is added when the session holds
/// no credential or an empty one.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthHeaderStage;

impl OutboundStage for AuthHeaderStage {
    fn name(&self) -> &'static str {
        "auth_header"
    }

    fn apply(&self, mut request: HttpRequest, context: &OutboundContext<'_>) -> HttpRequest {
        let Some(token) = context.token.filter(|token| !token.is_empty()) else {
            return request;
        };

        let header = &context.config.credential_header;
        request
            .headers
            .retain(|name, _| !name.eq_ignore_ascii_case(&header.name));
        request
            .headers
            .insert(header.name.clone(), header.value_for(token));
        request
    }
}

/// Stages every gateway runs, in order.
pub fn default_stages() -> Vec<Arc<dyn OutboundStage>> {
    vec![Arc::new(DefaultHeadersStage), Arc::new(AuthHeaderStage)]
}

/// Run `stages` over `request` in order.
pub fn run_outbound(
    stages: &[Arc<dyn OutboundStage>],
    request: HttpRequest,
    context: &OutboundContext<'_>,
) -> HttpRequest {
    stages
        .iter()
        .fold(request, |request, stage| stage.apply(request, context))
}

// ============================================================================
// Inbound
// ============================================================================

/// What the transport produced for one exchange.
#[derive(Debug)]
pub enum TransportOutcome {
    Response(HttpResponse),
    Failed(BridgeError),
}

impl From<Result<HttpResponse, BridgeError>> for TransportOutcome {
    fn from(result: Result<HttpResponse, BridgeError>) -> Self {
        match result {
            Ok(response) => TransportOutcome::Response(response),
            Err(error) => TransportOutcome::Failed(error),
        }
    }
}

/// Verdict for one exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Success {
        payload: Value,
        /// Fresh credential from the rotation header, if the server sent one
        rotated_token: Option<String>,
    },
    Failure(GatewayError),
}

/// Classify a transport outcome under `config`.
pub fn classify(outcome: &TransportOutcome, config: &GatewayConfig) -> Inbound {
    let response = match outcome {
        TransportOutcome::Response(response) => response,
        TransportOutcome::Failed(error) => return Inbound::Failure(transport_failure(error)),
    };

    if matches!(response.status, 200 | 201) {
        classify_envelope(response, config)
    } else {
        Inbound::Failure(classify_http_status(response))
    }
}

fn transport_failure(error: &BridgeError) -> GatewayError {
    match error {
        BridgeError::Timeout(_) => GatewayError::new(ErrorKind::NetworkError, "Request timed out"),
        _ => GatewayError::from_kind(ErrorKind::NetworkError),
    }
}

fn classify_envelope(response: &HttpResponse, config: &GatewayConfig) -> Inbound {
    let Some(envelope) = Envelope::parse(&response.body) else {
        return Inbound::Failure(
            GatewayError::new(ErrorKind::Unknown, "Malformed response")
                .with_http_status(response.status),
        );
    };

    let codes = &config.business_codes;
    if envelope.code == codes.success {
        let rotated_token = config
            .rotation_header
            .as_deref()
            .and_then(|name| response.header(name))
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        return Inbound::Success {
            payload: envelope.into_payload(config.payload_policy),
            rotated_token,
        };
    }

    let kind = business_kind(codes, envelope.code);
    Inbound::Failure(
        GatewayError::new(kind, envelope.message_or(kind.fallback_message()))
            .with_http_status(response.status)
            .with_business_code(envelope.code),
    )
}

fn classify_http_status(response: &HttpResponse) -> GatewayError {
    let kind = ErrorKind::from_http_status(response.status);
    let fallback = match kind {
        ErrorKind::Unknown => format!("Error: {}", response.status),
        _ => kind.fallback_message().to_string(),
    };

    let error = match Envelope::parse(&response.body) {
        Some(envelope) => GatewayError::new(kind, envelope.message_or(&fallback))
            .with_business_code(envelope.code),
        None => GatewayError::new(kind, fallback),
    };
    error.with_http_status(response.status)
}

/// Error kind for a non-success business code.
pub fn business_kind(codes: &BusinessCodes, code: i64) -> ErrorKind {
    match code {
        c if c == codes.bad_request => ErrorKind::BadRequest,
        c if c == codes.unauthorized => ErrorKind::Unauthorized,
        c if c == codes.forbidden => ErrorKind::Forbidden,
        c if c == codes.not_found => ErrorKind::NotFound,
        c if c == codes.server_error => ErrorKind::ServerError,
        _ => ErrorKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::http::HttpMethod;
    use core_runtime::config::{CredentialHeader, PayloadPolicy};
    use serde_json::json;

    fn warehouse() -> GatewayConfig {
        GatewayConfig::warehouse("http://localhost/api").unwrap()
    }

    fn delivery() -> GatewayConfig {
        GatewayConfig::delivery("http://localhost:8080").unwrap()
    }

    fn respond(status: u16, body: &str) -> TransportOutcome {
        TransportOutcome::Response(HttpResponse::new(status, body.to_string()))
    }

    fn failure(inbound: Inbound) -> GatewayError {
        match inbound {
            Inbound::Failure(error) => error,
            other => panic!("expected failure, got {:?}", other),
        }
    }

    // ------------------------------------------------------------------
    // Outbound
    // ------------------------------------------------------------------

    #[test]
    fn test_auth_stage_sets_raw_header() {
        let config = warehouse();
        let context = OutboundContext {
            config: &config,
            token: Some("abc123"),
        };

        let request = run_outbound(
            &default_stages(),
            HttpRequest::new(HttpMethod::Get, config.endpoint("/orders")),
            &context,
        );

        assert_eq!(request.header_value("satoken"), Some("abc123"));
        assert_eq!(request.header_value("content-type"), Some("application/json"));
    }

    #[test]
    fn test_auth_stage_sets_bearer_header() {
        let config = delivery();
        let context = OutboundContext {
            config: &config,
            token: Some("abc123"),
        };

        let request = AuthHeaderStage.apply(HttpRequest::new(HttpMethod::Get, "http://x"), &context);
        assert_eq!(request.header_value("Authorization"), Some("Bearer abc123"));
    }

    #[test]
    fn test_auth_stage_replaces_stale_header_in_any_case() {
        let config = warehouse();
        let context = OutboundContext {
            config: &config,
            token: Some("fresh"),
        };

        let request = HttpRequest::new(HttpMethod::Get, "http://x").header("SaToken", "stale");
        let request = AuthHeaderStage.apply(request, &context);

        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header_value("satoken"), Some("fresh"));
    }

    #[test]
    fn test_auth_stage_skips_missing_or_empty_token() {
        let config = warehouse();
        for token in [None, Some("")] {
            let context = OutboundContext {
                config: &config,
                token,
            };
            let request = AuthHeaderStage.apply(HttpRequest::new(HttpMethod::Get, "http://x"), &context);
            assert!(request.header_value("satoken").is_none());
        }
    }

    #[test]
    fn test_default_headers_do_not_override_caller() {
        let config = GatewayConfig::builder("warehouse", "http://localhost/api")
            .credential_header(CredentialHeader::raw("satoken"))
            .default_header("X-Client", "depot-admin")
            .build()
            .unwrap();
        let context = OutboundContext {
            config: &config,
            token: None,
        };

        let request = HttpRequest::new(HttpMethod::Post, "http://x").header("content-type", "text/plain");
        let request = DefaultHeadersStage.apply(request, &context);

        assert_eq!(request.header_value("Content-Type"), Some("text/plain"));
        assert_eq!(request.header_value("X-Client"), Some("depot-admin"));
    }

    // ------------------------------------------------------------------
    // Inbound: business layer (HTTP 200/201)
    // ------------------------------------------------------------------

    #[test]
    fn test_success_unwraps_data() {
        let inbound = classify(
            &respond(200, r#"{"code":200,"message":"ok","data":{"orders":[]}}"#),
            &warehouse(),
        );

        assert_eq!(
            inbound,
            Inbound::Success {
                payload: json!({"orders": []}),
                rotated_token: None,
            }
        );
    }

    #[test]
    fn test_created_is_treated_like_ok() {
        let inbound = classify(&respond(201, r#"{"code":200,"data":7}"#), &warehouse());
        assert!(matches!(inbound, Inbound::Success { payload, .. } if payload == json!(7)));
    }

    #[test]
    fn test_success_reads_rotation_header() {
        let outcome = TransportOutcome::Response(
            HttpResponse::new(200, r#"{"code":200,"data":null}"#).with_header("satoken", "rotated"),
        );

        match classify(&outcome, &warehouse()) {
            Inbound::Success { rotated_token, payload } => {
                assert_eq!(rotated_token.as_deref(), Some("rotated"));
                assert_eq!(payload, Value::Null);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_rotation_header_ignored_without_configuration() {
        let outcome = TransportOutcome::Response(
            HttpResponse::new(200, r#"{"code":0,"data":1}"#).with_header("satoken", "rotated"),
        );

        match classify(&outcome, &delivery()) {
            Inbound::Success { rotated_token, .. } => assert!(rotated_token.is_none()),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_business_unauthorized_with_server_message() {
        let error = failure(classify(
            &respond(200, r#"{"code":401,"message":"未登录"}"#),
            &warehouse(),
        ));

        assert_eq!(error.kind, ErrorKind::Unauthorized);
        assert_eq!(error.message, "未登录");
        assert_eq!(error.http_status, Some(200));
        assert_eq!(error.business_code, Some(401));
    }

    #[test]
    fn test_business_codes_map_to_kinds() {
        let cases = [
            (400, ErrorKind::BadRequest, "Invalid request parameters"),
            (403, ErrorKind::Forbidden, "Permission denied"),
            (404, ErrorKind::NotFound, "Resource not found"),
            (500, ErrorKind::ServerError, "Internal server error"),
            (999, ErrorKind::Unknown, "Unknown error"),
        ];

        for (code, kind, message) in cases {
            let body = format!(r#"{{"code":{}}}"#, code);
            let error = failure(classify(&respond(200, &body), &warehouse()));
            assert_eq!(error.kind, kind, "code {}", code);
            assert_eq!(error.message, message, "code {}", code);
        }
    }

    #[test]
    fn test_success_code_is_per_gateway() {
        // 200 is the warehouse success code but unknown to the delivery backend.
        let error = failure(classify(&respond(200, r#"{"code":200,"data":1}"#), &delivery()));
        assert_eq!(error.kind, ErrorKind::Unknown);

        let error = failure(classify(&respond(200, r#"{"code":0,"data":1}"#), &warehouse()));
        assert_eq!(error.kind, ErrorKind::Unknown);
    }

    #[test]
    fn test_malformed_body_is_unknown() {
        let error = failure(classify(&respond(200, "not json"), &warehouse()));
        assert_eq!(error.kind, ErrorKind::Unknown);
        assert_eq!(error.message, "Malformed response");
    }

    #[test]
    fn test_payload_policy_is_applied() {
        let config = GatewayConfig::builder("warehouse", "http://localhost/api")
            .payload_policy(PayloadPolicy::Envelope)
            .build()
            .unwrap();

        match classify(&respond(200, r#"{"code":200,"message":"ok"}"#), &config) {
            Inbound::Success { payload, .. } => {
                assert_eq!(payload, json!({"code": 200, "message": "ok", "data": null}))
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    // ------------------------------------------------------------------
    // Inbound: transport layer
    // ------------------------------------------------------------------

    #[test]
    fn test_http_401_without_envelope() {
        let error = failure(classify(&respond(401, ""), &warehouse()));
        assert_eq!(error.kind, ErrorKind::Unauthorized);
        assert_eq!(error.message, "Not logged in, please sign in again");
        assert_eq!(error.http_status, Some(401));
        assert_eq!(error.business_code, None);
    }

    #[test]
    fn test_http_status_wins_over_success_envelope() {
        let error = failure(classify(
            &respond(403, r#"{"code":200,"message":"forbidden here"}"#),
            &warehouse(),
        ));
        assert_eq!(error.kind, ErrorKind::Forbidden);
        assert_eq!(error.message, "forbidden here");
        assert_eq!(error.business_code, Some(200));
    }

    #[test]
    fn test_unlisted_http_status() {
        let error = failure(classify(&respond(502, "<html>"), &warehouse()));
        assert_eq!(error.kind, ErrorKind::ServerError);

        let error = failure(classify(&respond(418, ""), &warehouse()));
        assert_eq!(error.kind, ErrorKind::Unknown);
        assert_eq!(error.message, "Error: 418");

        let error = failure(classify(&respond(204, ""), &warehouse()));
        assert_eq!(error.kind, ErrorKind::Unknown);
    }

    #[test]
    fn test_transport_failures_are_network_errors() {
        let error = failure(classify(
            &TransportOutcome::Failed(BridgeError::Connection("refused".to_string())),
            &warehouse(),
        ));
        assert_eq!(error.kind, ErrorKind::NetworkError);
        assert_eq!(
            error.message,
            "Network error, please check that the backend service is reachable"
        );
        assert_eq!(error.http_status, None);

        let error = failure(classify(
            &TransportOutcome::Failed(BridgeError::Timeout("10s".to_string())),
            &warehouse(),
        ));
        assert_eq!(error.kind, ErrorKind::NetworkError);
        assert_eq!(error.message, "Request timed out");
    }
}
