//! HTTP gateway
//!
//! A configured client for one backend. Every call runs the outbound stages,
//! sends exactly one exchange through the transport, classifies the outcome and
//! then applies the session, navigation and notification effects.

use crate::error::{ErrorKind, GatewayError, Result};
use crate::multipart::MultipartForm;
use crate::pipeline::{
    classify, default_stages, run_outbound, Inbound, OutboundContext, OutboundStage,
    TransportOutcome,
};
use crate::request::RequestOptions;
use bridge_traits::error::BridgeError;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use bridge_traits::ui::{Navigator, Notice, Notifier};
use bytes::Bytes;
use core_runtime::config::GatewayConfig;
use core_runtime::events::{CoreEvent, EventBus, GatewayEvent};
use core_runtime::logging::redact_headers;
use core_session::SessionStore;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

/// HTTP gateway for one backend.
///
/// Cheap to clone; clones share the transport, the session store and the
/// host collaborators.
///
/// # Example
///
/// ```ignore
/// use core_gateway::{Gateway, RequestOptions};
///
/// let gateway = Gateway::new(config, transport, session, navigator, notifier);
/// let orders = gateway
///     .get("/orders", RequestOptions::new().query_pair("page", 1))
///     .await?;
/// ```
#[derive(Clone)]
pub struct Gateway {
    config: Arc<GatewayConfig>,
    transport: Arc<dyn HttpClient>,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    stages: Vec<Arc<dyn OutboundStage>>,
    event_bus: Option<EventBus>,
}

/// Identity of one call, carried through logging and events.
struct CallInfo<'a> {
    request_id: Uuid,
    method: HttpMethod,
    path: &'a str,
}

impl Gateway {
    pub fn new(
        config: GatewayConfig,
        transport: Arc<dyn HttpClient>,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            session,
            navigator,
            notifier,
            stages: default_stages(),
            event_bus: None,
        }
    }

    /// Publish request failures on `bus`.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Append an outbound stage after the built-in ones.
    pub fn with_stage(mut self, stage: Arc<dyn OutboundStage>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<Value> {
        self.request(HttpMethod::Get, path, options).await
    }

    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<Value> {
        self.request(HttpMethod::Post, path, options).await
    }

    pub async fn put(&self, path: &str, options: RequestOptions) -> Result<Value> {
        self.request(HttpMethod::Put, path, options).await
    }

    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<Value> {
        self.request(HttpMethod::Delete, path, options).await
    }

    /// Like [`request`](Self::request), decoding the payload into `T`.
    ///
    /// A payload that does not fit `T` is reported as [`ErrorKind::Unknown`].
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let payload = self.request(method, path, options).await?;
        serde_json::from_value(payload).map_err(|e| {
            warn!(gateway = %self.config.name, path, error = %e, "Response payload has an unexpected shape");
            GatewayError::new(ErrorKind::Unknown, format!("Unexpected response payload: {}", e))
        })
    }

    /// Send one request and resolve it to the unwrapped payload.
    ///
    /// # Errors
    ///
    /// Every failure is a [`GatewayError`]. All kinds except
    /// [`ErrorKind::Cancelled`] have already been shown to the user through the
    /// notifier by the time this returns; [`ErrorKind::Unauthorized`] has also
    /// torn the session down and navigated to the login route (once per
    /// session).
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value> {
        let call = CallInfo {
            request_id: Uuid::new_v4(),
            method,
            path,
        };
        let span = info_span!(
            "gateway_request",
            gateway = %self.config.name,
            request_id = %call.request_id,
            method = %method,
            path = path,
        );

        self.execute(&call, options).instrument(span).await
    }

    async fn execute(&self, call: &CallInfo<'_>, options: RequestOptions) -> Result<Value> {
        let cancellation = options.cancellation.clone();
        if cancellation.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Err(self.cancelled(call));
        }

        let (token, generation) = self.session.load_credential().await;
        let deadline = options.timeout.unwrap_or_else(|| self.config.timeout());

        let request = self.build_request(call, options)?;
        let request = run_outbound(
            &self.stages,
            request,
            &OutboundContext {
                config: &self.config,
                token: token.as_deref(),
            },
        )
        .timeout(deadline);

        debug!(
            url = %request.url,
            headers = ?redact_headers(&request.headers),
            generation,
            "Sending request"
        );

        let exchange = tokio::time::timeout(deadline, self.transport.execute(request));
        let result = match &cancellation {
            Some(cancel) => tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(self.cancelled(call)),
                result = exchange => result,
            },
            None => exchange.await,
        };

        // A cancellation that raced the response still wins.
        if cancellation.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Err(self.cancelled(call));
        }

        let outcome: TransportOutcome = match result {
            Ok(result) => result.into(),
            Err(_) => TransportOutcome::Failed(BridgeError::Timeout(format!(
                "no response within {}ms",
                deadline.as_millis()
            ))),
        };

        match classify(&outcome, &self.config) {
            Inbound::Success {
                payload,
                rotated_token,
            } => {
                if let Some(rotated) = rotated_token {
                    self.apply_rotation(&rotated, generation).await;
                }
                debug!("Request succeeded");
                Ok(payload)
            }
            Inbound::Failure(error) => Err(self.fail(call, error, generation).await),
        }
    }

    fn build_request(&self, call: &CallInfo<'_>, options: RequestOptions) -> Result<HttpRequest> {
        let mut url = self.config.endpoint(call.path);
        if !options.query.is_empty() {
            let query = serde_urlencoded::to_string(&options.query).map_err(|e| {
                GatewayError::new(
                    ErrorKind::BadRequest,
                    format!("{}: {}", ErrorKind::BadRequest.fallback_message(), e),
                )
            })?;
            let separator = if url.contains('?') { '&' } else { '?' };
            url.push(separator);
            url.push_str(&query);
        }

        let mut request = HttpRequest::new(call.method, url);
        for (name, value) in options.headers {
            request = request.header(name, value);
        }

        if let Some(body) = options.body {
            let bytes = serde_json::to_vec(&body).map_err(|e| {
                GatewayError::new(
                    ErrorKind::BadRequest,
                    format!("{}: {}", ErrorKind::BadRequest.fallback_message(), e),
                )
            })?;
            request = request.body(Bytes::from(bytes));
        }

        if let Some(form) = options.multipart {
            let boundary = format!("----depot-{}", Uuid::new_v4().simple());
            request = request
                .header("Content-Type", MultipartForm::content_type(&boundary))
                .body(form.encode(&boundary));
        }

        Ok(request)
    }

    async fn apply_rotation(&self, token: &str, generation: u64) {
        match self
            .session
            .rotate_token(token, generation, &self.config.name)
            .await
        {
            Ok(true) => debug!("Stored rotated credential"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Failed to persist rotated credential"),
        }
    }

    async fn fail(&self, call: &CallInfo<'_>, error: GatewayError, generation: u64) -> GatewayError {
        warn!(
            kind = %error.kind,
            http_status = ?error.http_status,
            business_code = ?error.business_code,
            message = %error.message,
            "Request failed"
        );

        if error.kind.is_reported() {
            self.notifier.notify(Notice::error(error.message.clone()));
        }

        if error.is_unauthorized() && self.session.expire(generation, &self.config.name).await {
            self.navigator.navigate_to(&self.config.login_route);
        }

        self.emit(GatewayEvent::RequestFailed {
            gateway: self.config.name.clone(),
            request_id: call.request_id.to_string(),
            method: call.method.to_string(),
            path: call.path.to_string(),
            kind: error.kind.to_string(),
            http_status: error.http_status,
            business_code: error.business_code,
            message: error.message.clone(),
        });

        error
    }

    fn cancelled(&self, call: &CallInfo<'_>) -> GatewayError {
        debug!("Request cancelled by caller");
        self.emit(GatewayEvent::RequestCancelled {
            gateway: self.config.name.clone(),
            request_id: call.request_id.to_string(),
            path: call.path.to_string(),
        });
        GatewayError::cancelled()
    }

    fn emit(&self, event: GatewayEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Gateway(event)).ok();
        }
    }
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("name", &self.config.name)
            .field("base_url", &self.config.base_url)
            .field(
                "stages",
                &self.stages.iter().map(|stage| stage.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
