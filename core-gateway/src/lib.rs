//! # Core Gateway
//!
//! Backend-facing HTTP clients for the admin console.
//!
//! ## Overview
//!
//! A [`Gateway`] wraps one backend (warehouse, delivery, ...) and resolves every
//! call to either the unwrapped payload or a classified [`GatewayError`]:
//!
//! - Outbound, the configured default headers and the session credential are
//!   attached by the [`OutboundStage`]s in [`pipeline`].
//! - Inbound, [`pipeline::classify`] interprets the HTTP status and the
//!   `{code, message, data}` [`Envelope`] without side effects.
//! - The gateway then applies the effects: rotated credentials are stored,
//!   failures are shown through the host notifier, and a rejected credential
//!   tears the shared session down and navigates to the login route exactly
//!   once.
//!
//! Several gateways may share one [`SessionStore`](core_session::SessionStore);
//! the session generation keeps concurrent 401s and late rotations from
//! different backends from stepping on each other.

pub mod envelope;
pub mod error;
mod gateway;
mod multipart;
pub mod pipeline;
mod request;

pub use bridge_traits::http::HttpMethod;
pub use envelope::Envelope;
pub use error::{ErrorKind, GatewayError, Result};
pub use gateway::Gateway;
pub use multipart::MultipartForm;
pub use pipeline::{
    AuthHeaderStage, DefaultHeadersStage, Inbound, OutboundContext, OutboundStage,
    TransportOutcome,
};
pub use request::RequestOptions;
pub use tokio_util::sync::CancellationToken;
