//! # Host Bridge Traits
//!
//! Capability traits the admin core requires from its host.
//!
//! ## Overview
//!
//! This crate defines the contract between the core library and host-specific
//! implementations. Each trait represents a capability that the core requires but
//! that must be implemented differently per host (desktop shell, browser, tests).
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Raw async HTTP exchange, no status interpretation
//!
//! ### Storage
//! - [`SettingsStore`](storage::SettingsStore) - Durable key-value storage (localStorage equivalent)
//!
//! ### UI Integration
//! - [`Navigator`](ui::Navigator) - Router handle used to force a view change
//! - [`Notifier`](ui::Notifier) - Transient user notifications (toasts)
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All fallible bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Implementations should convert host-specific errors to `BridgeError` and keep
//! credentials out of error messages.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single implementation can be
//! shared by every gateway and the session store across async tasks.
//!
//! ## Examples
//!
//! ### Implementing HttpClient
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         // Implementation
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod logging;
pub mod storage;
pub mod ui;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use storage::SettingsStore;
pub use ui::{Navigator, Notice, NoticeLevel, Notifier, SilentNotifier};
