//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop hosts
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides production-ready implementations of the bridge traits
//! using desktop-appropriate libraries:
//! - `HttpClient` using `reqwest`
//! - `SettingsStore` using a SQLite-backed key-value table
//! - `SettingsStore` in memory, for tests and throwaway sessions
//! - `Notifier` forwarding notices to `tracing`
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, SqliteSettingsStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = ReqwestHttpClient::new()?;
//!     let settings = SqliteSettingsStore::new("depot-admin/settings.db".into()).await?;
//!
//!     // Use in core configuration
//! }
//! ```

mod http;
mod memory;
mod notify;
mod settings;

pub use http::ReqwestHttpClient;
pub use memory::MemorySettingsStore;
pub use notify::TracingNotifier;
pub use settings::SqliteSettingsStore;
