//! Durable Key-Value Storage Abstraction
//!
//! The session layer mirrors its state into a host-provided key-value store
//! (browser `localStorage`, a desktop settings database, ...). Values are
//! opaque strings; callers serialize structured data themselves.

use async_trait::async_trait;

use crate::error::Result;

/// Key-value settings storage trait
///
/// Abstracts platform-specific persistent storage:
/// - Desktop: SQLite-backed settings database
/// - Web: localStorage
/// - Tests: in-memory map
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::SettingsStore;
///
/// async fn remember_token(store: &dyn SettingsStore, token: &str) -> Result<()> {
///     store.set_string("token", token).await
/// }
/// ```
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Store a string value, replacing any previous value
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve a string value
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Delete a setting
    ///
    /// Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a setting exists
    async fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.get_string(key).await?.is_some())
    }

    /// List all setting keys
    async fn list_keys(&self) -> Result<Vec<String>>;

    /// Clear all settings
    async fn clear_all(&self) -> Result<()>;
}
