//! In-memory settings store for tests and ephemeral hosts

use async_trait::async_trait;
use bridge_traits::{error::Result, storage::SettingsStore};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Non-persistent `SettingsStore` backed by a shared map.
///
/// Clones share the same map, which lets tests simulate a page reload by
/// building a second session store over the same storage.
#[derive(Clone, Default)]
pub struct MemorySettingsStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Arc::new(Mutex::new(map)),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.entries.lock().await.contains_key(key))
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.lock().await.keys().cloned().collect())
    }

    async fn clear_all(&self) -> Result<()> {
        self.entries.lock().await.clear();
        Ok(())
    }
}
