//! Settings Storage using SQLite

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::SettingsStore,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Row,
};
use std::path::PathBuf;
use tracing::debug;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at INTEGER NOT NULL
    )
"#;

/// SQLite-backed settings store implementation
///
/// Desktop counterpart of browser `localStorage`: survives restarts, keeps
/// string values keyed by name, and serializes writes through SQLite.
pub struct SqliteSettingsStore {
    pool: SqlitePool,
}

impl SqliteSettingsStore {
    /// Create a new settings store with the given database path
    pub async fn new(db_path: PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(BridgeError::Io)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to connect to DB: {}", e)))?;

        Self::create_table(&pool).await?;

        debug!(path = ?db_path, "Initialized settings store");

        Ok(Self { pool })
    }

    /// Create an in-memory settings store (for testing)
    pub async fn in_memory() -> Result<Self> {
        // Every SQLite connection gets its own in-memory database, so the
        // pool must never open a second one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to connect to DB: {}", e)))?;

        Self::create_table(&pool).await?;

        Ok(Self { pool })
    }

    async fn create_table(pool: &SqlitePool) -> Result<()> {
        sqlx::query(CREATE_TABLE)
            .execute(pool)
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to create table: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| BridgeError::Storage(format!("Failed to set setting: {}", e)))?;

        debug!(key = key, "Stored setting");
        Ok(())
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to get setting: {}", e)))?;

        Ok(row.map(|row| row.get(0)))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM settings WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to delete setting: {}", e)))?;

        debug!(key = key, "Deleted setting");
        Ok(())
    }

    async fn has_key(&self, key: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to check key: {}", e)))?;

        Ok(row.is_some())
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT key FROM settings ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to list keys: {}", e)))?;

        let keys = rows.into_iter().map(|row| row.get(0)).collect();
        Ok(keys)
    }

    async fn clear_all(&self) -> Result<()> {
        sqlx::query("DELETE FROM settings")
            .execute(&self.pool)
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to clear settings: {}", e)))?;

        debug!("Cleared all settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_settings_store_creation() {
        let _store = SqliteSettingsStore::in_memory().await.unwrap();
    }

    #[tokio::test]
    async fn test_string_operations() {
        let store = SqliteSettingsStore::in_memory().await.unwrap();

        store.set_string("token", "abc123").await.unwrap();
        let value = store.get_string("token").await.unwrap();
        assert_eq!(value, Some("abc123".to_string()));

        store.set_string("token", "rotated").await.unwrap();
        let value = store.get_string("token").await.unwrap();
        assert_eq!(value, Some("rotated".to_string()));

        store.delete("token").await.unwrap();
        let value = store.get_string("token").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_delete_missing_key_succeeds() {
        let store = SqliteSettingsStore::in_memory().await.unwrap();
        store.delete("userInfo").await.unwrap();
        assert!(!store.has_key("userInfo").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_keys_and_clear() {
        let store = SqliteSettingsStore::in_memory().await.unwrap();

        store.set_string("userInfo", "{}").await.unwrap();
        store.set_string("token", "abc").await.unwrap();

        let keys = store.list_keys().await.unwrap();
        assert_eq!(keys, vec!["token", "userInfo"]);

        store.clear_all().await.unwrap();
        assert!(store.list_keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_backed_store_survives_reopen() {
        let dir = std::env::temp_dir().join(format!("depot-admin-settings-{}", std::process::id()));
        let path = dir.join("settings.db");

        {
            let store = SqliteSettingsStore::new(path.clone()).await.unwrap();
            store.set_string("token", "persisted").await.unwrap();
            store.pool.close().await;
        }

        let reopened = SqliteSettingsStore::new(path).await.unwrap();
        assert_eq!(
            reopened.get_string("token").await.unwrap(),
            Some("persisted".to_string())
        );

        reopened.pool.close().await;
        let _ = std::fs::remove_dir_all(dir);
    }
}
