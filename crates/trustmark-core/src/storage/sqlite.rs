//! `SQLite` backed key-value storage.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::debug;

use super::Storage;
use crate::Result;

/// Key-value storage persisted in a `SQLite` database.
///
/// Clones share the connection pool.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open storage at the given database path.
    ///
    /// Creates the database and table if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let storage = Self { pool };
        storage.initialize().await?;
        Ok(storage)
    }

    /// Create in-memory storage for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let storage = Self { pool };
        storage.initialize().await?;
        Ok(storage)
    }

    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All stored keys, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn keys(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|r| r.get("key")).collect())
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => {
                let raw: String = r.get("value");
                Ok(Some(serde_json::from_str(&raw)?))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let raw = serde_json::to_string(&value)?;

        sqlx::query(
            r"
            INSERT INTO kv_store (key, value)
            VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
            ",
        )
        .bind(key)
        .bind(&raw)
        .execute(&self.pool)
        .await?;

        debug!(key, "stored value");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_key() {
        let storage = SqliteStorage::in_memory().await.unwrap();
        assert_eq!(storage.get("allowedDomains_0").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let storage = SqliteStorage::in_memory().await.unwrap();
        storage
            .set("allowedDomains_0", json!(["example.com", "example.co.uk"]))
            .await
            .unwrap();

        assert_eq!(
            storage.get("allowedDomains_0").await.unwrap(),
            Some(json!(["example.com", "example.co.uk"]))
        );
    }

    #[tokio::test]
    async fn test_set_replaces_existing_value() {
        let storage = SqliteStorage::in_memory().await.unwrap();
        storage.set("highlightUntrusted", json!(false)).await.unwrap();
        storage.set("highlightUntrusted", json!(true)).await.unwrap();

        assert_eq!(
            storage.get("highlightUntrusted").await.unwrap(),
            Some(json!(true))
        );
        assert_eq!(storage.keys().await.unwrap(), vec!["highlightUntrusted"]);
    }

    #[tokio::test]
    async fn test_clones_share_pool() {
        let storage = SqliteStorage::in_memory().await.unwrap();
        let other = storage.clone();

        storage.set("addIcon", json!(false)).await.unwrap();
        assert_eq!(other.get("addIcon").await.unwrap(), Some(json!(false)));
    }
}
