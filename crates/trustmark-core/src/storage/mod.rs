//! Durable key-value storage.
//!
//! Values are JSON documents. Settings are stored as booleans under their
//! own keys and allow-lists as string arrays under
//! `{listKind}_{identity}`. Each `set` replaces one key atomically; there is
//! no multi-key transaction.

mod memory;
mod sqlite;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use crate::Result;

/// Backend for persisted settings and allow-lists.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// Read a typed value, falling back to `default` when the key is absent.
///
/// # Errors
///
/// Returns an error if the backend fails or the stored value has the wrong
/// shape.
pub async fn get_or<S, T>(storage: &S, key: &str, default: T) -> Result<T>
where
    S: Storage + ?Sized,
    T: DeserializeOwned,
{
    match storage.get(key).await? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(default),
    }
}

/// Write a typed value.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized or the backend fails.
pub async fn put<S, T>(storage: &S, key: &str, value: &T) -> Result<()>
where
    S: Storage + ?Sized,
    T: Serialize + ?Sized,
{
    storage.set(key, serde_json::to_value(value)?).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_or_default_when_absent() {
        let storage = MemoryStorage::new();
        let value: bool = get_or(&storage, "addIcon", true).await.unwrap();
        assert!(value);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let storage = MemoryStorage::new();
        put(&storage, "allowedEmails_0", &["a@b.com"]).await.unwrap();

        let value: Vec<String> = get_or(&storage, "allowedEmails_0", Vec::new())
            .await
            .unwrap();
        assert_eq!(value, vec!["a@b.com".to_string()]);
    }

    #[tokio::test]
    async fn test_wrong_shape_is_an_error() {
        let storage = MemoryStorage::new();
        put(&storage, "addIcon", "yes").await.unwrap();

        let result: Result<bool> = get_or(&storage, "addIcon", true).await;
        assert!(matches!(result, Err(crate::Error::Serde(_))));
    }
}
