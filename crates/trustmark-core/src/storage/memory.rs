//! In-process storage shared between handles.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::Storage;
use crate::Result;

/// Storage kept in memory.
///
/// Clones share the same map, so several simulated tabs can hold their own
/// handle onto one store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nothing has been written yet.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_entries() {
        let first = MemoryStorage::new();
        let second = first.clone();

        first.set("addDomain", Value::Bool(false)).await.unwrap();

        assert_eq!(
            second.get("addDomain").await.unwrap(),
            Some(Value::Bool(false))
        );
        assert_eq!(second.len().await, 1);
    }

    #[tokio::test]
    async fn test_set_replaces() {
        let storage = MemoryStorage::new();
        storage.set("k", Value::Bool(true)).await.unwrap();
        storage.set("k", Value::Bool(false)).await.unwrap();

        assert_eq!(storage.get("k").await.unwrap(), Some(Value::Bool(false)));
        assert!(!storage.is_empty().await);
    }
}
