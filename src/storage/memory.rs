//! In-process record store.
//!
//! Used by the test suites and by `STORE_BACKEND=memory` local runs. Data is
//! lost when the process exits.

use crate::storage::error::{StoreError, StoreResult};
use crate::storage::store::RecordStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A record store over a shared ordered map. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        self.data.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.data.write().await.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.data.read().await.contains_key(key))
    }

    async fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.data.read().await.keys().cloned().collect())
    }

    async fn increment(&self, counter_key: &str) -> StoreResult<u64> {
        // Read and write happen under one write guard.
        let mut data = self.data.write().await;
        let current = match data.get(counter_key) {
            Some(raw) => std::str::from_utf8(raw)
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .ok_or_else(|| StoreError::CorruptCounter {
                    key: counter_key.to_string(),
                })?,
            None => 0,
        };
        let next = current + 1;
        data.insert(counter_key.to_string(), next.to_string().into_bytes());
        Ok(next)
    }

    async fn flush_all(&self) -> StoreResult<()> {
        self.data.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn increment_starts_at_one_and_is_visible_as_a_key() {
        let store = MemoryStore::new();
        assert_eq!(store.increment("index").await.unwrap(), 1);
        assert_eq!(store.increment("index").await.unwrap(), 2);
        assert_eq!(store.get("index").await.unwrap(), Some(b"2".to_vec()));
        assert_eq!(store.keys().await.unwrap(), vec!["index".to_string()]);
    }

    #[tokio::test]
    async fn increment_rejects_non_numeric_counter() {
        let store = MemoryStore::new();
        store.set("index", b"abc".to_vec()).await.unwrap();
        let err = store.increment("index").await.unwrap_err();
        assert!(matches!(err, StoreError::CorruptCounter { ref key } if key == "index"));
    }

    #[tokio::test]
    async fn concurrent_increments_never_repeat() {
        let store = MemoryStore::new();
        let mut handles = Vec::new();
        for _ in 0..64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move { store.increment("index").await.unwrap() }));
        }
        let mut seen = Vec::new();
        for h in handles {
            seen.push(h.await.unwrap());
        }
        seen.sort_unstable();
        assert_eq!(seen, (1..=64).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn delete_and_flush() {
        let store = MemoryStore::new();
        store.set("1", b"a".to_vec()).await.unwrap();
        store.set("2", b"b".to_vec()).await.unwrap();

        store.delete("1").await.unwrap();
        store.delete("missing").await.unwrap();
        assert!(!store.exists("1").await.unwrap());
        assert!(store.exists("2").await.unwrap());

        store.flush_all().await.unwrap();
        assert!(store.is_empty().await);
    }
}
