//! The record store contract used by the product repository.

use crate::storage::error::StoreResult;
use async_trait::async_trait;

/// Primitive access to a key-value store.
///
/// Keys are strings and values are opaque bytes; the repository layer owns
/// the serialization format. Implementations must be safe to share between
/// concurrent requests and must make [`increment`](RecordStore::increment)
/// atomic: two callers can never receive the same value.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Liveness check against the store.
    async fn ping(&self) -> StoreResult<()>;

    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Vec<u8>) -> StoreResult<()>;

    /// Removes `key`. Removing an absent key is a no-op.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Every key currently stored, counters included. No ordering guarantee.
    async fn keys(&self) -> StoreResult<Vec<String>>;

    /// Atomically increments the named counter and returns the new value.
    /// A missing counter starts from zero, so the first call returns 1.
    async fn increment(&self, counter_key: &str) -> StoreResult<u64>;

    /// Empties the whole store, counters included.
    async fn flush_all(&self) -> StoreResult<()>;
}
