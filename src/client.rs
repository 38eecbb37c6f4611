/// The raw key-value store contract the adaptor drives.
///
/// Implementations own transport concerns (pooling, retries, timeouts); the
/// adaptor only hands over the flat key, the serialized payload and the
/// lifetime in seconds. Any `Err` returned here is a store error and goes
/// through the adaptor's error handler.
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait StoreClient: Send + Sync {
    /// write `value` under `key`, expiring after `lifetime` seconds
    async fn set(&self, key: &str, value: String, lifetime: u32) -> Result<()>;

    /// read the payload under `key`; `None` (or an empty payload) is a miss
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn del(&self, key: &str) -> Result<()>;
}
