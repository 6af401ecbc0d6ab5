//! Minimal key/value command set shared by the store-backed repository and the advisory lock.
//!
//! The commands mirror their Redis namesakes so [`RedisStore`] is a thin pass-through,
//! while [`MemoryStore`] keeps the same semantics in-process.

mod memory_store;
mod redis_store;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;

#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Atomically increments the integer at `key` (missing counts as 0) and returns the new value.
    async fn incr(&self, key: &str) -> Result<i64>;
    async fn hset(&self, hash: &str, field: &str, value: &str) -> Result<()>;
    async fn hget(&self, hash: &str, field: &str) -> Result<Option<String>>;
    /// Every field of `hash`, in no particular order.
    async fn hgetall(&self, hash: &str) -> Result<Vec<(String, String)>>;
    /// Returns whether the field existed.
    async fn hdel(&self, hash: &str, field: &str) -> Result<bool>;
    /// Sets `key` only if absent, expiring after `ttl`. Returns whether it was set.
    async fn set_nx_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<bool>;
    async fn get(&self, key: &str) -> Result<Option<String>>;
    /// Returns whether the key existed.
    async fn del(&self, key: &str) -> Result<bool>;
}
