use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};

use super::KeyValueStore;

/// Redis-backed store. Cloning shares the underlying multiplexed connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Opens a managed connection and pings the server so a bad address fails at startup.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).context("invalid redis url")?;
        let mut conn = ConnectionManager::new(client)
            .await
            .context("failed to connect to redis")?;
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("redis ping failed")?;
        tracing::debug!(%pong, "redis connected");
        Ok(Self { conn })
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn incr(&self, key: &str) -> Result<i64> {
        let mut conn = self.conn.clone();
        let value: i64 = conn.incr(key, 1).await.with_context(|| format!("INCR {key}"))?;
        Ok(value)
    }

    async fn hset(&self, hash: &str, field: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: i64 = conn
            .hset(hash, field, value)
            .await
            .with_context(|| format!("HSET {hash} {field}"))?;
        Ok(())
    }

    async fn hget(&self, hash: &str, field: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> =
            conn.hget(hash, field).await.with_context(|| format!("HGET {hash} {field}"))?;
        Ok(value)
    }

    async fn hgetall(&self, hash: &str) -> Result<Vec<(String, String)>> {
        let mut conn = self.conn.clone();
        let entries: HashMap<String, String> =
            conn.hgetall(hash).await.with_context(|| format!("HGETALL {hash}"))?;
        Ok(entries.into_iter().collect())
    }

    async fn hdel(&self, hash: &str, field: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 =
            conn.hdel(hash, field).await.with_context(|| format!("HDEL {hash} {field}"))?;
        Ok(removed > 0)
    }

    async fn set_nx_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.conn.clone();
        let millis = u64::try_from(ttl.as_millis()).context("ttl out of range")?.max(1);
        // SET .. NX replies OK when set and nil otherwise.
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("PX")
            .arg(millis)
            .query_async(&mut conn)
            .await
            .with_context(|| format!("SET {key} NX"))?;
        Ok(reply.is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await.with_context(|| format!("GET {key}"))?;
        Ok(value)
    }

    async fn del(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(key).await.with_context(|| format!("DEL {key}"))?;
        Ok(removed > 0)
    }
}
