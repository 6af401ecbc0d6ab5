use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use super::KeyValueStore;

/// In-process store with Redis semantics for the commands in [`KeyValueStore`].
///
/// Expiry is measured on the tokio clock, so tests running with paused time can
/// advance past a TTL without sleeping.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    strings: HashMap<String, Entry>,
    hashes: HashMap<String, HashMap<String, String>>,
}

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool { self.expires_at.is_none_or(|at| now < at) }
}

impl State {
    fn live_string(&mut self, key: &str) -> Option<&mut Entry> {
        let now = Instant::now();
        if self.strings.get(key).is_some_and(|entry| !entry.is_live(now)) {
            self.strings.remove(key);
        }
        self.strings.get_mut(key)
    }
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn incr(&self, key: &str) -> Result<i64> {
        let mut state = self.state.lock();
        let (current, expires_at) = match state.live_string(key) {
            Some(entry) => {
                let current: i64 = entry
                    .value
                    .parse()
                    .map_err(|_| anyhow!("value at {key} is not an integer"))?;
                (current, entry.expires_at)
            }
            None => (0, None),
        };
        let next = current.checked_add(1).ok_or_else(|| anyhow!("increment at {key} overflows"))?;
        state.strings.insert(key.to_string(), Entry { value: next.to_string(), expires_at });
        Ok(next)
    }

    async fn hset(&self, hash: &str, field: &str, value: &str) -> Result<()> {
        self.state
            .lock()
            .hashes
            .entry(hash.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn hget(&self, hash: &str, field: &str) -> Result<Option<String>> {
        Ok(self.state.lock().hashes.get(hash).and_then(|fields| fields.get(field).cloned()))
    }

    async fn hgetall(&self, hash: &str) -> Result<Vec<(String, String)>> {
        let state = self.state.lock();
        Ok(state
            .hashes
            .get(hash)
            .map(|fields| fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }

    async fn hdel(&self, hash: &str, field: &str) -> Result<bool> {
        let mut state = self.state.lock();
        let Some(fields) = state.hashes.get_mut(hash) else { return Ok(false) };
        let removed = fields.remove(field).is_some();
        if fields.is_empty() {
            state.hashes.remove(hash);
        }
        Ok(removed)
    }

    async fn set_nx_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut state = self.state.lock();
        if state.live_string(key).is_some() {
            return Ok(false);
        }
        let expires_at = Some(Instant::now() + ttl);
        state.strings.insert(key.to_string(), Entry { value: value.to_string(), expires_at });
        Ok(true)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.state.lock().live_string(key).map(|entry| entry.value.clone()))
    }

    async fn del(&self, key: &str) -> Result<bool> {
        let mut state = self.state.lock();
        let existed = state.live_string(key).is_some();
        state.strings.remove(key);
        let hashed = state.hashes.remove(key).is_some();
        Ok(existed || hashed)
    }
}
