//! Advisory lock on top of a [`KeyValueStore`].
//!
//! A holder is whoever managed to create the `<key>:lock` marker. The marker
//! carries a lease so a crashed holder cannot wedge the key forever. There is
//! no owner token: `release` deletes the marker no matter who created it, so a
//! holder whose lease already ran out can free a lock that someone else now holds.
//!
//! [`KvLock::acquire_guard`] hands out a [`LockGuard`] that still frees the key
//! when the holding future is dropped or unwinds before it releases.

use std::time::Duration;

use anyhow::Result;

use super::kv::KeyValueStore;

pub const DEFAULT_LEASE: Duration = Duration::from_secs(30);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

const LOCK_MARKER: &str = "1";

#[derive(Clone)]
pub struct KvLock<S> {
    store: S,
    lease: Duration,
    poll_interval: Duration,
}

impl<S: KeyValueStore> KvLock<S> {
    pub fn new(store: S) -> Self {
        Self { store, lease: DEFAULT_LEASE, poll_interval: DEFAULT_POLL_INTERVAL }
    }

    pub fn with_lease(mut self, lease: Duration) -> Self {
        self.lease = lease;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn lease(&self) -> Duration { self.lease }

    fn marker_key(key: &str) -> String { format!("{key}:lock") }

    /// Single attempt; `Ok(false)` means someone else holds the key.
    pub async fn try_acquire(&self, key: &str) -> Result<bool> {
        self.store.set_nx_with_ttl(&Self::marker_key(key), LOCK_MARKER, self.lease).await
    }

    /// Polls [`try_acquire`](Self::try_acquire) until it succeeds. Waits forever
    /// if the key is never freed; wrap in `tokio::time::timeout` to bound it.
    pub async fn acquire(&self, key: &str) -> Result<()> {
        loop {
            if self.try_acquire(key).await? {
                tracing::trace!(key, "lock acquired");
                return Ok(());
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    pub async fn release(&self, key: &str) -> Result<()> {
        self.store.del(&Self::marker_key(key)).await?;
        tracing::trace!(key, "lock released");
        Ok(())
    }

    pub async fn is_locked(&self, key: &str) -> Result<bool> {
        let marker = self.store.get(&Self::marker_key(key)).await?;
        Ok(marker.as_deref() == Some(LOCK_MARKER))
    }
}

impl<S: KeyValueStore + Clone> KvLock<S> {
    /// Like [`acquire`](Self::acquire), but the key is freed by the returned guard.
    pub async fn acquire_guard(&self, key: &str) -> Result<LockGuard<S>> {
        self.acquire(key).await?;
        Ok(LockGuard { lock: self.clone(), key: Some(key.to_string()) })
    }
}

/// Held lock. Call [`release`](Self::release) on the normal path; a guard dropped
/// without it schedules the release on the current tokio runtime.
#[must_use = "dropping the guard releases the lock"]
pub struct LockGuard<S: KeyValueStore + Clone> {
    lock: KvLock<S>,
    key: Option<String>,
}

impl<S: KeyValueStore + Clone> LockGuard<S> {
    pub async fn release(mut self) -> Result<()> {
        let Some(key) = self.key.clone() else { return Ok(()) };
        let released = self.lock.release(&key).await;
        self.key = None;
        released
    }
}

impl<S: KeyValueStore + Clone> Drop for LockGuard<S> {
    fn drop(&mut self) {
        let Some(key) = self.key.take() else { return };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(%key, "lock dropped outside a runtime, left to lapse with its lease");
            return;
        };
        let lock = self.lock.clone();
        handle.spawn(async move {
            if let Err(err) = lock.release(&key).await {
                tracing::warn!(%key, error = %err, "failed to release dropped lock");
            }
        });
    }
}
