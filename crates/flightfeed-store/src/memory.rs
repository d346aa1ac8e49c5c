//! In-process TTL store backend.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::StoreError;
use crate::store::{FlightStore, StoreFuture};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct MemoryInner {
    open: bool,
    map: HashMap<String, Entry>,
}

/// Thread-safe in-memory TTL store.
///
/// Entries expire lazily: `get` and `scan` filter out dead entries, and
/// [`MemoryStore::purge_expired`] reclaims the slots. Closing the store keeps
/// its contents — the lifecycle gates access, not data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<tokio::sync::RwLock<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held, including expired entries that have
    /// not been purged yet.
    pub async fn len(&self) -> usize {
        self.inner.read().await.map.len()
    }

    /// Drop entries whose TTL has elapsed.
    pub async fn purge_expired(&self) {
        let now = Instant::now();
        let mut inner = self.inner.write().await;
        inner.map.retain(|_, entry| entry.expires_at > now);
    }
}

impl FlightStore for MemoryStore {
    fn open(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.inner.write().await.open = true;
            Ok(())
        })
    }

    fn close(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.inner.write().await.open = false;
            Ok(())
        })
    }

    fn put<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            if !inner.open {
                return Err(StoreError::NotOpen);
            }
            inner.map.insert(
                key.to_owned(),
                Entry {
                    value: value.to_owned(),
                    expires_at: Instant::now() + ttl,
                },
            );
            Ok(())
        })
    }

    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            if !inner.open {
                return Err(StoreError::NotOpen);
            }
            let now = Instant::now();
            Ok(inner
                .map
                .get(key)
                .filter(|entry| entry.expires_at > now)
                .map(|entry| entry.value.clone()))
        })
    }

    fn scan<'a>(&'a self, prefix: &'a str) -> StoreFuture<'a, Vec<String>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            if !inner.open {
                return Err(StoreError::NotOpen);
            }
            let now = Instant::now();
            Ok(inner
                .map
                .iter()
                .filter(|(key, entry)| key.starts_with(prefix) && entry.expires_at > now)
                .map(|(key, _)| key.clone())
                .collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn operations_require_open() {
        let store = MemoryStore::new();

        let error = store
            .put("k", "v", Duration::from_secs(1))
            .await
            .expect_err("put before open should fail");
        assert!(matches!(error, StoreError::NotOpen));

        store.open().await.expect("open");
        store
            .put("k", "v", Duration::from_secs(1))
            .await
            .expect("put after open");

        store.close().await.expect("close");
        let error = store.get("k").await.expect_err("get after close should fail");
        assert!(matches!(error, StoreError::NotOpen));
    }

    #[tokio::test]
    async fn put_overwrites_value_and_expiry() {
        let store = MemoryStore::new();
        store.open().await.expect("open");

        store
            .put("k", "old", Duration::from_millis(50))
            .await
            .expect("first put");
        store
            .put("k", "new", Duration::from_secs(60))
            .await
            .expect("second put");

        tokio::time::sleep(Duration::from_millis(80)).await;

        // The second put refreshed the expiry, so the entry is still live.
        assert_eq!(store.get("k").await.expect("get"), Some("new".to_owned()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn expired_entries_are_invisible() {
        let store = MemoryStore::new();
        store.open().await.expect("open");

        store
            .put("k", "v", Duration::from_millis(40))
            .await
            .expect("put");
        assert!(store.get("k").await.expect("get").is_some());

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert!(store.get("k").await.expect("get").is_none());
        assert!(store.scan("k").await.expect("scan").is_empty());

        store.purge_expired().await;
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn scan_filters_by_prefix() {
        let store = MemoryStore::new();
        store.open().await.expect("open");

        store
            .put("flights:a", "1", Duration::from_secs(60))
            .await
            .expect("put");
        store
            .put("flights:b", "2", Duration::from_secs(60))
            .await
            .expect("put");
        store
            .put("other:c", "3", Duration::from_secs(60))
            .await
            .expect("put");

        let mut keys = store.scan("flights:").await.expect("scan");
        keys.sort();
        assert_eq!(keys, vec!["flights:a".to_owned(), "flights:b".to_owned()]);
    }
}
