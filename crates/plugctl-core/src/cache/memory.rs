// # Memory Address Cache
//
// In-memory implementation of AddressCache.
//
// ## Purpose
//
// A simple, fast cache that doesn't persist across restarts. Useful for
// tests and for one-shot invocations where rediscovery cost is acceptable.
//
// ## Crash Behavior
//
// All entries are lost on restart; the first resolve after a restart
// always pays a full discovery round.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use async_trait::async_trait;

use crate::Error;
use crate::traits::address_cache::{AddressCache, CacheRecord};

/// In-memory address cache implementation
///
/// Entries live in a HashMap behind a RwLock; no persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryAddressCache {
    inner: Arc<RwLock<HashMap<String, CacheRecord>>>,
}

impl MemoryAddressCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of cached aliases
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl AddressCache for MemoryAddressCache {
    async fn get(&self, alias: &str) -> Result<Option<String>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(alias).map(|record| record.address.clone()))
    }

    async fn put(&self, alias: &str, address: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.insert(alias.to_string(), CacheRecord::new(address));
        Ok(())
    }

    async fn delete(&self, alias: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.remove(alias);
        Ok(())
    }
}
