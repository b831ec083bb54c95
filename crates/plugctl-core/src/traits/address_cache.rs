// # Address Cache Trait
//
// Defines the interface for the durable alias → address mapping.
//
// ## Purpose
//
// The cache exists purely as a latency optimization: a confirmed entry
// avoids a broadcast round trip on every invocation. It is never treated
// as authoritative without a liveness re-check.
//
// ## Ownership
//
// The `DeviceLocator` is the sole writer and evictor. The cache never
// evicts on its own: there is no TTL, and staleness is discovered only by
// a failed liveness check.
//
// ## Implementations
//
// - `MemoryAddressCache`: in-process, for tests and ephemeral use
// - `FileAddressCache`: JSON file with atomic writes and backup recovery

use async_trait::async_trait;

/// Stored state for one alias
///
/// At most one record exists per alias at any time; records are
/// overwritten, never appended.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CacheRecord {
    /// Last-known network address (IP or host:port form)
    pub address: String,
    /// When the record was last written. Informational only; entries
    /// never expire by elapsed time.
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl CacheRecord {
    pub(crate) fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            updated_at: chrono::Utc::now(),
        }
    }
}

/// Trait for address cache implementations
///
/// All methods must be safe to call concurrently from multiple tasks.
/// Storage faults propagate unchanged as [`Error::Storage`]; this
/// component does not mask them.
///
/// [`Error::Storage`]: crate::Error::Storage
#[async_trait]
pub trait AddressCache: Send + Sync {
    /// Get the last stored address for an alias
    ///
    /// Returns `Ok(None)` if the alias was never discovered or was
    /// previously evicted.
    async fn get(&self, alias: &str) -> Result<Option<String>, crate::Error>;

    /// Store an address for an alias, overwriting any previous entry
    async fn put(&self, alias: &str, address: &str) -> Result<(), crate::Error>;

    /// Remove the entry for an alias; no-op if absent
    async fn delete(&self, alias: &str) -> Result<(), crate::Error>;
}
