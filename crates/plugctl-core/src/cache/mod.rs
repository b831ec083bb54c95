//! Address cache implementations

pub mod file;
pub mod memory;

pub use file::FileAddressCache;
pub use memory::MemoryAddressCache;

use crate::config::CacheConfig;
use crate::error::Result;
use crate::traits::AddressCache;

/// Build a cache from configuration
pub async fn from_config(config: &CacheConfig) -> Result<Box<dyn AddressCache>> {
    match config {
        CacheConfig::Memory => Ok(Box::new(MemoryAddressCache::new())),
        CacheConfig::File { path } => Ok(Box::new(FileAddressCache::new(path).await?)),
    }
}
