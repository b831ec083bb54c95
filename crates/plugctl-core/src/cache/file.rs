// # File Address Cache
//
// File-based implementation of AddressCache with crash recovery.
//
// ## Purpose
//
// Persists the alias → address mapping across process restarts, so the
// common case stays a single liveness check instead of a broadcast sweep.
//
// ## Crash Recovery
//
// - Atomic writes: write-then-rename
// - Corruption detection: JSON validated on load
// - Automatic backup: `.backup` of the last known good state
// - Recovery: falls back to the backup if the main file is corrupted
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "records": {
//     "plug": {
//       "address": "192.168.1.40",
//       "updated_at": "2026-01-09T12:00:00Z"
//     }
//   }
// }
// ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::address_cache::{AddressCache, CacheRecord};

/// Cache file format version, for future migration if the format changes
const CACHE_FILE_VERSION: &str = "1.0";

/// File-based address cache with crash recovery
///
/// State is written through on every mutation: a one-shot CLI process may
/// exit immediately after a resolve, so there is no deferred-flush window.
#[derive(Debug)]
pub struct FileAddressCache {
    path: PathBuf,
    records: Arc<RwLock<HashMap<String, CacheRecord>>>,
}

/// Serializable cache file format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct CacheFileFormat {
    version: String,
    records: HashMap<String, CacheRecord>,
}

impl FileAddressCache {
    /// Create or load a file cache
    ///
    /// This will:
    /// 1. Try to load the existing cache file
    /// 2. If corruption is detected, try the backup
    /// 3. If both fail, start empty (a lost cache only costs rediscovery)
    /// 4. Create parent directories if needed
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    Error::storage(format!(
                        "failed to create cache directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let records = Self::load_with_recovery(&path).await?;

        Ok(Self {
            path,
            records: Arc::new(RwLock::new(records)),
        })
    }

    /// Load records from file with automatic recovery
    ///
    /// Recovery strategy:
    /// 1. Try the main cache file
    /// 2. On a parse error, try the backup
    /// 3. If the backup also fails, start with an empty cache
    async fn load_with_recovery(path: &Path) -> Result<HashMap<String, CacheRecord>, Error> {
        match Self::load(path).await {
            Ok(records) => {
                tracing::debug!("loaded address cache: {} record(s)", records.len());
                Ok(records)
            }
            Err(Error::Json(e)) => {
                tracing::warn!(
                    "address cache appears corrupted: {}. attempting backup recovery",
                    e
                );

                let backup_path = Self::backup_path(path);
                if backup_path.exists() {
                    match Self::load(&backup_path).await {
                        Ok(records) => {
                            tracing::info!(
                                "recovered address cache from backup: {} record(s)",
                                records.len()
                            );
                            Ok(records)
                        }
                        Err(backup_err) => {
                            tracing::error!(
                                "backup also unreadable: {}. starting with empty cache",
                                backup_err
                            );
                            Ok(HashMap::new())
                        }
                    }
                } else {
                    tracing::warn!("no backup file found. starting with empty cache");
                    Ok(HashMap::new())
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Load records from a file
    async fn load(path: &Path) -> Result<HashMap<String, CacheRecord>, Error> {
        if !path.exists() {
            tracing::debug!("cache file does not exist: {}", path.display());
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            Error::storage(format!(
                "failed to read cache file {}: {}",
                path.display(),
                e
            ))
        })?;

        let cache_file: CacheFileFormat = serde_json::from_str(&content)?;

        if cache_file.version != CACHE_FILE_VERSION {
            tracing::warn!(
                "cache file version mismatch: expected {}, got {}. loading anyway",
                CACHE_FILE_VERSION,
                cache_file.version
            );
        }

        Ok(cache_file.records)
    }

    /// Write records to the file atomically
    async fn write(&self) -> Result<(), Error> {
        let records = self.records.read().await.clone();

        let cache_file = CacheFileFormat {
            version: CACHE_FILE_VERSION.to_string(),
            records,
        };

        let json = serde_json::to_string_pretty(&cache_file)?;

        // Write to a temporary file first
        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::storage(format!(
                    "failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::storage(format!(
                    "failed to write temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::storage(format!(
                    "failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        // Keep a backup of the current file before replacing it
        if self.path.exists() {
            let backup_path = Self::backup_path(&self.path);
            if let Err(e) = fs::copy(&self.path, &backup_path).await {
                tracing::warn!("failed to create cache backup: {}", e);
            }
        }

        // Atomic rename (temp -> actual)
        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::storage(format!(
                "failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("address cache written to {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }
}

#[async_trait]
impl AddressCache for FileAddressCache {
    async fn get(&self, alias: &str) -> Result<Option<String>, Error> {
        let guard = self.records.read().await;
        Ok(guard.get(alias).map(|record| record.address.clone()))
    }

    async fn put(&self, alias: &str, address: &str) -> Result<(), Error> {
        {
            let mut guard = self.records.write().await;
            guard.insert(alias.to_string(), CacheRecord::new(address));
        }
        self.write().await
    }

    async fn delete(&self, alias: &str) -> Result<(), Error> {
        {
            let mut guard = self.records.write().await;
            if guard.remove(alias).is_none() {
                return Ok(());
            }
        }
        self.write().await
    }
}
