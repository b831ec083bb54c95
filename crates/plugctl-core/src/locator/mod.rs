//! Device locator engine
//!
//! The DeviceLocator is responsible for:
//! - Consulting the AddressCache for a last-known address
//! - Verifying a cached address with a live connect
//! - Evicting stale entries so a failure is never retried as-is
//! - Concurrent discovery across all local broadcast domains on a miss
//! - Writing successful resolutions back to the cache
//!
//! ## Resolution Flow
//!
//! ```text
//! resolve(alias)
//!     │
//!     ▼
//! ┌──────────────┐  hit + live  ┌────────────┐
//! │ AddressCache │─────────────▶│ PlugHandle │
//! └──────────────┘              └────────────┘
//!     │ miss / evicted                ▲
//!     ▼                               │ match
//! ┌──────────────────────────────┐    │
//! │ discovery round (concurrent  │────┘
//! │ probe per broadcast domain)  │──▶ no match: retry up to
//! └──────────────────────────────┘    max_attempts, then NotFound
//! ```
//!
//! The cache is purely a latency optimization and is never trusted
//! without a liveness re-check, which keeps the protocol self-healing
//! under address churn without push-based invalidation.

use std::collections::HashMap;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::config::LocatorConfig;
use crate::error::{Error, Result};
use crate::traits::{
    AddressCache, BroadcastSource, DeviceConnector, DeviceInfo, DeviceKind, DeviceProbe,
    PlugHandle,
};

/// Outcome of a single discovery round
///
/// Explicit by-value result: alias-not-found is ordinary control flow for
/// the attempt loop, not an error.
#[derive(Debug)]
enum RoundOutcome {
    /// A device matching the alias and expected kind answered
    Found(DeviceInfo),
    /// The sweep completed without a match
    NoMatch,
}

/// Alias → device resolver
///
/// Collaborators are passed in explicitly; the locator holds no global
/// state and is the sole writer and evictor of cache entries.
pub struct DeviceLocator {
    cache: Box<dyn AddressCache>,
    connector: Box<dyn DeviceConnector>,
    probe: Box<dyn DeviceProbe>,
    broadcasts: Box<dyn BroadcastSource>,
    max_attempts: usize,
}

impl DeviceLocator {
    /// Create a new locator
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Config`] if the configuration is invalid.
    pub fn new(
        cache: Box<dyn AddressCache>,
        connector: Box<dyn DeviceConnector>,
        probe: Box<dyn DeviceProbe>,
        broadcasts: Box<dyn BroadcastSource>,
        config: LocatorConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            cache,
            connector,
            probe,
            broadcasts,
            max_attempts: config.max_attempts,
        })
    }

    /// Resolve an alias to a reachable device
    ///
    /// Cache-first: a cached address that passes the liveness check is
    /// returned without any discovery traffic. On a miss or a stale entry
    /// the locator sweeps every current broadcast domain concurrently, up
    /// to the configured attempt budget.
    ///
    /// Each round uses wait-all-merge aggregation: the round completes
    /// only after every probe returns or times out, and their result maps
    /// merge keyed by address, last-write-wins. This tolerates
    /// overlapping and partially-responsive broadcast domains at the cost
    /// of waiting out the slowest probe. If more than one device on the
    /// network erroneously shares an alias, the first match in iteration
    /// order wins.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no matching live device answered within
    ///   the attempt budget
    /// - [`Error::Storage`] if the address cache fails terminally
    pub async fn resolve(&self, alias: &str) -> Result<Box<dyn PlugHandle>> {
        if let Some(handle) = self.try_cached(alias).await? {
            return Ok(handle);
        }

        for attempt in 1..=self.max_attempts {
            debug!(alias, attempt, "starting discovery round");

            match self.discovery_round(alias).await? {
                RoundOutcome::Found(device) => {
                    info!(alias, address = %device.address, "discovered device");
                    self.cache.put(alias, &device.address).await?;

                    match self.connector.connect(&device.address).await {
                        Ok(handle) => return Ok(handle),
                        Err(e) if e.is_transient() => {
                            // The device answered discovery but refused a
                            // connect; count the round as failed. The next
                            // call's liveness check evicts the entry if
                            // the address is truly dead.
                            warn!(
                                alias,
                                address = %device.address,
                                error = %e,
                                "connect after discovery failed"
                            );
                        }
                        Err(e) => return Err(e),
                    }
                }
                RoundOutcome::NoMatch => {
                    debug!(alias, attempt, "discovery round found no match");
                }
            }
        }

        Err(Error::not_found(alias))
    }

    /// Try the cached address for an alias
    ///
    /// Returns `Ok(None)` when the cache has no entry or the entry failed
    /// the liveness check; a failed entry is evicted before returning so
    /// the same stale address is never retried.
    async fn try_cached(&self, alias: &str) -> Result<Option<Box<dyn PlugHandle>>> {
        let Some(address) = self.cache.get(alias).await? else {
            return Ok(None);
        };

        debug!(alias, address, "verifying cached address");

        match self.connector.connect(&address).await {
            Ok(handle) => {
                if handle.alias() == alias && handle.kind() == DeviceKind::Plug {
                    debug!(alias, address, "cache hit confirmed live");
                    return Ok(Some(handle));
                }
                // A different device answers at the cached address now
                debug!(
                    alias,
                    address,
                    reported = handle.alias(),
                    "cached address reports a different device, evicting"
                );
                self.cache.delete(alias).await?;
                Ok(None)
            }
            Err(e) if e.is_transient() => {
                debug!(alias, address, error = %e, "cached address unreachable, evicting");
                self.cache.delete(alias).await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// One concurrent sweep of every current broadcast domain
    ///
    /// The broadcast-address set is re-read on every round: interfaces
    /// attach and detach (VPN connect/disconnect) between calls, and a
    /// stale set silently causes false negatives.
    async fn discovery_round(&self, alias: &str) -> Result<RoundOutcome> {
        let broadcasts = self.broadcasts.broadcast_addresses()?;
        if broadcasts.is_empty() {
            warn!("no broadcast-capable interfaces found");
            return Ok(RoundOutcome::NoMatch);
        }

        debug!(domains = broadcasts.len(), "probing broadcast domains");

        let sweeps = broadcasts.iter().map(|&broadcast| self.probe.probe(broadcast));
        let results = join_all(sweeps).await;

        let mut merged: HashMap<String, DeviceInfo> = HashMap::new();
        for (broadcast, result) in broadcasts.iter().zip(results) {
            match result {
                Ok(devices) => {
                    debug!(%broadcast, count = devices.len(), "probe completed");
                    merged.extend(devices);
                }
                Err(e) => {
                    // A quiet or failing domain contributes nothing; it
                    // does not fail the round.
                    warn!(%broadcast, error = %e, "probe failed");
                }
            }
        }

        let matched = merged
            .into_values()
            .find(|device| device.alias == alias && device.kind == DeviceKind::Plug);

        Ok(match matched {
            Some(device) => RoundOutcome::Found(device),
            None => RoundOutcome::NoMatch,
        })
    }
}
