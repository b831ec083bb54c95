// # plugctl-core
//
// Core library for the alias-to-device smart-plug locator.
//
// ## Architecture Overview
//
// This library resolves a stable human-assigned alias into a currently
// reachable device:
// - **AddressCache**: durable alias → last-known-address mapping
// - **BroadcastSource**: enumeration of local IPv4 broadcast domains
// - **DeviceProbe**: one best-effort discovery sweep of one domain
// - **DeviceConnector / PlugHandle**: liveness check and device control
// - **DeviceLocator**: engine orchestrating cache check → liveness →
//   concurrent discovery fan-out → cache write-back
//
// ## Design Principles
//
// 1. **Cache as optimization only**: a cached address is never trusted
//    without a live re-check; staleness is discovered, not timed out
// 2. **Explicit construction**: collaborators are passed into the
//    locator, no class-level shared state
// 3. **Bounded work**: the attempt budget bounds all retries; each probe
//    owns its timeout
// 4. **Transient vs. terminal**: network failures recover locally,
//    storage failures surface unchanged

pub mod cache;
pub mod config;
pub mod error;
pub mod locator;
pub mod traits;

// Re-export core types for convenience
pub use cache::{FileAddressCache, MemoryAddressCache};
pub use config::{CacheConfig, LocatorConfig};
pub use error::{Error, Result};
pub use locator::DeviceLocator;
pub use traits::{
    AddressCache, BroadcastSource, DeviceConnector, DeviceInfo, DeviceKind, DeviceProbe,
    PlugHandle,
};
