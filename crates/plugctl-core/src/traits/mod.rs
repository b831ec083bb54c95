//! Collaborator traits for the plug locator
//!
//! Each trait is one external boundary of the locator:
//! - [`AddressCache`]: durable alias → address storage
//! - [`BroadcastSource`]: enumeration of local broadcast addresses
//! - [`DeviceProbe`]: one best-effort sweep of one broadcast domain
//! - [`DeviceConnector`] / [`PlugHandle`]: liveness check and device control

pub mod address_cache;
pub mod device;
pub mod discovery;

pub use address_cache::{AddressCache, CacheRecord};
pub use device::{DeviceConnector, PlugHandle};
pub use discovery::{BroadcastSource, DeviceInfo, DeviceKind, DeviceProbe};
