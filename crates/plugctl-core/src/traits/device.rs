// # Device Traits
//
// Defines the interface to a device at a known address: constructing a
// handle (which doubles as the liveness check) and driving the control
// surface.
//
// ## Liveness
//
// `DeviceConnector::connect` queries the device before returning, so a
// returned handle has already proven the device present. The locator
// additionally verifies the reported alias and kind before trusting a
// cached address.
//
// ## Ownership
//
// A handle is owned exclusively by the caller once `resolve` returns;
// the locator retains no reference to it.

use std::fmt::Debug;

use async_trait::async_trait;

use super::discovery::DeviceKind;

/// A resolved, reachable device
///
/// Control calls may fail with a transient [`Error::Network`], which the
/// locator treats as "unreachable".
///
/// [`Error::Network`]: crate::Error::Network
#[async_trait]
pub trait PlugHandle: Send + Debug {
    /// Alias the device reports for itself
    fn alias(&self) -> &str;

    /// Address the handle is connected to
    fn address(&self) -> &str;

    /// Kind of device the handle points at
    fn kind(&self) -> DeviceKind;

    /// Re-query the device, refreshing its reported state
    async fn refresh(&mut self) -> Result<(), crate::Error>;

    /// Whether the plug relay is currently on
    ///
    /// Queries the device; the answer reflects live state, not the last
    /// refresh.
    async fn is_on(&mut self) -> Result<bool, crate::Error>;

    /// Switch the plug relay on
    async fn turn_on(&mut self) -> Result<(), crate::Error>;

    /// Switch the plug relay off
    async fn turn_off(&mut self) -> Result<(), crate::Error>;
}

/// Trait for constructing device handles at a known address
#[async_trait]
pub trait DeviceConnector: Send + Sync {
    /// Connect to the device at `address` and query its identity
    ///
    /// Serves as the liveness check: failure (unreachable, timeout,
    /// malformed reply) is a transient error, and a success proves a
    /// device is present at the address right now.
    async fn connect(&self, address: &str) -> Result<Box<dyn PlugHandle>, crate::Error>;
}
