// # Discovery Traits
//
// Defines the interfaces for broadcast-address enumeration and for the
// per-domain discovery probe.
//
// ## Broadcast domains
//
// A host attached to several interfaces (LAN plus a VPN tunnel, say) sits
// in several broadcast domains at once, and the set changes as interfaces
// attach and detach. `BroadcastSource` is therefore re-read on every
// discovery round, never cached: staleness here silently causes false
// negatives.
//
// ## Probes
//
// `DeviceProbe` performs one best-effort sweep of one broadcast domain.
// The probe owns its timeout and must never block indefinitely; the
// locator imposes no additional deadline.

use async_trait::async_trait;
use std::collections::HashMap;
use std::net::Ipv4Addr;

/// What kind of device a discovery reply describes
///
/// Checked by value when filtering discovery results; anything that is
/// not a controllable plug is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// A controllable smart plug
    Plug,
    /// Any other device answering the discovery protocol
    Other,
}

/// One device's answer to a discovery probe
///
/// Several `DeviceInfo` values for the same address may arrive from
/// different concurrent probes when broadcast domains overlap; duplicates
/// are reconciled by address, last-writer-wins, since the fields are
/// stable per device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Network address the device answered from
    pub address: String,
    /// Human-assigned name the device reports
    pub alias: String,
    /// Device kind reported by the discovery reply
    pub kind: DeviceKind,
}

/// Trait for enumerating the host's current IPv4 broadcast addresses
///
/// Implementations read live interface state; callers must not cache the
/// result across discovery rounds.
pub trait BroadcastSource: Send + Sync {
    /// The broadcast address of every broadcast-capable local interface
    fn broadcast_addresses(&self) -> Result<Vec<Ipv4Addr>, crate::Error>;
}

/// Trait for the per-domain discovery primitive
#[async_trait]
pub trait DeviceProbe: Send + Sync {
    /// Sweep one broadcast domain, keyed by responding address
    ///
    /// Best-effort: an empty map is a normal outcome for a quiet domain,
    /// not an error. Bounded by the implementation's own timeout.
    async fn probe(&self, broadcast: Ipv4Addr)
    -> Result<HashMap<String, DeviceInfo>, crate::Error>;
}
