// # plugctl-ifaces
//
// Enumeration of the host's current IPv4 broadcast addresses.
//
// ## Purpose
//
// Discovery must reach every broadcast domain the host sits in. The
// limited broadcast 255.255.255.255 is an alias for "this network",
// which resolves to the VPN's virtual interface while a tunnel is up, so
// probing it alone misses every device on the physical LAN. Instead,
// each interface's own directed broadcast address is probed.
//
// ## Freshness
//
// The interface set changes as VPNs connect and adapters come and go.
// Callers re-read this source on every discovery round; nothing here is
// cached.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;

use pnet::datalink;
use pnet::ipnetwork::IpNetwork;
use tracing::debug;

use plugctl_core::{BroadcastSource, Result};

/// Broadcast-address source backed by the live interface table
#[derive(Debug, Clone, Copy, Default)]
pub struct PnetBroadcastSource;

impl PnetBroadcastSource {
    pub fn new() -> Self {
        Self
    }
}

impl BroadcastSource for PnetBroadcastSource {
    fn broadcast_addresses(&self) -> Result<Vec<Ipv4Addr>> {
        let networks = datalink::interfaces()
            .into_iter()
            .filter(|iface| iface.is_up() && iface.is_broadcast() && !iface.is_loopback())
            .flat_map(|iface| iface.ips);

        let addresses: Vec<Ipv4Addr> = collect_broadcasts(networks).into_iter().collect();
        debug!(count = addresses.len(), "enumerated broadcast addresses");
        Ok(addresses)
    }
}

/// The distinct directed-broadcast addresses of a set of networks
///
/// IPv6 has no broadcast; /31 and /32 networks have no usable broadcast
/// address. Overlapping interfaces deduplicate through the set.
fn collect_broadcasts(networks: impl IntoIterator<Item = IpNetwork>) -> BTreeSet<Ipv4Addr> {
    networks
        .into_iter()
        .filter_map(|network| match network {
            IpNetwork::V4(v4) if v4.prefix() <= 30 => Some(v4.broadcast()),
            _ => None,
        })
        .collect()
}
