// # plugctl-kasa
//
// Kasa (TP-Link) smart-plug protocol implementation.
//
// ## Purpose
//
// Provides the two device-facing capabilities the locator consumes as
// opaque traits:
// - `KasaConnector` / `KasaPlug`: control of one plug at a known address
//   over TCP port 9999 (liveness check, relay state, switch on/off)
// - `KasaProbe`: discovery of devices in one broadcast domain via a UDP
//   broadcast datagram and bounded reply collection
//
// ## Wire Protocol
//
// Kasa devices speak JSON obfuscated with an XOR autokey cipher (initial
// key 171). TCP messages carry a 4-byte big-endian length prefix; UDP
// discovery datagrams are unframed. The discovery query and the liveness
// query are the same `get_sysinfo` request.

pub mod cipher;
pub mod plug;
pub mod probe;
pub mod wire;

pub use plug::{KasaConnector, KasaPlug};
pub use probe::KasaProbe;

/// TCP and UDP port Kasa devices listen on
pub const KASA_PORT: u16 = 9999;
