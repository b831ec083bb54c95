//! UDP broadcast discovery of one domain
//!
//! A probe sends the encrypted sysinfo query to `<broadcast>:9999` and
//! collects replies until its deadline elapses. Best-effort by design: a
//! quiet domain yields an empty map, and a malformed reply is skipped,
//! not fatal.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tokio::time::{Instant, timeout};
use tracing::debug;

use plugctl_core::{DeviceInfo, DeviceProbe, Error, Result};

use crate::cipher;
use crate::wire::{self, SysInfo};
use crate::KASA_PORT;

/// Default reply-collection window per domain
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Discovery probe for Kasa devices
#[derive(Debug, Clone)]
pub struct KasaProbe {
    port: u16,
    window: Duration,
}

impl KasaProbe {
    pub fn new() -> Self {
        Self {
            port: KASA_PORT,
            window: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(window: Duration) -> Self {
        Self {
            port: KASA_PORT,
            window,
        }
    }
}

impl Default for KasaProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceProbe for KasaProbe {
    async fn probe(&self, broadcast: Ipv4Addr) -> Result<HashMap<String, DeviceInfo>> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
            .await
            .map_err(|e| Error::network(format!("bind for discovery failed: {}", e)))?;
        socket
            .set_broadcast(true)
            .map_err(|e| Error::network(format!("enabling broadcast failed: {}", e)))?;

        let payload = cipher::encrypt(wire::SYSINFO_QUERY.as_bytes());
        socket
            .send_to(&payload, (broadcast, self.port))
            .await
            .map_err(|e| Error::network(format!("send to {} failed: {}", broadcast, e)))?;

        debug!(%broadcast, "discovery query sent, collecting replies");

        let deadline = Instant::now() + self.window;
        let mut found: HashMap<String, DeviceInfo> = HashMap::new();
        let mut buf = [0u8; 2048];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            let (len, peer) = match timeout(remaining, socket.recv_from(&mut buf)).await {
                Ok(Ok(received)) => received,
                // Window elapsed
                Err(_) => break,
                Ok(Err(e)) => {
                    debug!(%broadcast, error = %e, "receive failed, ending sweep");
                    break;
                }
            };

            let plain = cipher::decrypt(&buf[..len]);
            match SysInfo::parse(&plain) {
                Ok(info) => {
                    let address = peer.ip().to_string();
                    debug!(%broadcast, address, alias = info.alias.as_str(), "device replied");
                    // Re-replies from the same address overwrite: fields
                    // are stable per device.
                    found.insert(address.clone(), device_info_from(address, info));
                }
                Err(e) => {
                    debug!(%broadcast, peer = %peer, error = %e, "ignoring malformed reply");
                }
            }
        }

        debug!(%broadcast, count = found.len(), "sweep complete");
        Ok(found)
    }
}

/// Discovery result for one reply, tagged with the sender's address
fn device_info_from(address: String, info: SysInfo) -> DeviceInfo {
    let kind = info.kind();
    DeviceInfo {
        address,
        alias: info.alias,
        kind,
    }
}
