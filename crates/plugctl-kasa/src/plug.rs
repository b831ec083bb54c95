//! Plug control over the TCP transport
//!
//! `KasaConnector` builds a handle by querying sysinfo at a known address,
//! which is exactly the liveness check the locator needs: a handle only
//! exists for a device that answered just now.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use plugctl_core::{DeviceConnector, DeviceKind, Error, PlugHandle, Result};

use crate::cipher;
use crate::wire::{self, SysInfo};
use crate::KASA_PORT;

/// Default per-request deadline for control traffic
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Replies larger than this are not Kasa traffic
const MAX_REPLY_BYTES: u32 = 1 << 20;

/// A reachable Kasa plug at a known address
#[derive(Debug)]
pub struct KasaPlug {
    address: String,
    alias: String,
    kind: DeviceKind,
    relay_on: bool,
    request_timeout: Duration,
}

impl KasaPlug {
    /// Send one framed request and return the decrypted reply
    async fn request(&self, body: &str) -> Result<Vec<u8>> {
        let target = socket_target(&self.address);
        debug!(target = %target, "sending device request");

        let reply = timeout(self.request_timeout, async {
            let mut stream = TcpStream::connect(&target)
                .await
                .map_err(|e| Error::network(format!("connect to {} failed: {}", target, e)))?;

            stream
                .write_all(&cipher::encode_frame(body))
                .await
                .map_err(|e| Error::network(format!("write to {} failed: {}", target, e)))?;

            let len = stream
                .read_u32()
                .await
                .map_err(|e| Error::network(format!("read from {} failed: {}", target, e)))?;
            if len > MAX_REPLY_BYTES {
                return Err(Error::protocol(format!(
                    "reply length {} from {} exceeds limit",
                    len, target
                )));
            }

            let mut body = vec![0u8; len as usize];
            stream
                .read_exact(&mut body)
                .await
                .map_err(|e| Error::network(format!("read from {} failed: {}", target, e)))?;

            Ok(cipher::decrypt(&body))
        })
        .await
        .map_err(|_| Error::network(format!("request to {} timed out", target)))??;

        Ok(reply)
    }

    /// Re-query sysinfo and fold it into the handle state
    async fn update_from_sysinfo(&mut self) -> Result<()> {
        let reply = self.request(wire::SYSINFO_QUERY).await?;
        let info = SysInfo::parse(&reply)?;
        self.alias = info.alias.clone();
        self.kind = info.kind();
        self.relay_on = info.is_on();
        Ok(())
    }

    async fn set_relay(&mut self, on: bool) -> Result<()> {
        let reply = self.request(&wire::set_relay_command(on)).await?;
        wire::check_command_reply(&reply, "set_relay_state")?;
        self.relay_on = on;
        Ok(())
    }
}

#[async_trait]
impl PlugHandle for KasaPlug {
    fn alias(&self) -> &str {
        &self.alias
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn kind(&self) -> DeviceKind {
        self.kind
    }

    async fn refresh(&mut self) -> Result<()> {
        self.update_from_sysinfo().await
    }

    async fn is_on(&mut self) -> Result<bool> {
        self.update_from_sysinfo().await?;
        Ok(self.relay_on)
    }

    async fn turn_on(&mut self) -> Result<()> {
        self.set_relay(true).await
    }

    async fn turn_off(&mut self) -> Result<()> {
        self.set_relay(false).await
    }
}

/// Connector constructing live [`KasaPlug`] handles
#[derive(Debug, Clone)]
pub struct KasaConnector {
    request_timeout: Duration,
}

impl KasaConnector {
    pub fn new() -> Self {
        Self {
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(request_timeout: Duration) -> Self {
        Self { request_timeout }
    }
}

impl Default for KasaConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceConnector for KasaConnector {
    async fn connect(&self, address: &str) -> Result<Box<dyn PlugHandle>> {
        let mut plug = KasaPlug {
            address: address.to_string(),
            alias: String::new(),
            kind: DeviceKind::Other,
            relay_on: false,
            request_timeout: self.request_timeout,
        };
        plug.update_from_sysinfo().await?;
        debug!(address, alias = plug.alias.as_str(), "device answered sysinfo");
        Ok(Box::new(plug))
    }
}

/// Target for a TCP connect: a bare IP/host gets the Kasa port appended
fn socket_target(address: &str) -> String {
    if address.contains(':') {
        address.to_string()
    } else {
        format!("{}:{}", address, KASA_PORT)
    }
}
