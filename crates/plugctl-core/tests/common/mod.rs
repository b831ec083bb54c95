//! Test doubles and common utilities for locator contract tests
//!
//! These doubles count calls so tests can verify not just outcomes but
//! how much work the locator performed (probes per round, evictions,
//! cache writes).

use async_trait::async_trait;
use plugctl_core::error::{Error, Result};
use plugctl_core::traits::{
    AddressCache, BroadcastSource, DeviceConnector, DeviceInfo, DeviceKind, DeviceProbe,
    PlugHandle,
};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An AddressCache that tracks calls
#[derive(Default)]
pub struct MockAddressCache {
    entries: Arc<Mutex<HashMap<String, String>>>,
    get_call_count: Arc<AtomicUsize>,
    put_call_count: Arc<AtomicUsize>,
    delete_call_count: Arc<AtomicUsize>,
    /// When set, every call fails with this storage error message
    fail_with: Option<String>,
}

impl MockAddressCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache whose every operation fails terminally
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::default()
        }
    }

    /// Pre-populate an entry
    pub fn seed(self, alias: &str, address: &str) -> Self {
        self.entries
            .lock()
            .unwrap()
            .insert(alias.to_string(), address.to_string());
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.get_call_count.load(Ordering::SeqCst)
    }

    pub fn put_call_count(&self) -> usize {
        self.put_call_count.load(Ordering::SeqCst)
    }

    pub fn delete_call_count(&self) -> usize {
        self.delete_call_count.load(Ordering::SeqCst)
    }

    /// Current entry for an alias, bypassing call counting
    pub fn entry(&self, alias: &str) -> Option<String> {
        self.entries.lock().unwrap().get(alias).cloned()
    }

    /// Create a MockAddressCache sharing state and counters with this one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            entries: Arc::clone(&other.entries),
            get_call_count: Arc::clone(&other.get_call_count),
            put_call_count: Arc::clone(&other.put_call_count),
            delete_call_count: Arc::clone(&other.delete_call_count),
            fail_with: other.fail_with.clone(),
        }
    }
}

#[async_trait]
impl AddressCache for MockAddressCache {
    async fn get(&self, alias: &str) -> Result<Option<String>> {
        self.get_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = &self.fail_with {
            return Err(Error::storage(msg));
        }
        Ok(self.entries.lock().unwrap().get(alias).cloned())
    }

    async fn put(&self, alias: &str, address: &str) -> Result<()> {
        self.put_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = &self.fail_with {
            return Err(Error::storage(msg));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(alias.to_string(), address.to_string());
        Ok(())
    }

    async fn delete(&self, alias: &str) -> Result<()> {
        self.delete_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = &self.fail_with {
            return Err(Error::storage(msg));
        }
        self.entries.lock().unwrap().remove(alias);
        Ok(())
    }
}

/// A BroadcastSource returning a fixed address set, counting reads
pub struct StaticBroadcastSource {
    addresses: Vec<Ipv4Addr>,
    call_count: Arc<AtomicUsize>,
}

impl StaticBroadcastSource {
    pub fn new(addresses: Vec<Ipv4Addr>) -> Self {
        Self {
            addresses,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            addresses: other.addresses.clone(),
            call_count: Arc::clone(&other.call_count),
        }
    }
}

impl BroadcastSource for StaticBroadcastSource {
    fn broadcast_addresses(&self) -> Result<Vec<Ipv4Addr>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.addresses.clone())
    }
}

/// A DeviceProbe scripted per broadcast domain, counting sweeps
#[derive(Default)]
pub struct ScriptedProbe {
    /// Devices each broadcast domain answers with
    by_domain: HashMap<Ipv4Addr, HashMap<String, DeviceInfo>>,
    /// Domains whose probe fails with a network error
    failing_domains: Vec<Ipv4Addr>,
    probe_call_count: Arc<AtomicUsize>,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script one domain to answer with the given devices
    pub fn domain_answers(mut self, broadcast: Ipv4Addr, devices: Vec<DeviceInfo>) -> Self {
        self.by_domain.insert(
            broadcast,
            devices
                .into_iter()
                .map(|d| (d.address.clone(), d))
                .collect(),
        );
        self
    }

    /// Script one domain to fail with a network error
    pub fn domain_fails(mut self, broadcast: Ipv4Addr) -> Self {
        self.failing_domains.push(broadcast);
        self
    }

    pub fn probe_call_count(&self) -> usize {
        self.probe_call_count.load(Ordering::SeqCst)
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            by_domain: other.by_domain.clone(),
            failing_domains: other.failing_domains.clone(),
            probe_call_count: Arc::clone(&other.probe_call_count),
        }
    }
}

#[async_trait]
impl DeviceProbe for ScriptedProbe {
    async fn probe(&self, broadcast: Ipv4Addr) -> Result<HashMap<String, DeviceInfo>> {
        self.probe_call_count.fetch_add(1, Ordering::SeqCst);
        if self.failing_domains.contains(&broadcast) {
            return Err(Error::network(format!("probe of {} failed", broadcast)));
        }
        Ok(self.by_domain.get(&broadcast).cloned().unwrap_or_default())
    }
}

/// How a scripted address answers a connect
#[derive(Clone)]
pub enum ConnectScript {
    /// A live device with this alias/kind/relay state
    Live {
        alias: String,
        kind: DeviceKind,
        is_on: bool,
    },
    /// Connect times out / is refused
    Unreachable,
}

/// A DeviceConnector scripted per address, counting connects
#[derive(Default)]
pub struct ScriptedConnector {
    by_address: HashMap<String, ConnectScript>,
    connect_call_count: Arc<AtomicUsize>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a live plug with the given alias at an address
    pub fn live_plug(self, address: &str, alias: &str) -> Self {
        self.script(
            address,
            ConnectScript::Live {
                alias: alias.to_string(),
                kind: DeviceKind::Plug,
                is_on: true,
            },
        )
    }

    /// Script an unreachable address
    pub fn unreachable(self, address: &str) -> Self {
        self.script(address, ConnectScript::Unreachable)
    }

    pub fn script(mut self, address: &str, script: ConnectScript) -> Self {
        self.by_address.insert(address.to_string(), script);
        self
    }

    pub fn connect_call_count(&self) -> usize {
        self.connect_call_count.load(Ordering::SeqCst)
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            by_address: other.by_address.clone(),
            connect_call_count: Arc::clone(&other.connect_call_count),
        }
    }
}

#[async_trait]
impl DeviceConnector for ScriptedConnector {
    async fn connect(&self, address: &str) -> Result<Box<dyn PlugHandle>> {
        self.connect_call_count.fetch_add(1, Ordering::SeqCst);
        match self.by_address.get(address) {
            Some(ConnectScript::Live { alias, kind, is_on }) => Ok(Box::new(FakePlug {
                alias: alias.clone(),
                address: address.to_string(),
                kind: *kind,
                is_on: *is_on,
            })),
            Some(ConnectScript::Unreachable) | None => Err(Error::network(format!(
                "connect to {} timed out",
                address
            ))),
        }
    }
}

/// A PlugHandle whose state lives in memory
#[derive(Debug)]
pub struct FakePlug {
    alias: String,
    address: String,
    kind: DeviceKind,
    is_on: bool,
}

#[async_trait]
impl PlugHandle for FakePlug {
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
        Ok(())
    }

    async fn is_on(&mut self) -> Result<bool> {
        Ok(self.is_on)
    }

    async fn turn_on(&mut self) -> Result<()> {
        self.is_on = true;
        Ok(())
    }

    async fn turn_off(&mut self) -> Result<()> {
        self.is_on = false;
        Ok(())
    }
}

/// Shorthand for a plug-kind DeviceInfo
pub fn plug_info(address: &str, alias: &str) -> DeviceInfo {
    DeviceInfo {
        address: address.to_string(),
        alias: alias.to_string(),
        kind: DeviceKind::Plug,
    }
}

/// Shorthand for a non-plug DeviceInfo
pub fn other_info(address: &str, alias: &str) -> DeviceInfo {
    DeviceInfo {
        address: address.to_string(),
        alias: alias.to_string(),
        kind: DeviceKind::Other,
    }
}
