//! Contract Test: Cache-First Fast Path
//!
//! Verifies that a live cached address short-circuits discovery entirely,
//! and that terminal storage failures are surfaced, never masked.
//!
//! Constraints verified:
//! - A confirmed cache hit performs zero probes
//! - Resolving twice on an unchanged network discovers at most once
//! - Storage faults abort the resolve instead of silently disabling the cache

mod common;

use common::*;
use plugctl_core::{DeviceLocator, Error, LocatorConfig};
use std::net::Ipv4Addr;

const LAN: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 255);

#[tokio::test]
async fn cache_hit_performs_no_discovery() {
    let cache = MockAddressCache::new().seed("plug", "192.168.1.40");
    let connector = ScriptedConnector::new().live_plug("192.168.1.40", "plug");
    let probe = ScriptedProbe::new();
    let broadcasts = StaticBroadcastSource::new(vec![LAN]);

    let locator = DeviceLocator::new(
        Box::new(MockAddressCache::sharing_state_with(&cache)),
        Box::new(ScriptedConnector::sharing_counters_with(&connector)),
        Box::new(ScriptedProbe::sharing_counters_with(&probe)),
        Box::new(StaticBroadcastSource::sharing_counters_with(&broadcasts)),
        LocatorConfig::with_attempts(3),
    )
    .expect("locator construction succeeds");

    let handle = locator.resolve("plug").await.expect("resolve succeeds");
    assert_eq!(handle.alias(), "plug");
    assert_eq!(handle.address(), "192.168.1.40");

    assert_eq!(probe.probe_call_count(), 0, "cache hit must not probe");
    assert_eq!(
        broadcasts.call_count(),
        0,
        "cache hit must not enumerate interfaces"
    );
    assert_eq!(cache.delete_call_count(), 0, "live entry must not be evicted");
}

#[tokio::test]
async fn second_resolve_is_pure_cache_hit() {
    // First resolve discovers; second resolve on the unchanged network
    // must not probe again.
    let cache = MockAddressCache::new();
    let connector = ScriptedConnector::new().live_plug("192.168.1.40", "plug");
    let probe =
        ScriptedProbe::new().domain_answers(LAN, vec![plug_info("192.168.1.40", "plug")]);
    let broadcasts = StaticBroadcastSource::new(vec![LAN]);

    let locator = DeviceLocator::new(
        Box::new(MockAddressCache::sharing_state_with(&cache)),
        Box::new(ScriptedConnector::sharing_counters_with(&connector)),
        Box::new(ScriptedProbe::sharing_counters_with(&probe)),
        Box::new(StaticBroadcastSource::sharing_counters_with(&broadcasts)),
        LocatorConfig::with_attempts(1),
    )
    .expect("locator construction succeeds");

    locator.resolve("plug").await.expect("first resolve succeeds");
    assert_eq!(probe.probe_call_count(), 1, "first resolve probes once");
    assert_eq!(cache.entry("plug").as_deref(), Some("192.168.1.40"));

    locator.resolve("plug").await.expect("second resolve succeeds");
    assert_eq!(
        probe.probe_call_count(),
        1,
        "second resolve must be a pure cache hit"
    );
}

#[tokio::test]
async fn discovery_match_populates_cache() {
    let cache = MockAddressCache::new();
    let connector = ScriptedConnector::new().live_plug("172.16.0.5", "plug");
    let probe =
        ScriptedProbe::new().domain_answers(LAN, vec![plug_info("172.16.0.5", "plug")]);
    let broadcasts = StaticBroadcastSource::new(vec![LAN]);

    let locator = DeviceLocator::new(
        Box::new(MockAddressCache::sharing_state_with(&cache)),
        Box::new(connector),
        Box::new(probe),
        Box::new(broadcasts),
        LocatorConfig::with_attempts(1),
    )
    .expect("locator construction succeeds");

    let handle = locator.resolve("plug").await.expect("resolve succeeds");
    assert_eq!(handle.address(), "172.16.0.5");
    assert_eq!(
        cache.entry("plug").as_deref(),
        Some("172.16.0.5"),
        "successful discovery must be written back"
    );
}

#[tokio::test]
async fn storage_failure_is_terminal() {
    let cache = MockAddressCache::failing("disk full");
    let connector = ScriptedConnector::new().live_plug("192.168.1.40", "plug");
    let probe = ScriptedProbe::new();
    let broadcasts = StaticBroadcastSource::new(vec![LAN]);

    let locator = DeviceLocator::new(
        Box::new(MockAddressCache::sharing_state_with(&cache)),
        Box::new(connector),
        Box::new(ScriptedProbe::sharing_counters_with(&probe)),
        Box::new(broadcasts),
        LocatorConfig::with_attempts(3),
    )
    .expect("locator construction succeeds");

    let err = locator.resolve("plug").await.expect_err("resolve must fail");
    assert!(
        matches!(err, Error::Storage(_)),
        "expected storage error, got {:?}",
        err
    );
    assert_eq!(
        probe.probe_call_count(),
        0,
        "a broken cache must not be papered over with discovery"
    );
}
