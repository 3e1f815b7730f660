// Common test utilities for integration tests

#![allow(dead_code)]

use nios_provider::config::ProviderSettings;
use nios_provider::provider::Provider;
use nios_provider::value::{MapOfMaps, ValueTree};
use std::collections::BTreeMap;

/// Provider configured from `NIOS_HOST_URL` / `NIOS_AUTH`, or skip the test
pub fn get_live_provider_or_skip() -> Option<Provider> {
    match Provider::configure(ProviderSettings::default()) {
        Ok(provider) => {
            println!("✓ Configured provider from environment");
            Some(provider)
        }
        Err(e) => {
            eprintln!("⊘ Skipping integration test: no NIOS grid master configured: {e:#}");
            None
        }
    }
}

/// Minimal A record configuration
pub fn a_record(name: &str, ipv4addr: &str) -> ValueTree {
    ValueTree::new().with("name", name).with("ipv4addr", ipv4addr)
}

/// Extensible attributes with a single `Site` value
pub fn site(value: &str) -> MapOfMaps {
    BTreeMap::from([(
        "Site".to_string(),
        BTreeMap::from([("value".to_string(), value.to_string())]),
    )])
}

/// Record name unique to this test run
pub fn unique_name(prefix: &str, zone: &str) -> String {
    format!("{prefix}-{}.{zone}", chrono::Utc::now().timestamp_millis())
}
