//! Cache configuration.
//!
//! Controls whether listings are cached, for how long, and how often the
//! memory backend reclaims expired entries.

use std::time::Duration;

// Default values for cache configuration
const DEFAULT_TTL_SECS: u64 = 300;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
const DEFAULT_NAMESPACE: &str = "caltrade";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Serve reads through the cache.
    pub enabled: bool,
    /// Lifetime of every entry written by the cache-aside layer.
    pub ttl: Duration,
    /// Cadence of the background expiry sweep.
    pub sweep_interval: Duration,
    /// Prefix applied to every key.
    pub namespace: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            ttl: settings.ttl,
            sweep_interval: settings.sweep_interval,
            namespace: settings.namespace.clone(),
        }
    }
}

impl CacheConfig {
    /// Returns true when reads should consult the cache.
    pub fn is_enabled(&self) -> bool {
        self.enabled && !self.ttl.is_zero()
    }
}
