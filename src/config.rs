//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default seconds between eviction sweeps.
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 60;

/// Default cap on entries removed by a single sweep.
pub const DEFAULT_EVICTION_BATCH: usize = 1000;

/// Default entry count at which size accounting switches to sampling.
pub const DEFAULT_SAMPLE_THRESHOLD: usize = 10_000;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Background eviction interval in seconds
    pub cleanup_interval: u64,
    /// Maximum expiration records popped per eviction sweep
    pub eviction_batch: usize,
    /// Entry count at which size accounting switches to sampling
    pub sample_threshold: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `CLEANUP_INTERVAL` - Eviction frequency in seconds (default: 60, 0 = default)
    /// - `EVICTION_BATCH_SIZE` - Max records popped per sweep (default: 1000, 0 = default)
    /// - `SIZE_SAMPLE_THRESHOLD` - Sampling threshold for size accounting (default: 10000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: match env_or("CLEANUP_INTERVAL", defaults.cleanup_interval) {
                0 => defaults.cleanup_interval,
                secs => secs,
            },
            eviction_batch: match env_or("EVICTION_BATCH_SIZE", defaults.eviction_batch) {
                0 => defaults.eviction_batch,
                batch => batch,
            },
            sample_threshold: env_or("SIZE_SAMPLE_THRESHOLD", defaults.sample_threshold),
        }
    }

    /// Engine settings derived from this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_cleanup_interval(Duration::from_secs(self.cleanup_interval))
            .with_eviction_batch(self.eviction_batch)
            .with_sample_threshold(self.sample_threshold)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL_SECS,
            eviction_batch: DEFAULT_EVICTION_BATCH,
            sample_threshold: DEFAULT_SAMPLE_THRESHOLD,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// == Engine Config ==
/// Settings for the cache engine and its evictor.
///
/// # Example
///
/// ```rust
/// use simple_cache::EngineConfig;
/// use std::time::Duration;
///
/// let config = EngineConfig::default()
///     .with_cleanup_interval(Duration::from_millis(50))
///     .with_eviction_batch(500);
/// assert_eq!(config.eviction_batch, 500);
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Interval between eviction sweeps
    pub cleanup_interval: Duration,
    /// Maximum expiration records popped per sweep
    pub eviction_batch: usize,
    /// Entry count at which size accounting switches to sampling
    pub sample_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            eviction_batch: DEFAULT_EVICTION_BATCH,
            sample_threshold: DEFAULT_SAMPLE_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Sets the interval between eviction sweeps. A zero interval keeps the
    /// current value.
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.cleanup_interval = interval;
        }
        self
    }

    /// Sets the number of expiration records popped per sweep. A zero batch
    /// keeps the current value.
    pub fn with_eviction_batch(mut self, batch: usize) -> Self {
        if batch > 0 {
            self.eviction_batch = batch;
        }
        self
    }

    pub fn with_sample_threshold(mut self, threshold: usize) -> Self {
        self.sample_threshold = threshold;
        self
    }
}
