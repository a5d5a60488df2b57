//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server
//! starts; nothing is reloadable at runtime.
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `PUBLIC_URL` - Referer sent on first-hop probes (default: `http://url-resolver.local/`)
//! - `MAX_HOPS` - Redirect chain limit (default: 10)
//! - `REQUEST_TIMEOUT_MS` - Per-hop probe deadline (default: 5000)
//! - `MAX_CACHE_AGE_MS` - Cache retention window (default: 7 days)
//! - `CACHE_AGE_RAMPUP_MS` - Retention decrement per pressure pass (default: 1 day)
//! - `MAX_MEMORY_USAGE` - Cache memory ceiling in bytes (default: 64 MiB)
//! - `CLEANER_INTERVAL_MS` - Periodic cleaner cadence (default: 1 hour)
//! - `MEMORY_CHECK_INTERVAL_MS` - Memory watcher cadence (default: 1 minute)
//! - `MEMORY_TRIGGER_PERCENT` - Watcher clean threshold (default: 90)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::Result;
use std::env;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// Self-referential URL sent as `Referer` on the first hop of a chain.
    pub public_url: String,
    /// Upper bound on URLs visited per resolution.
    pub max_hops: usize,
    /// Per-hop probe deadline in milliseconds.
    pub request_timeout_ms: u64,
    /// Baseline cache retention window in milliseconds.
    pub max_cache_age_ms: i64,
    /// Cutoff advance per extra cleaner pass under memory pressure.
    pub cache_age_rampup_ms: i64,
    /// Ceiling on cache-attributable resident-memory growth, in bytes.
    pub max_memory_usage: u64,
    /// Cadence of the unconditional periodic cleaner.
    pub cleaner_interval_ms: u64,
    /// Cadence of the memory watcher.
    pub memory_check_interval_ms: u64,
    /// Memory ratio (percent of ceiling) at which the watcher cleans.
    pub memory_trigger_percent: f64,
}

impl Config {
    /// Loads configuration from environment variables, with defaults for
    /// everything.
    pub fn from_env() -> Self {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
        let public_url =
            env::var("PUBLIC_URL").unwrap_or_else(|_| "http://url-resolver.local/".to_string());

        let max_hops = parse_env("MAX_HOPS", 10);
        let request_timeout_ms = parse_env("REQUEST_TIMEOUT_MS", 5_000);
        let max_cache_age_ms = parse_env("MAX_CACHE_AGE_MS", 7 * 24 * 3600 * 1000);
        let cache_age_rampup_ms = parse_env("CACHE_AGE_RAMPUP_MS", 24 * 3600 * 1000);
        let max_memory_usage = parse_env("MAX_MEMORY_USAGE", 64 * 1024 * 1024);
        let cleaner_interval_ms = parse_env("CLEANER_INTERVAL_MS", 3_600_000);
        let memory_check_interval_ms = parse_env("MEMORY_CHECK_INTERVAL_MS", 60_000);
        let memory_trigger_percent = parse_env("MEMORY_TRIGGER_PERCENT", 90.0);

        Self {
            listen_addr,
            log_level,
            log_format,
            public_url,
            max_hops,
            request_timeout_ms,
            max_cache_age_ms,
            cache_age_rampup_ms,
            max_memory_usage,
            cleaner_interval_ms,
            memory_check_interval_ms,
            memory_trigger_percent,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any limit is out of its sane range.
    pub fn validate(&self) -> Result<()> {
        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.public_url.starts_with("http://") && !self.public_url.starts_with("https://") {
            anyhow::bail!(
                "PUBLIC_URL must start with 'http://' or 'https://', got '{}'",
                self.public_url
            );
        }

        if self.max_hops == 0 || self.max_hops > 100 {
            anyhow::bail!("MAX_HOPS must be between 1 and 100, got {}", self.max_hops);
        }

        if self.request_timeout_ms == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_MS must be greater than 0");
        }

        if self.max_cache_age_ms <= 0 {
            anyhow::bail!("MAX_CACHE_AGE_MS must be greater than 0");
        }

        if self.cache_age_rampup_ms <= 0 || self.cache_age_rampup_ms > self.max_cache_age_ms {
            anyhow::bail!(
                "CACHE_AGE_RAMPUP_MS must be between 1 and MAX_CACHE_AGE_MS ({}), got {}",
                self.max_cache_age_ms,
                self.cache_age_rampup_ms
            );
        }

        if self.cleaner_interval_ms == 0 || self.memory_check_interval_ms == 0 {
            anyhow::bail!("cleaner and memory check intervals must be greater than 0");
        }

        if self.memory_trigger_percent <= 0.0 || self.memory_trigger_percent > 100.0 {
            anyhow::bail!(
                "MEMORY_TRIGGER_PERCENT must be between 1 and 100, got {}",
                self.memory_trigger_percent
            );
        }

        Ok(())
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Max hops: {}", self.max_hops);
        tracing::info!("  Request timeout: {}ms", self.request_timeout_ms);
        tracing::info!("  Max cache age: {}ms", self.max_cache_age_ms);
        tracing::info!("  Cache age rampup: {}ms", self.cache_age_rampup_ms);
        tracing::info!("  Memory ceiling: {} bytes", self.max_memory_usage);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Parses an env var, falling back to `default` when unset or malformed.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env();
    config.validate()?;
    Ok(config)
}
