//! Configuration Module
//!
//! Handles loading and managing cache and gateway configuration from
//! environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CACHE_DURATION_MS, MAX_CACHE_SIZE};
use crate::offline::JsonFileOfflineStore;

/// Base URL of the upstream catalog API
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";

/// Products per listing page
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Listing pages fetched concurrently during warmup
pub const DEFAULT_PAGE_CONCURRENCY: usize = 5;

/// Product details fetched concurrently during warmup
pub const DEFAULT_PRODUCT_CONCURRENCY: usize = 10;

/// Most listing pages one warmup pass walks per listing
pub const DEFAULT_WARMUP_MAX_PAGES: u32 = 500;

/// Cache and gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream catalog API base URL
    pub api_base_url: String,
    /// Freshness window in milliseconds
    pub cache_duration_ms: u64,
    /// Entries retained after each cleanup pass
    pub max_cache_size: usize,
    /// Default products per page
    pub page_size: u32,
    /// Listing page fetches in flight during warmup
    pub page_concurrency: usize,
    /// Product detail fetches in flight during warmup
    pub product_concurrency: usize,
    /// Listing pages walked per listing during warmup, at most
    pub warmup_max_pages: u32,
    /// Whether the warmup pass runs at startup
    pub warmup_enabled: bool,
    /// Delay before the warmup pass starts, in milliseconds
    pub warmup_delay_ms: u64,
    /// JSON file backing the offline store, None = no offline store
    pub offline_store_path: Option<PathBuf>,
    /// Upstream request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Gateway HTTP port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Upstream API (default: http://localhost:3001)
    /// - `CACHE_DURATION_MS` - Freshness window (default: 300000)
    /// - `MAX_CACHE_SIZE` - Size bound (default: 100)
    /// - `PAGE_SIZE` - Products per page (default: 12)
    /// - `PAGE_CONCURRENCY` - Warmup page batch size (default: 5)
    /// - `PRODUCT_CONCURRENCY` - Warmup product batch size (default: 10)
    /// - `WARMUP_MAX_PAGES` - Warmup page cap per listing (default: 500)
    /// - `WARMUP_ENABLED` - Run warmup at startup (default: true)
    /// - `WARMUP_DELAY_MS` - Delay before warmup (default: 2000)
    /// - `OFFLINE_STORE_PATH` - Offline store JSON file, or `default` for the
    ///   platform cache directory (default: unset)
    /// - `REQUEST_TIMEOUT_MS` - Upstream request timeout (default: 10000)
    /// - `SERVER_PORT` - Gateway port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("API_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.api_base_url),
            cache_duration_ms: env_or("CACHE_DURATION_MS", defaults.cache_duration_ms),
            max_cache_size: env_or("MAX_CACHE_SIZE", defaults.max_cache_size),
            page_size: env_or("PAGE_SIZE", defaults.page_size).max(1),
            page_concurrency: env_or("PAGE_CONCURRENCY", defaults.page_concurrency).max(1),
            product_concurrency: env_or("PRODUCT_CONCURRENCY", defaults.product_concurrency)
                .max(1),
            warmup_max_pages: env_or("WARMUP_MAX_PAGES", defaults.warmup_max_pages).max(1),
            warmup_enabled: env_or("WARMUP_ENABLED", defaults.warmup_enabled),
            warmup_delay_ms: env_or("WARMUP_DELAY_MS", defaults.warmup_delay_ms),
            offline_store_path: env::var("OFFLINE_STORE_PATH")
                .ok()
                .and_then(|v| offline_store_path(&v)),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    pub fn cache_duration(&self) -> Duration {
        Duration::from_millis(self.cache_duration_ms)
    }

    pub fn warmup_delay(&self) -> Duration {
        Duration::from_millis(self.warmup_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Parses an environment variable, falling back to `default` when it is
/// unset or unparseable.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            cache_duration_ms: CACHE_DURATION_MS,
            max_cache_size: MAX_CACHE_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
            page_concurrency: DEFAULT_PAGE_CONCURRENCY,
            product_concurrency: DEFAULT_PRODUCT_CONCURRENCY,
            warmup_max_pages: DEFAULT_WARMUP_MAX_PAGES,
            warmup_enabled: true,
            warmup_delay_ms: 2000,
            offline_store_path: None,
            request_timeout_ms: 10_000,
            server_port: 3000,
        }
    }
}

/// Resolves `OFFLINE_STORE_PATH`. Blank means no offline store.
fn offline_store_path(value: &str) -> Option<PathBuf> {
    match value.trim() {
        "" => None,
        "default" => JsonFileOfflineStore::default_path(),
        path => Some(PathBuf::from(path)),
    }
}
