//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use super::catalog::{total_pages, PaginatedResponse, Product};
use crate::cache::CacheStats;

/// Response body for `GET /products`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsResponse {
    /// Products on this page
    pub data: Vec<Product>,
    /// Matching products across all pages
    pub total: u64,
    /// Page number served
    pub page: u32,
    /// Page size used
    pub limit: u32,
    /// Pages needed to cover `total`
    pub total_pages: u32,
}

impl ProductsResponse {
    pub fn new(listing: PaginatedResponse<Product>, page: u32, limit: u32) -> Self {
        Self {
            total_pages: total_pages(listing.total, limit),
            data: listing.data,
            total: listing.total,
            page,
            limit,
        }
    }
}

/// Response body for `DELETE /cache`
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// Number of entries removed
    pub cleared: usize,
}

impl ClearResponse {
    pub fn new(cleared: usize) -> Self {
        Self {
            message: format!("Cleared {} cached responses", cleared),
            cleared,
        }
    }
}

/// Response body for `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Fetches served from a fresh entry
    pub hits: u64,
    /// Fetches that went to the network
    pub misses: u64,
    /// Failures answered with expired data
    pub stale_hits: u64,
    /// Failures answered from the offline store
    pub offline_hits: u64,
    /// Entries removed by the size bound
    pub evictions: u64,
    /// Entries removed by expiry
    pub expirations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            stale_hits: stats.stale_hits,
            offline_hits: stats.offline_hits,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
