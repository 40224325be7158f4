//! Request DTOs for the gateway API
//!
//! Defines the query parameters accepted by the listing endpoint.

use serde::Deserialize;

/// Largest page size the gateway accepts
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Query string of `GET /products`
///
/// # Fields
/// - `category`: Optional category filter
/// - `page`: 1-based page number (default 1)
/// - `limit`: Page size (default: configured page size)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductsQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ProductsQuery {
    /// Validates the query.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.page == Some(0) {
            return Some("page must be at least 1".to_string());
        }
        match self.limit {
            Some(0) => Some("limit must be at least 1".to_string()),
            Some(limit) if limit > MAX_PAGE_LIMIT => Some(format!(
                "limit exceeds maximum of {}",
                MAX_PAGE_LIMIT
            )),
            _ => None,
        }
    }

    /// Category filter, with a blank value treated as absent.
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}
