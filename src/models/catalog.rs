//! Catalog records as served by the upstream REST API.

use serde::{Deserialize, Serialize};

/// Stock status of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

/// A single product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub currency: String,
    pub category: String,
    pub brand: String,
    pub rating: f64,
    pub reviews_count: u32,
    pub availability: Availability,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    /// ISO timestamp, passed through as sent
    pub created_at: String,
    pub updated_at: String,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// One page of a listing plus the total count across all pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64) -> Self {
        Self { data, total }
    }

    /// Number of pages of `limit` items needed to cover `total`.
    pub fn total_pages(&self, limit: u32) -> u32 {
        total_pages(self.total, limit)
    }
}

/// `ceil(total / limit)`; zero when either is zero.
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit)).min(u64::from(u32::MAX)) as u32
}
