//! Catalog Module
//!
//! Product catalog reads (list products, get product, list categories) served
//! through the response cache.

mod client;
mod keys;

pub use client::{derive_categories, CatalogClient, TOTAL_COUNT_HEADER};
pub use keys::RequestKeys;
