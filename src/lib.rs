//! Catalog Cache - read-through response cache for a product catalog API
//!
//! Serves product listings, product details and categories from an in-memory
//! cache with expiry and size-bounded eviction, falling back to stale data and
//! an offline store when the network fails.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod offline;
pub mod tasks;

pub use api::AppState;
pub use catalog::CatalogClient;
pub use config::Config;
pub use error::{CatalogError, Result};
pub use fetch::FetchCache;
pub use tasks::{spawn_warmup_task, WarmupOptions};
