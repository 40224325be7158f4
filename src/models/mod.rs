//! Catalog records and gateway DTOs
//!
//! `catalog` holds the records consumed from the upstream API; `requests` and
//! `responses` define the gateway's HTTP bodies.

pub mod catalog;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use catalog::{total_pages, Availability, Category, PaginatedResponse, Product};
pub use requests::ProductsQuery;
pub use responses::{
    ClearResponse, ErrorResponse, HealthResponse, ProductsResponse, StatsResponse,
};
