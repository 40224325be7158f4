//! API Module
//!
//! HTTP handlers and routing for the catalog gateway.
//!
//! # Endpoints
//! - `GET /products` - One page of products
//! - `GET /products/:id` - A single product
//! - `GET /categories` - Category list
//! - `DELETE /cache` - Clear the response cache
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
