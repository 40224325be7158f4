//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::catalog::CatalogClient;
use crate::error::{CatalogError, Result};
use crate::models::{
    Category, ClearResponse, HealthResponse, Product, ProductsQuery, ProductsResponse,
    StatsResponse,
};

/// Application state shared across all handlers.
///
/// The catalog client is cheap to clone; clones share one cache.
#[derive(Clone)]
pub struct AppState {
    pub client: CatalogClient,
}

impl AppState {
    pub fn new(client: CatalogClient) -> Self {
        Self { client }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Result<Self> {
        Ok(Self::new(CatalogClient::from_config(config)?))
    }
}

/// Handler for GET /products
///
/// Returns one page of products, optionally filtered by category.
pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<ProductsResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CatalogError::InvalidRequest(error_msg));
    }

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(state.client.page_size());
    let listing = state
        .client
        .list_products(query.category(), Some(page), Some(limit))
        .await?;

    Ok(Json(ProductsResponse::new(listing, page, limit)))
}

/// Handler for GET /products/:id
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>> {
    let product = state.client.get_product(&product_id).await?;
    Ok(Json(product))
}

/// Handler for GET /categories
///
/// Never fails: falls back to categories derived from the product listing,
/// then to an empty list.
pub async fn list_categories_handler(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.client.load_categories().await)
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let cleared = state.client.clear_cache().await;
    Json(ClearResponse::new(cleared))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.client.cache().stats().await;
    Json(StatsResponse::from(stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
