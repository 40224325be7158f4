//! Cached catalog client.
//!
//! Issues the three catalog reads through [`FetchCache`].

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use super::keys::RequestKeys;
use crate::config::{Config, DEFAULT_PAGE_SIZE};
use crate::error::{CatalogError, Result};
use crate::fetch::FetchCache;
use crate::models::{Category, PaginatedResponse, Product};
use crate::offline::JsonFileOfflineStore;

/// Response header carrying the total number of matching products
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

// == Catalog Client ==
/// Catalog API client whose reads go through the response cache.
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    keys: RequestKeys,
    cache: FetchCache,
    page_size: u32,
}

impl CatalogClient {
    // == Constructors ==
    /// Creates a client for `base_url` reading through `cache`.
    pub fn new(base_url: &str, cache: FetchCache) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            keys: RequestKeys::new(base_url)?,
            cache,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Builds the HTTP client, cache and optional offline store from config.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| CatalogError::Config(format!("failed to build HTTP client: {}", e)))?;

        let mut cache = FetchCache::new(config.max_cache_size, config.cache_duration_ms);
        if let Some(path) = &config.offline_store_path {
            let offline = JsonFileOfflineStore::open(path)?;
            cache = cache.with_offline_store(Arc::new(offline));
        }

        Ok(Self::new(&config.api_base_url, cache)?
            .with_http_client(http)
            .with_page_size(config.page_size))
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    // == List Products ==
    /// Fetches one page of products, optionally filtered by category.
    ///
    /// Defaults: page 1, the configured page size.
    pub async fn list_products(
        &self,
        category: Option<&str>,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<PaginatedResponse<Product>> {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(self.page_size).max(1);
        let key = self.keys.products(category, page, limit);

        let http = self.http.clone();
        let url = key.clone();
        self.cache
            .fetch_with_cache(&key, move || async move { fetch_listing(&http, &url).await })
            .await
    }

    // == Get Product ==
    /// Fetches a single product record.
    ///
    /// An upstream 404 with nothing cached or offline is `NotFound`.
    pub async fn get_product(&self, product_id: &str) -> Result<Product> {
        if product_id.is_empty() {
            return Err(CatalogError::InvalidRequest(
                "product id cannot be empty".to_string(),
            ));
        }
        let key = self.keys.product(product_id);

        let http = self.http.clone();
        let url = key.clone();
        self.cache
            .fetch_with_cache(&key, move || async move { fetch_json(&http, &url).await })
            .await
            .map_err(|err| match err {
                CatalogError::Status { status: 404, .. } => {
                    CatalogError::NotFound(format!("product {}", product_id))
                }
                other => other,
            })
    }

    // == List Categories ==
    /// Fetches the category list.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let key = self.keys.categories();

        let http = self.http.clone();
        let url = key.clone();
        self.cache
            .fetch_with_cache(&key, move || async move { fetch_json(&http, &url).await })
            .await
    }

    // == Load Categories ==
    /// Category list with a fallback for when the categories endpoint fails:
    /// categories are derived from the first unfiltered product page. If that
    /// fails too, the result is empty.
    pub async fn load_categories(&self) -> Vec<Category> {
        match self.list_categories().await {
            Ok(categories) => categories,
            Err(err) => {
                error!(error = %err, "Failed to load categories");
                match self.list_products(None, None, None).await {
                    Ok(page) => {
                        let derived = derive_categories(&page.data);
                        info!(count = derived.len(), "Derived categories from product listing");
                        derived
                    }
                    Err(fallback_err) => {
                        error!(error = %fallback_err, "Category fallback also failed");
                        Vec::new()
                    }
                }
            }
        }
    }

    // == Clear Cache ==
    /// Drops every cached response.
    pub async fn clear_cache(&self) -> usize {
        self.cache.clear().await
    }

    // == Accessors ==
    pub fn cache(&self) -> &FetchCache {
        &self.cache
    }

    pub fn keys(&self) -> &RequestKeys {
        &self.keys
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

// == Category Derivation ==
/// Distinct product categories in first-seen order, numbered `"1"`, `"2"`, ...
pub fn derive_categories(products: &[Product]) -> Vec<Category> {
    let mut categories: Vec<Category> = Vec::new();
    for product in products {
        if !categories.iter().any(|c| c.name == product.category) {
            categories.push(Category {
                id: (categories.len() + 1).to_string(),
                name: product.category.clone(),
            });
        }
    }
    categories
}

// == Request Executors ==
/// GETs `url` and decodes the body as JSON. Non-success statuses are errors.
async fn fetch_json(http: &Client, url: &str) -> Result<Value> {
    let response = http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response.json::<Value>().await?)
}

/// GETs a listing and combines the body with the `X-Total-Count` header into
/// `{ "data": [...], "total": n }`.
///
/// A missing or unparseable header counts as zero.
async fn fetch_listing(http: &Client, url: &str) -> Result<Value> {
    let response = http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let total = response
        .headers()
        .get(TOTAL_COUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or_else(|| {
            warn!(url, "Missing or invalid {} header, assuming 0", TOTAL_COUNT_HEADER);
            0
        });

    let data = response.json::<Value>().await?;
    Ok(json!({ "data": data, "total": total }))
}
