//! Mock upstream catalog API shared by the integration tests.
//!
//! Serves `/products`, `/products/:id` and `/categories` like the real API,
//! counting requests and tracking how many are in flight at once.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use catalog_cache::{CatalogClient, FetchCache};

// == Sample Data ==
pub fn sample_product(id: usize, category: &str) -> Value {
    let availability = if id % 7 == 0 { "Out of Stock" } else { "In Stock" };
    json!({
        "productId": format!("p-{}", id),
        "name": format!("Product {}", id),
        "description": format!("Description of product {}", id),
        "price": 10.0 + id as f64,
        "currency": "USD",
        "category": category,
        "brand": "Acme",
        "rating": 4.2,
        "reviewsCount": id * 3,
        "availability": availability,
        "images": [format!("https://img.example/{}.jpg", id)],
        "tags": ["sample"],
        "createdAt": "2024-01-15T10:30:00Z",
        "updatedAt": "2024-02-01T12:00:00Z"
    })
}

/// `count` products assigned to `categories` round-robin, ids `p-1..p-count`.
pub fn sample_products(count: usize, categories: &[&str]) -> Vec<Value> {
    (1..=count)
        .map(|id| sample_product(id, categories[(id - 1) % categories.len()]))
        .collect()
}

pub fn sample_categories(names: &[&str]) -> Vec<Value> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({ "id": format!("c{}", i + 1), "name": name }))
        .collect()
}

// == Mock State ==
#[derive(Default)]
pub struct Counters {
    pub listing_requests: AtomicUsize,
    pub product_requests: AtomicUsize,
    pub category_requests: AtomicUsize,
    pub listing_in_flight: AtomicUsize,
    pub listing_max_in_flight: AtomicUsize,
    pub product_in_flight: AtomicUsize,
    pub product_max_in_flight: AtomicUsize,
}

impl Counters {
    pub fn total_requests(&self) -> usize {
        self.listing_requests.load(Ordering::SeqCst)
            + self.product_requests.load(Ordering::SeqCst)
            + self.category_requests.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct Switches {
    /// Every endpoint answers 503
    pub fail_all: AtomicBool,
    /// `/categories` answers 500
    pub fail_categories: AtomicBool,
    /// Listings are served without `X-Total-Count`
    pub omit_total_header: AtomicBool,
    /// Product ids whose detail endpoint answers 500
    pub failing_products: Mutex<HashSet<String>>,
    /// Value sent as `X-Total-Count` instead of the real count
    pub total_override: Mutex<Option<u64>>,
}

#[derive(Clone)]
struct MockState {
    products: Arc<Vec<Value>>,
    categories: Arc<Vec<Value>>,
    counters: Arc<Counters>,
    switches: Arc<Switches>,
    delay: Duration,
}

/// Decrements an in-flight counter when dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(current: &'a AtomicUsize, max: &AtomicUsize) -> Self {
        let now = current.fetch_add(1, Ordering::SeqCst) + 1;
        max.fetch_max(now, Ordering::SeqCst);
        Self(current)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

// == Mock Handlers ==
async fn list_products(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.counters.listing_requests.fetch_add(1, Ordering::SeqCst);
    let _guard = InFlight::enter(
        &state.counters.listing_in_flight,
        &state.counters.listing_max_in_flight,
    );
    tokio::time::sleep(state.delay).await;

    if state.switches.fail_all.load(Ordering::SeqCst) {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    let matching: Vec<&Value> = state
        .products
        .iter()
        .filter(|p| match params.get("category") {
            Some(category) => p["category"] == json!(category),
            None => true,
        })
        .collect();

    let page: usize = params.get("_page").and_then(|v| v.parse().ok()).unwrap_or(1);
    let limit: usize = params
        .get("_limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(matching.len().max(1));
    let data: Vec<Value> = matching
        .iter()
        .skip((page.max(1) - 1) * limit)
        .take(limit)
        .map(|p| (*p).clone())
        .collect();

    let mut headers = HeaderMap::new();
    if !state.switches.omit_total_header.load(Ordering::SeqCst) {
        let total = state
            .switches
            .total_override
            .lock()
            .unwrap()
            .unwrap_or(matching.len() as u64);
        headers.insert("X-Total-Count", HeaderValue::from(total));
    }
    (headers, Json(data)).into_response()
}

async fn get_product(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    state.counters.product_requests.fetch_add(1, Ordering::SeqCst);
    let _guard = InFlight::enter(
        &state.counters.product_in_flight,
        &state.counters.product_max_in_flight,
    );
    tokio::time::sleep(state.delay).await;

    if state.switches.fail_all.load(Ordering::SeqCst)
        || state.switches.failing_products.lock().unwrap().contains(&id)
    {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    match state.products.iter().find(|p| p["productId"] == json!(id)) {
        Some(product) => Json(product.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn list_categories(State(state): State<MockState>) -> Response {
    state.counters.category_requests.fetch_add(1, Ordering::SeqCst);
    if state.switches.fail_all.load(Ordering::SeqCst)
        || state.switches.fail_categories.load(Ordering::SeqCst)
    {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(state.categories.as_ref().clone()).into_response()
}

// == Mock Server ==
pub struct MockCatalog {
    pub base_url: String,
    pub counters: Arc<Counters>,
    pub switches: Arc<Switches>,
}

impl MockCatalog {
    /// Starts the mock API on an ephemeral localhost port.
    pub async fn start(products: Vec<Value>, categories: Vec<Value>) -> Self {
        Self::start_with_delay(products, categories, Duration::ZERO).await
    }

    /// Like [`start`](Self::start), with every listing and product request
    /// held for `delay` so concurrent requests overlap.
    pub async fn start_with_delay(
        products: Vec<Value>,
        categories: Vec<Value>,
        delay: Duration,
    ) -> Self {
        let counters = Arc::new(Counters::default());
        let switches = Arc::new(Switches::default());
        let state = MockState {
            products: Arc::new(products),
            categories: Arc::new(categories),
            counters: counters.clone(),
            switches: switches.clone(),
            delay,
        };

        let app = Router::new()
            .route("/products", get(list_products))
            .route("/products/:id", get(get_product))
            .route("/categories", get(list_categories))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            counters,
            switches,
        }
    }

    pub fn client(&self, cache: FetchCache) -> CatalogClient {
        CatalogClient::new(&self.base_url, cache).unwrap()
    }

    pub fn requests(&self) -> usize {
        self.counters.total_requests()
    }

    pub fn set_fail_all(&self, fail: bool) {
        self.switches.fail_all.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_categories(&self, fail: bool) {
        self.switches.fail_categories.store(fail, Ordering::SeqCst);
    }

    pub fn set_omit_total_header(&self, omit: bool) {
        self.switches.omit_total_header.store(omit, Ordering::SeqCst);
    }

    pub fn override_total(&self, total: u64) {
        *self.switches.total_override.lock().unwrap() = Some(total);
    }

    pub fn fail_product(&self, id: &str) {
        self.switches
            .failing_products
            .lock()
            .unwrap()
            .insert(id.to_string());
    }
}
