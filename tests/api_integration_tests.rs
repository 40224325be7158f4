//! Integration Tests for API Endpoints
//!
//! Drives the gateway router against a mock upstream catalog.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use catalog_cache::{api::create_router, AppState, FetchCache};
use common::{sample_categories, sample_products, MockCatalog};
use serde_json::Value;
use tower::ServiceExt;

const CATEGORIES: [&str; 3] = ["Electronics", "Books", "Toys"];

// == Helper Functions ==

async fn start_gateway() -> (MockCatalog, Router) {
    let upstream =
        MockCatalog::start(sample_products(30, &CATEGORIES), sample_categories(&CATEGORIES)).await;
    let client = upstream.client(FetchCache::new(100, 300_000));
    let app = create_router(AppState::new(client));
    (upstream, app)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == Products Endpoint Tests ==

#[tokio::test]
async fn test_list_products_default_page() {
    let (_upstream, app) = start_gateway().await;

    let (status, json) = send(&app, "GET", "/products").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 12);
    assert_eq!(json["total"], 30);
    assert_eq!(json["page"], 1);
    assert_eq!(json["limit"], 12);
    assert_eq!(json["totalPages"], 3);
    assert_eq!(json["data"][0]["productId"], "p-1");
}

#[tokio::test]
async fn test_list_products_by_category() {
    let (_upstream, app) = start_gateway().await;

    let (status, json) = send(&app, "GET", "/products?category=Books&page=2&limit=4").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 10);
    assert_eq!(json["totalPages"], 3);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 4);
    assert!(data.iter().all(|p| p["category"] == "Books"));
}

#[tokio::test]
async fn test_repeated_listing_served_from_cache() {
    let (upstream, app) = start_gateway().await;

    let (first_status, first) = send(&app, "GET", "/products?category=Toys&page=1").await;
    let (second_status, second) = send(&app, "GET", "/products?category=Toys&page=1").await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(upstream.requests(), 1);
}

#[tokio::test]
async fn test_blank_category_is_all_products() {
    let (upstream, app) = start_gateway().await;

    send(&app, "GET", "/products").await;
    let (status, json) = send(&app, "GET", "/products?category=&page=1&limit=12").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 30);
    assert_eq!(upstream.requests(), 1);
}

#[tokio::test]
async fn test_list_products_invalid_limit() {
    let (upstream, app) = start_gateway().await;

    let (status, json) = send(&app, "GET", "/products?limit=0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
    assert_eq!(upstream.requests(), 0);
}

// == Product Endpoint Tests ==

#[tokio::test]
async fn test_get_product_success() {
    let (_upstream, app) = start_gateway().await;

    let (status, json) = send(&app, "GET", "/products/p-7").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["productId"], "p-7");
    assert_eq!(json["availability"], "Out of Stock");
    assert_eq!(json["reviewsCount"], 21);
}

#[tokio::test]
async fn test_get_product_not_found() {
    let (_upstream, app) = start_gateway().await;

    let (status, json) = send(&app, "GET", "/products/p-999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Not found: product p-999");
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let (upstream, app) = start_gateway().await;
    upstream.set_fail_all(true);

    let (status, _) = send(&app, "GET", "/products/p-1").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_cached_product_survives_upstream_failure() {
    let (upstream, app) = start_gateway().await;

    send(&app, "GET", "/products/p-3").await;
    upstream.set_fail_all(true);
    let (status, json) = send(&app, "GET", "/products/p-3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["productId"], "p-3");
}

// == Categories Endpoint Tests ==

#[tokio::test]
async fn test_list_categories() {
    let (_upstream, app) = start_gateway().await;

    let (status, json) = send(&app, "GET", "/categories").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, CATEGORIES);
    assert_eq!(json[0]["id"], "c1");
}

#[tokio::test]
async fn test_list_categories_falls_back_to_products() {
    let (upstream, app) = start_gateway().await;
    upstream.set_fail_categories(true);

    let (status, json) = send(&app, "GET", "/categories").await;

    assert_eq!(status, StatusCode::OK);
    let categories = json.as_array().unwrap();
    assert_eq!(categories.len(), 3);
    assert_eq!(categories[0]["id"], "1");
    assert_eq!(categories[0]["name"], "Electronics");
}

#[tokio::test]
async fn test_list_categories_all_down_is_empty() {
    let (upstream, app) = start_gateway().await;
    upstream.set_fail_all(true);

    let (status, json) = send(&app, "GET", "/categories").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, Value::Array(vec![]));
}

// == Cache Management Endpoint Tests ==

#[tokio::test]
async fn test_clear_cache_forces_refetch() {
    let (upstream, app) = start_gateway().await;

    send(&app, "GET", "/products/p-1").await;
    send(&app, "GET", "/products/p-2").await;

    let (status, json) = send(&app, "DELETE", "/cache").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cleared"], 2);

    send(&app, "GET", "/products/p-1").await;
    assert_eq!(upstream.requests(), 3);
}

#[tokio::test]
async fn test_stats_track_hits_and_misses() {
    let (_upstream, app) = start_gateway().await;

    send(&app, "GET", "/products/p-1").await;
    send(&app, "GET", "/products/p-1").await;
    send(&app, "GET", "/products/p-2").await;

    let (status, json) = send(&app, "GET", "/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 2);
    assert_eq!(json["total_entries"], 2);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_upstream, app) = start_gateway().await;

    let (status, json) = send(&app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}
