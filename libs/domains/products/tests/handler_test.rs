//! Handler tests for the Products domain
//!
//! These tests verify that HTTP handlers work correctly:
//! - Request deserialization (JSON → Rust structs)
//! - Response serialization (Rust structs → JSON)
//! - HTTP status codes
//! - Error responses
//!
//! They drive the real router against the in-memory repository, so no
//! external services are required.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app() -> Router {
    let repo = InMemoryProductRepository::new();
    let service = ProductService::new(repo);
    handlers::router(service)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn seed_product(app: &Router, name: &str, price: f64, quantity: i32) -> Product {
    let response = app
        .clone()
        .oneshot(post_json(
            "/",
            json!({"name": name, "price": price, "quantity": quantity}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_product_returns_201_with_assigned_id() {
    let app = app();

    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "name": "Laptop",
                "description": "15 inch ultrabook",
                "price": 999.99,
                "quantity": 10
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.id, 1);
    assert_eq!(product.name, "Laptop");
    assert_eq!(product.created_at, product.updated_at);
}

#[tokio::test]
async fn test_create_product_validates_input() {
    let app = app();

    // Empty name fails boundary validation
    let response = app
        .oneshot(post_json("/", json!({"name": "", "price": 1.0})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_product_not_found_returns_404() {
    let app = app();

    let response = app
        .oneshot(Request::get("/99").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "NotFound");
}

#[tokio::test]
async fn test_update_product_roundtrip() {
    let app = app();
    let created = seed_product(&app, "Laptop", 999.99, 10).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/{}", created.id))
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"name": "Laptop Pro", "price": 1299.0, "quantity": 4}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Product = json_body(response.into_body()).await;
    assert_eq!(updated.name, "Laptop Pro");
    assert_eq!(updated.quantity, 4);
}

#[tokio::test]
async fn test_delete_product_returns_204_even_when_absent() {
    let app = app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_search_endpoint_filters_catalog() {
    let app = app();
    seed_product(&app, "Laptop", 999.99, 10).await;
    seed_product(&app, "Mouse", 19.99, 50).await;

    let response = app
        .clone()
        .oneshot(
            Request::get("/search?keyword=lap")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let found: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Laptop");

    // No keyword returns everything
    let response = app
        .oneshot(Request::get("/search").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let found: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(found.len(), 2);
}

#[tokio::test]
async fn test_stock_endpoint_clamps_at_zero() {
    let app = app();
    let created = seed_product(&app, "Laptop", 999.99, 3).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/{}/stock?quantity=-10", created.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let adjusted: Product = json_body(response.into_body()).await;
    assert_eq!(adjusted.quantity, 0);
}

#[tokio::test]
async fn test_stats_endpoint_reports_totals() {
    let app = app();
    seed_product(&app, "a", 100.0, 10).await;
    seed_product(&app, "b", 200.0, 20).await;

    let response = app
        .oneshot(Request::get("/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stats: ProductStats = json_body(response.into_body()).await;
    assert_eq!(stats.total_products, 2);
    assert_eq!(stats.total_value, "5000.00");
    assert_eq!(stats.average_price, "150.00");
    assert_eq!(stats.total_quantity, 30);
}
