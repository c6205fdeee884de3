//! Router tests over the in-memory store

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use stockroom_server::{build_router, MemoryStore, ServerConfig};

fn app() -> Router {
    build_router(Arc::new(MemoryStore::new()), &ServerConfig::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_product_type(app: &Router, kind: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/product-types",
        Some(json!({ "type": kind })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

async fn create_product(app: &Router, name: &str, type_id: Option<i64>) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/products",
        Some(json!({ "name": name, "stock": 10, "productTypeId": type_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

async fn sell(app: &Router, product_id: i64, qty: i64, at: &str) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/transactions",
        Some(json!({ "quantitySold": qty, "productId": product_id, "transactionDate": at })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
}

#[tokio::test]
async fn health_is_not_enveloped() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn created_product_appears_in_list_with_type() {
    let app = app();
    let type_id = create_product_type(&app, "Electronics").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({ "name": "Laptop", "stock": 5, "productTypeId": type_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Product created successfully");
    assert!(body.get("error").is_none());
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Products retrieved successfully");
    let products = body["data"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["id"].as_i64(), Some(id));
    assert_eq!(products[0]["name"], "Laptop");
    assert_eq!(products[0]["productTypeId"].as_i64(), Some(type_id));
    assert_eq!(products[0]["ProductType"]["type"], "Electronics");
}

#[tokio::test]
async fn created_product_type_appears_in_list() {
    let app = app();
    let id = create_product_type(&app, "Books").await;

    let (status, body) = send(&app, Method::GET, "/api/product-types", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"].as_i64(), Some(id));
    assert_eq!(body["data"][0]["type"], "Books");
}

#[tokio::test]
async fn created_transaction_appears_in_list_joined() {
    let app = app();
    let type_id = create_product_type(&app, "Books").await;
    let product_id = create_product(&app, "Dune", Some(type_id)).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/transactions",
        Some(json!({ "quantitySold": 3, "productId": product_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["transactionDate"].is_string());

    let (status, body) = send(&app, Method::GET, "/api/transactions", None).await;
    assert_eq!(status, StatusCode::OK);
    let row = &body["data"][0];
    assert_eq!(row["quantitySold"], 3);
    assert_eq!(row["Product"]["name"], "Dune");
    assert_eq!(row["Product"]["ProductType"]["type"], "Books");
}

#[tokio::test]
async fn transactions_filter_by_product_and_window() {
    let app = app();
    let a = create_product(&app, "A", None).await;
    let b = create_product(&app, "B", None).await;
    sell(&app, a, 1, "2024-03-01T10:00:00Z").await;
    sell(&app, a, 2, "2024-04-01T10:00:00Z").await;
    sell(&app, b, 3, "2024-03-01T11:00:00Z").await;

    let uri = format!("/api/transactions?productId={a}");
    let (_, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let uri = format!("/api/transactions?productId={a}&startDate=2024-03-01&endDate=2024-03-31");
    let (_, body) = send(&app, Method::GET, &uri, None).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["quantitySold"], 1);
}

#[tokio::test]
async fn update_merges_and_returns_joined_record() {
    let app = app();
    let type_id = create_product_type(&app, "Toys").await;
    let id = create_product(&app, "Kite", Some(type_id)).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/products/{id}"),
        Some(json!({ "stock": 42 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product updated successfully");
    assert_eq!(body["data"]["name"], "Kite");
    assert_eq!(body["data"]["stock"], 42);
    assert_eq!(body["data"]["ProductType"]["type"], "Toys");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/products/{id}"),
        Some(json!({ "productTypeId": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["productTypeId"], Value::Null);
    assert_eq!(body["data"]["ProductType"], Value::Null);
}

#[tokio::test]
async fn update_of_missing_id_is_null_success() {
    let app = app();
    for (uri, patch, resource) in [
        ("/api/products/999", json!({ "stock": 1 }), "Product"),
        ("/api/product-types/999", json!({ "type": "X" }), "ProductType"),
        ("/api/transactions/999", json!({ "quantitySold": 1 }), "Transaction"),
    ] {
        let (status, body) = send(&app, Method::PUT, uri, Some(patch)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"], Value::Null);
        assert_eq!(body["message"], format!("{resource} not found, nothing updated"));
        assert!(body.get("error").is_none());
    }

    // nothing was created as a side effect
    let (_, body) = send(&app, Method::GET, "/api/product-types", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn product_type_update_trims_label_and_touches_timestamp() {
    let app = app();
    let id = create_product_type(&app, "Books").await;
    let (_, before) = send(&app, Method::GET, "/api/product-types", None).await;
    let before = before["data"][0].clone();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let uri = format!("/api/product-types/{id}");
    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "type": "  Novels  " }))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "ProductType updated successfully");
    assert_eq!(body["data"]["id"].as_i64(), Some(id));
    assert_eq!(body["data"]["type"], "Novels");
    assert_eq!(body["data"]["createdAt"], before["createdAt"]);
    assert_ne!(body["data"]["updatedAt"], before["updatedAt"]);

    let (_, listed) = send(&app, Method::GET, "/api/product-types", None).await;
    assert_eq!(listed["data"][0]["type"], "Novels");
}

#[tokio::test]
async fn delete_is_idempotent() {
    let app = app();
    let id = create_product(&app, "Gone", None).await;
    let uri = format!("/api/products/{id}");

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["message"], "Product deleted successfully");

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Product already absent");

    let (_, body) = send(&app, Method::GET, "/api/products", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn deleting_type_clears_product_reference() {
    let app = app();
    let type_id = create_product_type(&app, "Seasonal").await;
    create_product(&app, "Wreath", Some(type_id)).await;

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/product-types/{type_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "ProductType deleted successfully");

    let (_, body) = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(body["data"][0]["productTypeId"], Value::Null);
}

#[tokio::test]
async fn sorted_sold_ranks_by_total() {
    let app = app();
    let a = create_product(&app, "A", None).await;
    let b = create_product(&app, "B", None).await;
    sell(&app, a, 10, "2024-01-10T09:00:00Z").await;
    sell(&app, a, 5, "2024-01-11T09:00:00Z").await;
    sell(&app, b, 20, "2024-01-12T09:00:00Z").await;

    let (status, body) = send(&app, Method::GET, "/api/transactions/sorted-sold", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Transaction retrieved successfully");

    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["productId"].as_i64(), Some(b));
    assert_eq!(rows[0]["totalQuantitySold"], 20);
    assert_eq!(rows[0]["totalQuantityTransaction"], 1);
    assert_eq!(rows[0]["Product"]["name"], "B");
    assert_eq!(rows[1]["productId"].as_i64(), Some(a));
    assert_eq!(rows[1]["totalQuantitySold"], 15);
    assert_eq!(rows[1]["totalQuantityTransaction"], 2);
    assert!(rows[0].get("id").is_none());
    assert!(rows[0].get("quantitySold").is_none());
}

#[tokio::test]
async fn sorted_sold_window_handling() {
    let app = app();
    let a = create_product(&app, "A", None).await;
    sell(&app, a, 4, "2024-05-05T12:00:00Z").await;

    let uri = "/api/transactions/sorted-sold?startDate=2023-01-01&endDate=2023-12-31";
    let (status, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());

    let uri = "/api/transactions/sorted-sold?startDate=2024-05-05&endDate=2024-05-05";
    let (_, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(body["data"][0]["totalQuantitySold"], 4);

    // One bound alone does not filter
    let uri = "/api/transactions/sorted-sold?startDate=2030-01-01";
    let (status, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn blank_or_lone_bounds_are_ignored() {
    let app = app();
    let a = create_product(&app, "A", None).await;
    sell(&app, a, 4, "2024-05-05T12:00:00Z").await;

    for query in [
        "startDate=&endDate=",
        "startDate=2024-01-01&endDate=",
        "startDate=&endDate=2023-01-01",
        "startDate=notadate",
        "endDate=notadate",
    ] {
        let uri = format!("/api/transactions/sorted-sold?{query}");
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK, "{query}: {body}");
        assert_eq!(body["data"][0]["totalQuantitySold"], 4, "{query}");

        let uri = format!("/api/transactions?{query}");
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK, "{query}: {body}");
        assert_eq!(body["data"].as_array().unwrap().len(), 1, "{query}");
    }
}

#[tokio::test]
async fn validation_failures_are_400() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/api/products", Some(json!({ "stock": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation");
    assert_eq!(body["error"]["detail"], "name is required");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/product-types",
        Some(json!({ "type": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/transactions",
        Some(json!({ "productId": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["detail"], "quantitySold is required");

    let (status, body) = send(&app, Method::PUT, "/api/products/abc", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation");

    let uri = "/api/transactions/sorted-sold?startDate=soon&endDate=2024-01-01";
    let (status, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation");
}

#[tokio::test]
async fn malformed_json_is_enveloped_400() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/products")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"]["kind"], "validation");
}

#[tokio::test]
async fn foreign_key_violations_are_409() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({ "name": "Orphan", "stock": 1, "productTypeId": 77 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["kind"], "conflict");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/transactions",
        Some(json!({ "quantitySold": 1, "productId": 77 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let id = create_product(&app, "Sold", None).await;
    sell(&app, id, 1, "2024-01-01T00:00:00Z").await;
    let (status, body) = send(&app, Method::DELETE, &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn unknown_route_is_enveloped_404() {
    let (status, body) = send(&app(), Method::GET, "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["kind"], "not_found");
}

#[tokio::test]
async fn transaction_update_and_delete() {
    let app = app();
    let a = create_product(&app, "A", None).await;
    let b = create_product(&app, "B", None).await;
    sell(&app, a, 2, "2024-02-02T08:00:00Z").await;

    let (_, body) = send(&app, Method::GET, "/api/transactions", None).await;
    let id = body["data"][0]["id"].as_i64().unwrap();
    let uri = format!("/api/transactions/{id}");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "productId": b, "quantitySold": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Transaction updated successfully");
    assert_eq!(body["data"]["quantitySold"], 6);
    assert_eq!(body["data"]["Product"]["name"], "B");

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Transaction deleted successfully");

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Transaction already absent");
}

async fn allowed_origin(app: Router, origin: &str) -> Option<String> {
    let request = Request::builder()
        .uri("/api/products")
        .header(header::ORIGIN, origin)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .map(|v| v.to_str().unwrap().to_string())
}

#[tokio::test]
async fn any_origin_is_allowed_by_default() {
    let origin = allowed_origin(app(), "https://shop.example.com").await;
    assert_eq!(origin.as_deref(), Some("*"));
}

#[tokio::test]
async fn localhost_cors_rejects_foreign_origins() {
    let config = ServerConfig {
        cors_permissive: false,
        ..ServerConfig::default()
    };
    let app = build_router(Arc::new(MemoryStore::new()), &config);
    assert_eq!(allowed_origin(app.clone(), "https://shop.example.com").await, None);
    assert_eq!(
        allowed_origin(app, "http://localhost:3000").await.as_deref(),
        Some("http://localhost:3000")
    );
}
