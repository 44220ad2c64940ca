//! Black-box tests driving the full router against an in-memory database.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use stockbook_db::{Database, DbConfig};
use stockbook_server::{build_router, AppState};
use tower::ServiceExt;

async fn app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    build_router(AppState::new(db), true)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn create_widget(app: &Router, initial_stock: i64) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/products",
        Some(json!({
            "name": "Widget",
            "initialStock": initial_stock,
            "buyingPriceCents": 200,
            "sellingPriceCents": 500,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

fn sale(seller: &str, product_id: &str, quantity: i64, due: i64, date: &str) -> Value {
    json!({
        "sellerName": seller,
        "items": [{
            "productId": product_id,
            "quantity": quantity,
            "sellingPriceCents": 500,
        }],
        "totalDueAmountCents": due,
        "date": date,
    })
}

#[tokio::test]
async fn health_reports_database() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["database"], "connected");
}

#[tokio::test]
async fn product_lifecycle() {
    let app = app().await;
    let id = create_widget(&app, 50).await;

    let (status, body) = send(&app, Method::GET, &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["remainingQuantity"], 50);
    assert_eq!(body["data"]["stockStatus"], "inStock");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/products/{id}"),
        Some(json!({ "name": "Gadget", "buyingPriceCents": 250, "sellingPriceCents": 600 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Gadget");
    assert_eq!(body["data"]["remainingQuantity"], 50);

    let (status, body) = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, body) = send(&app, Method::GET, "/api/products/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["productCount"], 1);
    assert_eq!(body["data"]["totalRemainingQuantity"], 50);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn invalid_product_is_rejected_with_field() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({
            "name": "   ",
            "initialStock": 5,
            "buyingPriceCents": 200,
            "sellingPriceCents": 500,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "name");

    let (status, body) = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/products")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn purchase_order_delivery() {
    let app = app().await;
    let product_id = create_widget(&app, 0).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders/purchase",
        Some(json!({ "productId": product_id, "quantity": 30, "buyingPriceCents": 200 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["totalCostCents"], 6000);
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, "/api/orders/purchase?status=pending", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let deliver = format!("/api/orders/purchase/{order_id}/deliver");
    let (status, body) = send(&app, Method::PUT, &deliver, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "delivered");
    assert!(body["data"]["deliveryDate"].is_string());

    let (status, body) = send(&app, Method::PUT, &deliver, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "ALREADY_DELIVERED");

    let (_, body) = send(&app, Method::GET, &format!("/api/products/{product_id}"), None).await;
    assert_eq!(body["data"]["remainingQuantity"], 30);

    let (status, body) = send(&app, Method::GET, "/api/orders/purchase?status=shipped", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "status");
}

#[tokio::test]
async fn sale_with_due_and_insufficient_stock() {
    let app = app().await;
    let product_id = create_widget(&app, 100).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders/sales",
        Some(sale("Acme", &product_id, 30, 5000, "2026-10-01")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["totalSalesAmountCents"], 15000);
    assert_eq!(body["data"]["cashSaleAmountCents"], 10000);
    assert_eq!(body["data"]["items"][0]["productName"], "Widget");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders/sales",
        Some(sale("Acme", &product_id, 71, 0, "2026-10-02")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INSUFFICIENT_STOCK");
    assert_eq!(body["error"]["details"]["available"], 70);
    assert_eq!(body["error"]["details"]["requested"], 71);
    assert_eq!(body["error"]["details"]["productName"], "Widget");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders/sales",
        Some(sale("Acme", &product_id, 1, 900, "2026-10-02")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_AMOUNT");

    let (_, body) = send(&app, Method::GET, "/api/orders/sales?seller=Acme", None).await;
    assert_eq!(body["count"], 1);

    let (_, body) = send(&app, Method::GET, &format!("/api/products/{product_id}"), None).await;
    assert_eq!(body["data"]["soldQuantity"], 30);
}

#[tokio::test]
async fn seller_views() {
    let app = app().await;
    let product_id = create_widget(&app, 100).await;

    for (seller, qty, date) in [
        ("Acme Traders", 30, "2026-09-30"),
        ("Acme Traders", 5, "2026-10-01"),
        ("Bolt", 1, "2026-10-01"),
    ] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/orders/sales",
            Some(sale(seller, &product_id, qty, 0, date)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, Method::GET, "/api/orders/sellers", None).await;
    assert_eq!(body["data"], json!(["Acme Traders", "Bolt"]));

    let (_, body) = send(&app, Method::GET, "/api/orders/sellers?q=acme", None).await;
    assert_eq!(body["data"], json!(["Acme Traders"]));

    let (status, body) = send(&app, Method::GET, "/api/orders/sellers/Acme%20Traders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["recordCount"], 2);
    assert_eq!(body["data"]["totalQuantitySold"], 35);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/orders/sellers/Acme%20Traders/months/2026-10",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["month"], "2026-10");
    assert_eq!(body["data"]["recordCount"], 1);
    assert_eq!(body["data"]["totalSalesCents"], 2500);

    let (status, _) = send(&app, Method::GET, "/api/orders/sellers/Nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/api/orders/sellers/Bolt/months/2026-13", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn due_lifecycle() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/dues",
        Some(json!({
            "sellerName": "Acme",
            "shopName": "CornerStore",
            "dueAmountCents": 2500,
            "dateAdded": "2026-10-03",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let due_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/dues",
        Some(json!({
            "sellerName": "Acme",
            "shopName": "CornerStore",
            "dueAmountCents": 0,
            "dateAdded": "2026-10-03",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_AMOUNT");

    let (_, body) = send(&app, Method::GET, "/api/dues/sellers/Acme", None).await;
    assert_eq!(body["data"]["totalDueCents"], 2500);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/dues/{due_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/api/dues/sellers/Acme", None).await;
    assert_eq!(body["data"]["totalDueCents"], 0);
    assert_eq!(body["data"]["dueEntries"], json!([]));

    let (status, _) = send(&app, Method::DELETE, &format!("/api/dues/{due_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, "/api/dues", None).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn malformed_and_unknown_product_ids() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders/sales",
        Some(sale("Acme", "not-a-uuid", 1, 0, "2026-10-01")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "items[0].productId");

    let unknown = "550e8400-e29b-41d4-a716-446655440000";
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders/sales",
        Some(sale("Acme", unknown, 1, 0, "2026-10-01")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = send(&app, Method::GET, "/api/products/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_quantities_are_rejected() {
    let app = app().await;
    let product_id = create_widget(&app, 10).await;

    let mut body = sale("Acme", &product_id, i64::MAX, 0, "2026-10-01");
    body["items"][0]["sellingPriceCents"] = json!(2);
    let (status, body) = send(&app, Method::POST, "/api/orders/sales", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "items[0].quantity");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders/purchase",
        Some(json!({ "productId": product_id, "quantity": i64::MAX, "buyingPriceCents": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "quantity");

    let (status, body) = send(&app, Method::GET, &format!("/api/products/{product_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["remainingQuantity"], 10);
}
