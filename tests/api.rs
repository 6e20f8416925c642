use std::sync::Arc;

use axum::{body::Body, Router};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use warehouse_api::store::MemoryLedgerStore;
use warehouse_api::{create_router, AppState};

struct TestApp {
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let state = AppState::new(Arc::new(MemoryLedgerStore::new()));
        Self { router: create_router(state) }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(Method::POST, uri, body).await
    }

    /// Creates one category, supplier and warehouse and returns their ids.
    async fn seed_references(&self) -> (i64, i64, i64) {
        let (status, category) =
            self.post("/categories/", Some(json!({ "category_name": "Dairy" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        let (_, supplier) = self
            .post(
                "/suppliers/",
                Some(json!({
                    "supplier_name": "Fresh Farms",
                    "contact_information": "orders@freshfarms.test",
                    "address": "7 Valley Rd"
                })),
            )
            .await;
        let (_, warehouse) = self
            .post(
                "/warehouses/",
                Some(json!({
                    "location_name": "Central",
                    "address": "99 Depot Ave",
                    "contact_information": "central@warehouse.test"
                })),
            )
            .await;
        (
            category["category_id"].as_i64().unwrap(),
            supplier["supplier_id"].as_i64().unwrap(),
            warehouse["warehouse_id"].as_i64().unwrap(),
        )
    }

    async fn create_product(&self, name: &str, quantity: i32, delivered_at: &str) -> Value {
        let (category_id, supplier_id, warehouse_id) = self.seed_references().await;
        let (status, product) = self
            .post(
                "/products/",
                Some(json!({
                    "product": {
                        "product_name": name,
                        "description": format!("{name} 1L"),
                        "category_id": category_id,
                        "supplier_id": supplier_id,
                        "quantity_in_stock": quantity,
                        "date_added": "2024-06-01T08:00:00",
                        "warehouse_id": warehouse_id,
                        "unit_price": 1.25
                    },
                    "delivery_info": {
                        "delivery_date_time": delivered_at,
                        "delivered_by": "Truck 4",
                        "recipient_name": "Dock A",
                        "recipient_contact": "dock-a@warehouse.test"
                    }
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create failed: {product}");
        product
    }
}

fn exit_uri(product_id: i64, quantity: i32) -> String {
    format!(
        "/products/{product_id}/exit/?quantity_exited={quantity}&exited_by=Sam&recipient_name=Shop%201&recipient_contact=shop1%40example.com"
    )
}

fn deliver_uri(product_id: i64, quantity: i32) -> String {
    format!(
        "/products/{product_id}/deliver/?quantity_delivered={quantity}&delivered_by=Truck%209&recipient_name=Dock%20B&recipient_contact=dock-b%40example.com"
    )
}

#[tokio::test]
async fn root_greets() {
    let app = TestApp::new();
    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Welcome to the Warehouse API" }));
}

#[tokio::test]
async fn stock_scenario_over_http() {
    let app = TestApp::new();
    let product = app.create_product("Milk", 50, "2024-06-01T09:00:00").await;
    let id = product["product_id"].as_i64().unwrap();
    assert_eq!(product["quantity_in_stock"], 50);

    let (status, body) = app.post(&deliver_uri(id, 20), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity_in_stock"], 70);

    let (status, body) = app.post(&exit_uri(id, 30), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity_in_stock"], 40);

    let (status, body) = app.post(&exit_uri(id, 50), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "insufficient_stock");
    assert_eq!(body["error"], "Insufficient quantity in stock");

    let (_, current) = app.get(&format!("/products/{id}")).await;
    assert_eq!(current["quantity_in_stock"], 40);

    let (status, txs) = app.get(&format!("/products/{id}/transactions/")).await;
    assert_eq!(status, StatusCode::OK);
    let kinds: Vec<(&str, i64)> = txs
        .as_array()
        .unwrap()
        .iter()
        .map(|t| (t["transaction_type"].as_str().unwrap(), t["quantity"].as_i64().unwrap()))
        .collect();
    assert_eq!(kinds, vec![("addition", 50), ("delivery", 20), ("exit", 30)]);

    let (status, audit) = app.get(&format!("/products/{id}/audit/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(audit["ledger_balance"], 40);
    assert_eq!(audit["consistent"], true);
}

#[tokio::test]
async fn transactions_point_at_movement_rows() {
    let app = TestApp::new();
    let product = app.create_product("Butter", 5, "2024-06-01T09:00:00").await;
    let id = product["product_id"].as_i64().unwrap();
    app.post(&deliver_uri(id, 3), None).await;
    app.post(&exit_uri(id, 2), None).await;

    let (_, movements) = app.get(&format!("/products/{id}/movements/")).await;
    let entry_id = movements["entries"][0]["entry_id"].as_i64().unwrap();
    let exit_id = movements["exits"][0]["exit_id"].as_i64().unwrap();
    assert_eq!(movements["exits"][0]["historical"], false);

    let (_, txs) = app.get(&format!("/products/{id}/transactions/")).await;
    assert_eq!(txs[0]["related_id"].as_i64(), Some(id));
    assert_eq!(txs[1]["related_id"].as_i64(), Some(entry_id));
    assert_eq!(txs[2]["related_id"].as_i64(), Some(exit_id));
}

#[tokio::test]
async fn missing_product_is_404_and_writes_nothing() {
    let app = TestApp::new();

    let (status, body) = app.post(&exit_uri(42, 1), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");

    let (status, _) = app.post(&deliver_uri(42, 1), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, txs) = app.get("/products/42/transactions/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(txs, json!([]));
}

#[tokio::test]
async fn products_by_dates_joins_deliveries() {
    let app = TestApp::new();
    app.create_product("Cheese", 10, "2024-06-02T10:00:00").await;
    app.create_product("Yogurt", 10, "2024-06-05T10:00:00").await;

    let (status, all) = app.get("/products/").await;
    assert_eq!(status, StatusCode::OK);
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["product_name"], "Cheese");
    assert_eq!(all[0]["delivered_by"], "Truck 4");
    assert_eq!(all[0]["delivery_date_time"], "2024-06-02T10:00:00");

    let (_, some) = app.get("/products/?start_date=2024-06-03&end_date=2024-06-05").await;
    let some = some.as_array().unwrap();
    assert_eq!(some.len(), 1);
    assert_eq!(some[0]["product_name"], "Yogurt");

    let (_, none) = app.get("/products/?end_date=2024-06-01T23:00:00").await;
    assert_eq!(none, json!([]));

    let (status, _) = app.get("/products/?start_date=not-a-date").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_reference_is_internal_error_with_no_rows() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/products/",
            Some(json!({
                "product": {
                    "product_name": "Orphan",
                    "description": "no category",
                    "category_id": 7,
                    "supplier_id": 7,
                    "quantity_in_stock": 3,
                    "date_added": "2024-06-01T08:00:00",
                    "warehouse_id": 7,
                    "unit_price": 2.0
                },
                "delivery_info": {
                    "delivery_date_time": "2024-06-01T08:00:00",
                    "delivered_by": "Truck 1",
                    "recipient_name": "Dock",
                    "recipient_contact": "dock@example.com"
                }
            })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "internal_error");

    let (_, rows) = app.get("/products/").await;
    assert_eq!(rows, json!([]));
}

#[tokio::test]
async fn non_positive_exit_quantity_is_rejected() {
    let app = TestApp::new();
    let product = app.create_product("Cream", 8, "2024-06-01T09:00:00").await;
    let id = product["product_id"].as_i64().unwrap();

    let (status, body) = app.post(&exit_uri(id, 0), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (_, current) = app.get(&format!("/products/{id}")).await;
    assert_eq!(current["quantity_in_stock"], 8);
}

#[tokio::test]
async fn orders_round_trip() {
    let app = TestApp::new();
    let product = app.create_product("Eggs", 12, "2024-06-01T09:00:00").await;
    let id = product["product_id"].as_i64().unwrap();

    let (status, order) = app
        .post(
            "/orders/",
            Some(json!({
                "order_date": "2024-06-03T12:00:00",
                "customer_name": "Bakery",
                "customer_contact": "bakery@example.com",
                "total_amount": 30.0,
                "details": [{ "product_id": id, "quantity": 6, "subtotal": 7.5 }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = order["order_id"].as_i64().unwrap();
    assert_eq!(order["total_amount"], 30.0);

    let (status, fetched) = app.get(&format!("/orders/{order_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["details"][0]["quantity"], 6);

    let (status, _) = app.get("/orders/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_requests_use_the_error_body() {
    let app = TestApp::new();
    let product = app.create_product("Kefir", 4, "2024-06-01T09:00:00").await;
    let id = product["product_id"].as_i64().unwrap();

    let (status, body) = app
        .post(&format!("/products/{id}/exit/?exited_by=Sam&recipient_name=A&recipient_contact=a"), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
    assert!(body["error"].as_str().unwrap().contains("quantity_exited"));

    let (status, body) = app.post("/products/", Some(json!({ "product": {} }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, body) = app.get("/products/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (_, current) = app.get(&format!("/products/{id}")).await;
    assert_eq!(current["quantity_in_stock"], 4);
}
