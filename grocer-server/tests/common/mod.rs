//! In-process test harness: fresh in-memory database per test, requests
//! driven through the full router with `oneshot`.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use grocer_server::core::app;
use grocer_server::db::DbService;
use grocer_server::{AuditMode, Config, ServerState};

pub struct TestApp {
    pub router: Router,
    pub state: ServerState,
}

impl TestApp {
    pub async fn new(audit_mode: AuditMode) -> Self {
        Self::with_config(|config| config.audit_mode = audit_mode).await
    }

    pub async fn with_config(configure: impl FnOnce(&mut Config)) -> Self {
        let mut config = Config::with_overrides("sqlite::memory:", AuditMode::BestEffort);
        config.bulk_sale_atomic = true;
        config.low_stock_threshold = 10;
        config.max_bulk_items = 200;
        config.request_timeout_ms = 30_000;
        config.timezone = chrono_tz::UTC;
        configure(&mut config);

        let db = DbService::new(&config.database_url).await.unwrap();
        let state = ServerState::new(config, db.pool);
        Self {
            router: app(state.clone()),
            state,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Create a product and return its id
    pub async fn create_product(&self, name: &str, category: &str, cost: f64, price: f64, stock: i64) -> i64 {
        let (status, body) = self
            .post(
                "/api/products",
                serde_json::json!({
                    "name": name,
                    "type": category,
                    "cost": cost,
                    "price": price,
                    "stock": stock,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create {name} failed: {body}");
        body["data"]["id"].as_i64().unwrap()
    }

    pub async fn stock_of(&self, product_id: i64) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT stock FROM product WHERE id = ?1")
            .bind(product_id)
            .fetch_one(&self.state.pool)
            .await
            .unwrap()
    }

    pub async fn transaction_count(&self, product_id: i64) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM inventory_transaction WHERE product_id = ?1",
        )
        .bind(product_id)
        .fetch_one(&self.state.pool)
        .await
        .unwrap()
    }

    pub async fn sale_count(&self) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sale")
            .fetch_one(&self.state.pool)
            .await
            .unwrap()
    }
}
