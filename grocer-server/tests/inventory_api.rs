//! 库存接口集成测试 - 单个调整、批量调整、列表分页、统计、写入策略

mod common;

use common::TestApp;
use grocer_server::AuditMode;
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_adjustment_applies_delta_and_records_transaction() {
    let app = TestApp::new(AuditMode::BestEffort).await;
    let rice = app.create_product("Rice", "Grains", 40.0, 50.0, 10).await;

    let (status, body) = app
        .post(
            "/api/inventory",
            json!({"product_id": rice, "quantity_change": -3, "transaction_type": "adjustment"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["newStock"], 7);
    assert_eq!(body["message"], "Stock updated successfully");
    assert_eq!(app.stock_of(rice).await, 7);

    let (_, body) = app
        .get(&format!("/api/inventory/transactions?product_id={rice}"))
        .await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["quantity_change"], -3);
    assert_eq!(rows[0]["transaction_type"], "adjustment");
    assert_eq!(rows[0]["notes"], "adjustment: -3 units");
}

#[tokio::test]
async fn test_adjustment_below_zero_is_rejected() {
    let app = TestApp::new(AuditMode::BestEffort).await;
    let beans = app.create_product("Beans", "Cans", 1.0, 2.0, 5).await;

    let (status, body) = app
        .post(
            "/api/inventory",
            json!({"product_id": beans, "quantity_change": -8, "transaction_type": "adjustment"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Stock cannot be negative");
    assert_eq!(body["details"]["available"], 5);
    assert_eq!(app.stock_of(beans).await, 5);
    assert_eq!(app.transaction_count(beans).await, 0);
}

#[tokio::test]
async fn test_adjustment_validation() {
    let app = TestApp::new(AuditMode::BestEffort).await;
    let salt = app.create_product("Salt", "Spices", 1.0, 2.0, 5).await;

    let (status, _) = app
        .post("/api/inventory", json!({"product_id": salt, "transaction_type": "restock"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/inventory",
            json!({"product_id": salt, "quantity_change": 3, "transaction_type": "sale"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid transaction type. Must be: restock, adjustment");

    let (status, _) = app
        .post(
            "/api/inventory",
            json!({"product_id": 9999, "quantity_change": 3, "transaction_type": "restock"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.stock_of(salt).await, 5);
}

#[tokio::test]
async fn test_replayed_adjustment_applies_twice() {
    let app = TestApp::new(AuditMode::BestEffort).await;
    let milk = app.create_product("Milk", "Dairy", 1.0, 2.0, 10).await;
    let request = json!({"product_id": milk, "quantity_change": -2, "transaction_type": "adjustment"});

    app.post("/api/inventory", request.clone()).await;
    app.post("/api/inventory", request).await;

    assert_eq!(app.stock_of(milk).await, 6);
    assert_eq!(app.transaction_count(milk).await, 2);
}

#[tokio::test]
async fn test_bulk_adjustment_partial_success() {
    let app = TestApp::new(AuditMode::BestEffort).await;
    let a = app.create_product("Apples", "Fruit", 1.0, 2.0, 4).await;
    let b = app.create_product("Bananas", "Fruit", 1.0, 2.0, 1).await;

    let (status, body) = app
        .put(
            "/api/inventory",
            json!({"adjustments": [
                {"product_id": a, "quantity_change": 6, "transaction_type": "restock"},
                {"product_id": 9999, "quantity_change": 1, "transaction_type": "restock"},
                {"product_id": b, "quantity_change": -5, "transaction_type": "adjustment"},
            ]}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Processed 1 adjustments with 2 errors");
    let results = body["data"]["results"].as_array().unwrap();
    let errors = body["data"]["errors"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["product_id"], a);
    assert_eq!(results[0]["newStock"], 10);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["product_id"], 9999);
    assert_eq!(errors[1]["product_id"], b);
    assert_eq!(errors[1]["error"], "Stock cannot be negative");

    assert_eq!(app.stock_of(a).await, 10);
    assert_eq!(app.stock_of(b).await, 1);
}

#[tokio::test]
async fn test_bulk_adjustment_rejects_before_any_write() {
    let app = TestApp::new(AuditMode::BestEffort).await;
    let a = app.create_product("Apples", "Fruit", 1.0, 2.0, 4).await;

    let (status, _) = app.put("/api/inventory", json!({"adjustments": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .put(
            "/api/inventory",
            json!({"adjustments": [
                {"product_id": a, "quantity_change": 6, "transaction_type": "restock"},
                {"product_id": a, "transaction_type": "restock"},
            ]}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Each adjustment must have product_id, quantity_change, and transaction_type"
    );
    assert_eq!(app.stock_of(a).await, 4);
}

#[tokio::test]
async fn test_strict_audit_rolls_back_stock_when_log_write_fails() {
    let app = TestApp::new(AuditMode::Strict).await;
    let oil = app.create_product("Oil", "Pantry", 3.0, 5.0, 10).await;
    sqlx::query("DROP TABLE inventory_transaction")
        .execute(&app.state.pool)
        .await
        .unwrap();

    let (status, body) = app
        .post(
            "/api/inventory",
            json!({"product_id": oil, "quantity_change": -4, "transaction_type": "adjustment"}),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 9101);
    assert_eq!(app.stock_of(oil).await, 10);
}

#[tokio::test]
async fn test_best_effort_audit_keeps_stock_when_log_write_fails() {
    let app = TestApp::new(AuditMode::BestEffort).await;
    let oil = app.create_product("Oil", "Pantry", 3.0, 5.0, 10).await;
    sqlx::query("DROP TABLE inventory_transaction")
        .execute(&app.state.pool)
        .await
        .unwrap();

    let (status, body) = app
        .post(
            "/api/inventory",
            json!({"product_id": oil, "quantity_change": -4, "transaction_type": "adjustment"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["newStock"], 6);
    assert_eq!(app.stock_of(oil).await, 6);
}

#[tokio::test]
async fn test_inventory_list_filters_and_paginates() {
    let app = TestApp::new(AuditMode::BestEffort).await;
    app.create_product("Brown Rice", "Grains", 1.0, 3.0, 50).await;
    app.create_product("White Rice", "Grains", 1.0, 2.0, 5).await;
    app.create_product("Vinegar", "Pantry", 1.0, 4.0, 0).await;

    let (status, body) = app.get("/api/inventory?page=1&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let page = &body["data"];
    assert_eq!(page["data"].as_array().unwrap().len(), 2);
    assert_eq!(page["pagination"]["total"], 3);
    assert_eq!(page["pagination"]["totalPages"], 2);
    assert_eq!(page["data"][0]["name"], "Brown Rice");
    assert_eq!(page["data"][0]["category"]["name"], "Grains");

    let (_, body) = app.get("/api/inventory?search=rice&sort_by=price&sort_order=desc").await;
    let rows = body["data"]["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "Brown Rice");

    let (_, body) = app.get("/api/inventory?stock_status=low_stock").await;
    let rows = body["data"]["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "White Rice");
    assert_eq!(rows[0]["stock_status"], "low_stock");

    let (_, body) = app.get("/api/inventory?stock_status=out_of_stock").await;
    assert_eq!(body["data"]["data"][0]["name"], "Vinegar");

    let (status, _) = app.get("/api/inventory?stock_status=plenty").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_inventory_stats() {
    let app = TestApp::new(AuditMode::BestEffort).await;
    app.create_product("Flour", "Baking", 2.5, 4.0, 20).await;
    app.create_product("Sugar", "Baking", 1.0, 2.0, 3).await;
    app.create_product("Yeast", "Baking", 1.0, 2.0, 0).await;

    let (status, body) = app.get("/api/inventory/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({
            "totalProducts": 3,
            "totalStockValue": 53.0,
            "lowStockProducts": 1,
            "outOfStockProducts": 1,
        })
    );
}
