//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use shared::models::{ProductCreate, ProductDetail, ProductUpdate, SellableProduct};

use crate::core::ServerState;
use crate::db::repository::product;
use crate::inventory::catalog;
use crate::utils::{ApiResponse, AppResult, json_body, ok, ok_with_message};

/// POST /api/products - 创建商品 (分类按名称自动创建)
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<ProductCreate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProductDetail>>)> {
    let data = json_body(payload)?;
    let detail = catalog::create_product(&state.pool, state.config.low_stock_threshold, data).await?;
    Ok((
        StatusCode::CREATED,
        ok_with_message(detail, "Product created successfully"),
    ))
}

/// GET /api/products/list - 可售商品 (stock >= 1)
pub async fn list_sellable(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<SellableProduct>>>> {
    let products = product::find_sellable(&state.pool).await?;
    Ok(ok(products))
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let detail = catalog::get_product(&state.pool, state.config.low_stock_threshold, id).await?;
    Ok(ok(detail))
}

/// PUT /api/products/:id - 更新商品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    payload: Result<Json<ProductUpdate>, JsonRejection>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let data = json_body(payload)?;
    let detail = catalog::update_product(
        &state.pool,
        state.config.audit_mode,
        state.config.low_stock_threshold,
        id,
        data,
    )
    .await?;
    Ok(ok_with_message(detail, "Product updated successfully"))
}

/// DELETE /api/products/:id - 软删除商品
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    catalog::delete_product(&state.pool, state.config.audit_mode, id).await?;
    let mut response = ApiResponse::ok();
    response.message = "Product deleted successfully".into();
    Ok(Json(response))
}
