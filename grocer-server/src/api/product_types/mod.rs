//! Product type (category) API

use axum::{Json, Router, extract::State, routing::get};
use shared::models::Category;

use crate::core::ServerState;
use crate::db::repository::category;
use crate::utils::{ApiResponse, AppResult, ok};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/product-types", get(list))
}

/// GET /api/product-types - 全部分类，按名称排序
async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let categories = category::find_all(&state.pool).await?;
    Ok(ok(categories))
}
