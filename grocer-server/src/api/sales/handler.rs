//! Sales API Handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use shared::models::{BulkSaleRequest, BulkSaleResult, SaleCreate, SaleRecord, TodayStats};

use crate::core::ServerState;
use crate::db::repository::sale;
use crate::inventory::{report, sale as sales};
use crate::utils::{ApiResponse, AppResult, json_body, ok, ok_with_message};

/// Upper bound of the recent sales list
const RECENT_SALES_LIMIT: i64 = 1000;

/// GET /api/sales - 最近销售记录 (最新在前)
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<SaleRecord>>>> {
    let records = sale::find_recent(&state.pool, RECENT_SALES_LIMIT).await?;
    Ok(ok(records))
}

/// POST /api/sales - 单笔销售
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<SaleCreate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<SaleRecord>>)> {
    let request = json_body(payload)?;
    let (line, payment_method) = sales::validate_single(&request)?;
    let record =
        sales::create_sale(&state.pool, state.config.audit_mode, line, payment_method).await?;
    Ok((
        StatusCode::CREATED,
        ok_with_message(record, "Sale recorded successfully"),
    ))
}

/// POST /api/sales/bulk - 批量销售
///
/// All lines are checked against stock before anything is written; a
/// shortfall on any product rejects the whole request.
pub async fn create_bulk(
    State(state): State<ServerState>,
    payload: Result<Json<BulkSaleRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<BulkSaleResult>>> {
    let request = json_body(payload)?;
    let (lines, payment_method) = sales::validate_bulk(request, state.config.max_bulk_items)?;
    let result = sales::process_bulk_sale(&state.pool, &state.config, lines, payment_method).await?;
    let message = result.message.clone();
    Ok(ok_with_message(result, message))
}

/// GET /api/sales/today-stats - 今日销售统计 (业务时区零点起)
pub async fn today_stats(State(state): State<ServerState>) -> Json<ApiResponse<TodayStats>> {
    ok(report::today_stats(&state.pool, state.config.timezone).await)
}
