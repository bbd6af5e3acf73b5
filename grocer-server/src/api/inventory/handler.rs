//! Inventory API Handlers

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::Deserialize;
use shared::models::{
    BulkAdjustmentRequest, BulkAdjustmentResult, InventoryStats, InventoryTransaction, Page,
    Pagination, ProductDetail, StockAdjustmentInput, StockStatus, StockUpdate,
};

use crate::core::ServerState;
use crate::db::repository::inventory as transactions_repo;
use crate::db::repository::product::{self, ProductFilter, ProductSort};
use crate::inventory::{adjustment, report};
use crate::utils::{ApiResponse, AppError, AppResult, json_body, ok, ok_with_message};

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;
const DEFAULT_TRANSACTION_LIMIT: i64 = 100;
const MAX_TRANSACTION_LIMIT: i64 = 1000;

/// Inventory list query; numbers arrive as strings and fall back to defaults
#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub type_id: Option<String>,
    pub stock_status: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

fn parse_i64(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse().ok())
}

impl InventoryQuery {
    fn into_filter(self, low_threshold: i64) -> AppResult<(ProductFilter, Pagination)> {
        let page = parse_i64(self.page.as_deref()).unwrap_or(1).max(1);
        let limit = parse_i64(self.limit.as_deref())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let stock_status = match self.stock_status.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<StockStatus>().map_err(|_| {
                AppError::validation("stock_status must be one of: in_stock, low_stock, out_of_stock")
            })?),
            None => None,
        };

        let pagination = Pagination::new(page, limit, 0);
        let filter = ProductFilter {
            search: self.search,
            type_id: parse_i64(self.type_id.as_deref()),
            stock_status,
            low_threshold,
            sort: ProductSort::parse(self.sort_by.as_deref().unwrap_or_default()),
            descending: self
                .sort_order
                .as_deref()
                .is_some_and(|o| o.eq_ignore_ascii_case("desc")),
            limit,
            offset: pagination.offset(),
        };
        Ok((filter, pagination))
    }
}

/// GET /api/inventory - 分页商品列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<InventoryQuery>,
) -> AppResult<Json<ApiResponse<Page<ProductDetail>>>> {
    let (filter, pagination) = query.into_filter(state.config.low_stock_threshold)?;
    let (data, total) = product::find_page(&state.pool, &filter).await?;
    Ok(ok(Page {
        data,
        pagination: Pagination::new(pagination.page, pagination.limit, total),
    }))
}

/// POST /api/inventory - 单个库存调整
pub async fn adjust(
    State(state): State<ServerState>,
    payload: Result<Json<StockAdjustmentInput>, JsonRejection>,
) -> AppResult<Json<ApiResponse<StockUpdate>>> {
    let input = json_body(payload)?;
    let validated = adjustment::validate(&input)?;
    let new_stock = adjustment::adjust_stock(&state.pool, state.config.audit_mode, &validated).await?;
    Ok(ok_with_message(
        StockUpdate { new_stock },
        "Stock updated successfully",
    ))
}

/// PUT /api/inventory - 批量库存调整
///
/// Reports success even when some items failed; see `errors`.
pub async fn bulk_adjust(
    State(state): State<ServerState>,
    payload: Result<Json<BulkAdjustmentRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<BulkAdjustmentResult>>> {
    let request = json_body(payload)?;
    let result = adjustment::bulk_adjust(
        &state.pool,
        state.config.audit_mode,
        request.adjustments,
        state.config.max_bulk_items,
    )
    .await?;
    let message = result.summary();
    Ok(ok_with_message(result, message))
}

/// GET /api/inventory/stats - 库存统计
pub async fn stats(State(state): State<ServerState>) -> Json<ApiResponse<InventoryStats>> {
    ok(report::inventory_stats(&state.pool, state.config.low_stock_threshold).await)
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    pub product_id: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/inventory/transactions - 库存流水 (最新在前)
pub async fn transactions(
    State(state): State<ServerState>,
    Query(query): Query<TransactionQuery>,
) -> AppResult<Json<ApiResponse<Vec<InventoryTransaction>>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_TRANSACTION_LIMIT)
        .clamp(1, MAX_TRANSACTION_LIMIT);
    let rows = transactions_repo::find_recent(&state.pool, query.product_id, limit).await?;
    Ok(ok(rows))
}
