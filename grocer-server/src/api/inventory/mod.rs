//! Inventory API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/inventory | GET | 分页商品列表 (筛选、排序) |
//! | /api/inventory | POST | 单个库存调整 |
//! | /api/inventory | PUT | 批量库存调整 (部分成功) |
//! | /api/inventory/stats | GET | 库存统计 |
//! | /api/inventory/transactions | GET | 库存流水 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/inventory", inventory_routes())
}

fn inventory_routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/",
            get(handler::list)
                .post(handler::adjust)
                .put(handler::bulk_adjust),
        )
        .route("/stats", get(handler::stats))
        .route("/transactions", get(handler::transactions))
}
