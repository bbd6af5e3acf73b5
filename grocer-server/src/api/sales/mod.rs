//! Sales API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/sales | GET | 最近销售记录 |
//! | /api/sales | POST | 单笔销售 |
//! | /api/sales/bulk | POST | 批量销售 (收银台结账) |
//! | /api/sales/today-stats | GET | 今日销售统计 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sales", sale_routes())
}

fn sale_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/bulk", post(handler::create_bulk))
        .route("/today-stats", get(handler::today_stats))
}
