//! 统一错误处理
//!
//! Re-exports the shared error types and adds the response helpers used by
//! handlers.
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::new(ErrorCode::ProductNotFound))
//!
//! // 返回成功响应
//! Ok(ok_with_message(StockUpdate { new_stock }, "Stock updated successfully"))
//! ```

use axum::Json;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}

/// Unwrap a JSON body, turning a rejection into a validation error
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}
