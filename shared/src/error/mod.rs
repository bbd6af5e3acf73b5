//! Unified error system for the grocer service
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Sale errors
//! - 6xxx: Product & inventory errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::StockNegative);
//!
//! let err = AppError::with_message(ErrorCode::InsufficientStock, "Insufficient stock. Available: 0, Requested: 1")
//!     .with_detail("available", 0)
//!     .with_detail("requested", 1);
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(5201));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
