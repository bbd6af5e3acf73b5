//! 库存核心 - stock reconciliation
//!
//! Every operation that changes `product.stock` lives here:
//!
//! - [`adjustment`] - single and bulk manual adjustments (partial success)
//! - [`sale`] - single and bulk walk-in sales (all-or-nothing pre-check)
//! - [`catalog`] - product create / edit / soft delete
//! - [`report`] - read-only aggregates
//! - [`audit`] - inventory transaction writes under the configured [`AuditMode`]
//!
//! Stock is only ever changed through
//! [`product::apply_stock_delta`](crate::db::repository::product::apply_stock_delta).

pub mod adjustment;
pub mod audit;
pub mod catalog;
pub mod report;
pub mod sale;

use thiserror::Error;

use crate::db::repository::RepoError;
use crate::utils::{AppError, ErrorCode};

/// Audit trail durability
///
/// - `Strict`: stock write and transaction row commit together; an audit
///   failure fails the request.
/// - `BestEffort`: stock write commits first; an audit failure is logged
///   and swallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuditMode {
    Strict,
    #[default]
    BestEffort,
}

impl AuditMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::BestEffort => "best_effort",
        }
    }
}

impl std::fmt::Display for AuditMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuditMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "best_effort" | "best-effort" => Ok(Self::BestEffort),
            other => Err(format!("unknown audit mode: {other}")),
        }
    }
}

/// Failure of a single stock mutation
#[derive(Debug, Error)]
pub enum StockError {
    #[error("Product not found")]
    ProductNotFound(i64),

    #[error("Stock cannot be negative")]
    WouldGoNegative {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    #[error("Failed to record inventory transaction")]
    AuditFailed(String),

    #[error("Failed to update stock")]
    Database(String),
}

impl StockError {
    /// Attach the requested delta to a repository failure
    pub fn from_repo(product_id: i64, delta: i64, err: RepoError) -> Self {
        match err {
            RepoError::NotFound(_) => Self::ProductNotFound(product_id),
            RepoError::StockUnderflow { available, .. } => Self::WouldGoNegative {
                product_id,
                available,
                requested: delta.saturating_neg(),
            },
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for StockError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<StockError> for AppError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::ProductNotFound(id) => {
                AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", id)
            }
            StockError::WouldGoNegative {
                product_id,
                available,
                requested,
            } => AppError::new(ErrorCode::StockNegative)
                .with_detail("product_id", product_id)
                .with_detail("available", available)
                .with_detail("requested", requested),
            StockError::AuditFailed(msg) => {
                AppError::with_message(ErrorCode::AuditWriteFailed, msg)
            }
            StockError::Database(msg) => AppError::database(msg),
        }
    }
}
