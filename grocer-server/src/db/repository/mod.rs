//! Repository Module
//!
//! SQL access for each table. Functions are free-standing and take either a
//! pool or a `&mut SqliteConnection`; the latter run inside the caller's
//! transaction.

pub mod category;
pub mod inventory;
pub mod order;
pub mod product;
pub mod sale;
pub mod stats;

use thiserror::Error;

use crate::utils::{AppError, ErrorCode};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Conditional decrement matched no row because stock would go negative
    #[error("Insufficient stock for product {product_id}: available {available}")]
    StockUnderflow { product_id: i64, available: i64 },

    #[error(transparent)]
    InvalidTransition(#[from] shared::models::InvalidTransition),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
                RepoError::Validation(db_err.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::StockUnderflow {
                product_id,
                available,
            } => AppError::new(ErrorCode::StockNegative)
                .with_detail("product_id", product_id)
                .with_detail("available", available),
            RepoError::InvalidTransition(err) => {
                AppError::with_message(ErrorCode::InvalidStatusTransition, err.to_string())
                    .with_detail("from", err.from)
                    .with_detail("to", err.to)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
