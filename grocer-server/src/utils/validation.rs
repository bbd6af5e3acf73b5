//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category
pub const MAX_NAME_LEN: usize = 100;

/// Notes, descriptions
pub const MAX_NOTE_LEN: usize = 500;

// ── Quantity limits ─────────────────────────────────────────────────

/// Magnitude cap for stock levels and quantities in a single request
pub const MAX_QUANTITY: i64 = 1_000_000_000;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

/// Reject quantities whose magnitude exceeds [`MAX_QUANTITY`]
pub fn validate_quantity(value: i64, field: &str) -> Result<(), AppError> {
    if value.unsigned_abs() > MAX_QUANTITY as u64 {
        return Err(AppError::validation(format!(
            "{field} must be between -{MAX_QUANTITY} and {MAX_QUANTITY}"
        )));
    }
    Ok(())
}

/// Reject batches above the configured item limit
pub fn validate_batch_size(len: usize, field: &str, max_items: usize) -> Result<(), AppError> {
    if len > max_items {
        return Err(AppError::validation(format!(
            "{field} has too many items ({len}, max {max_items})"
        )));
    }
    Ok(())
}
