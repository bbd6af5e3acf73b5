//! Manual stock adjustments (restock / adjustment)

use shared::models::{
    AdjustmentFailure, AdjustmentOutcome, BulkAdjustmentResult, NewInventoryTransaction,
    StockAdjustment, StockAdjustmentInput, TransactionType,
};
use sqlx::SqlitePool;

use super::{AuditMode, StockError};
use crate::db::repository::product;
use crate::utils::validation::{
    MAX_NOTE_LEN, validate_batch_size, validate_optional_text, validate_quantity,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Required fields present; a zero delta counts as missing
fn has_required_fields(input: &StockAdjustmentInput) -> bool {
    input.product_id.is_some()
        && input.quantity_change.is_some_and(|q| q != 0)
        && input
            .transaction_type
            .as_deref()
            .is_some_and(|t| !t.is_empty())
}

fn parse_manual_type(raw: &str) -> AppResult<TransactionType> {
    raw.parse::<TransactionType>()
        .ok()
        .filter(TransactionType::is_manual)
        .ok_or_else(|| AppError::new(ErrorCode::InvalidTransactionType))
}

/// Validate a single adjustment request
pub fn validate(input: &StockAdjustmentInput) -> AppResult<StockAdjustment> {
    let (Some(product_id), Some(quantity_change), Some(raw_type)) = (
        input.product_id,
        input.quantity_change,
        input.transaction_type.as_deref(),
    ) else {
        return Err(missing_fields());
    };
    if !has_required_fields(input) {
        return Err(missing_fields());
    }
    validate_quantity(quantity_change, "quantity_change")?;
    let transaction_type = parse_manual_type(raw_type)?;
    validate_optional_text(&input.notes, "notes", MAX_NOTE_LEN)?;

    Ok(StockAdjustment {
        product_id,
        quantity_change,
        transaction_type,
        notes: input.notes.clone().filter(|n| !n.trim().is_empty()),
    })
}

fn missing_fields() -> AppError {
    AppError::validation("Missing required fields: product_id, quantity_change, transaction_type")
}

/// Apply one adjustment and record it
///
/// Returns the new stock value.
pub async fn adjust_stock(
    pool: &SqlitePool,
    mode: AuditMode,
    adjustment: &StockAdjustment,
) -> Result<i64, StockError> {
    let StockAdjustment {
        product_id,
        quantity_change,
        transaction_type,
        ..
    } = *adjustment;

    let note = adjustment
        .notes
        .clone()
        .unwrap_or_else(|| transaction_type.default_note(quantity_change));
    let entry = NewInventoryTransaction::new(product_id, transaction_type, quantity_change)
        .with_notes(note);

    let mut tx = pool.begin().await?;
    let new_stock = product::apply_stock_delta(&mut tx, product_id, quantity_change)
        .await
        .map_err(|e| StockError::from_repo(product_id, quantity_change, e))?;
    mode.record_in_tx(&mut tx, &entry).await?;
    tx.commit().await?;
    mode.record_after_commit(pool, &entry).await;

    tracing::info!(
        product_id,
        quantity_change,
        new_stock,
        transaction_type = %transaction_type,
        "Stock adjusted"
    );
    Ok(new_stock)
}

/// Apply a batch of adjustments with partial-success semantics
///
/// The batch is rejected up front only when empty, oversized, or when an
/// item lacks a required field. After that every item is applied on its
/// own, in order, and failures are collected per product.
pub async fn bulk_adjust(
    pool: &SqlitePool,
    mode: AuditMode,
    inputs: Option<Vec<StockAdjustmentInput>>,
    max_items: usize,
) -> AppResult<BulkAdjustmentResult> {
    let inputs = inputs
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::AdjustmentEmpty))?;
    validate_batch_size(inputs.len(), "adjustments", max_items)?;
    if !inputs.iter().all(has_required_fields) {
        return Err(AppError::validation(
            "Each adjustment must have product_id, quantity_change, and transaction_type",
        ));
    }

    let mut result = BulkAdjustmentResult::default();
    for input in &inputs {
        // Checked above
        let product_id = input.product_id.unwrap_or_default();
        let outcome = match validate(input) {
            Ok(adjustment) => adjust_stock(pool, mode, &adjustment)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.message),
        };
        match outcome {
            Ok(new_stock) => result.results.push(AdjustmentOutcome {
                product_id,
                new_stock,
            }),
            Err(error) => {
                tracing::debug!(product_id, %error, "Bulk adjustment item failed");
                result.errors.push(AdjustmentFailure { product_id, error });
            }
        }
    }

    tracing::info!(
        processed = result.results.len(),
        failed = result.errors.len(),
        "Bulk stock adjustment finished"
    );
    Ok(result)
}
