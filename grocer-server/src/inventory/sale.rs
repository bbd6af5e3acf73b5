//! Walk-in sales
//!
//! A bulk sale first tries a single transaction covering every line. If
//! that fails for any reason it is rolled back and the request is retried
//! on the line-by-line path: one read of every referenced product, a
//! combined shortfall check that rejects the whole request, then one small
//! transaction per line. Both paths decrement with a conditional UPDATE, so
//! stock can never go negative even when the pre-check read is stale.

use std::collections::HashMap;

use shared::models::{
    BulkSaleRequest, BulkSaleResult, NewInventoryTransaction, PaymentMethod, Product, SaleCreate,
    SaleLine, SaleRecord, TransactionType,
};
use sqlx::{SqliteConnection, SqlitePool};

use super::{AuditMode, StockError};
use crate::core::Config;
use crate::db::repository::{RepoError, product, sale};
use crate::utils::money::{MAX_PRICE, require_finite};
use crate::utils::validation::{MAX_QUANTITY, validate_batch_size};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Reference type stored on sale inventory transactions
pub const SALE_REFERENCE: &str = "sale";

fn parse_payment_method(raw: Option<&str>) -> AppResult<PaymentMethod> {
    let raw = raw
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validation("Payment method is required"))?;
    raw.parse()
        .map_err(|_| AppError::new(ErrorCode::PaymentInvalidMethod))
}

fn validate_line(qty: i64, unit_price: f64) -> AppResult<()> {
    require_finite(unit_price, "unit_price")?;
    if qty <= 0 || unit_price < 0.0 {
        return Err(AppError::new(ErrorCode::SaleItemInvalid));
    }
    if qty > MAX_QUANTITY {
        return Err(AppError::with_message(
            ErrorCode::SaleItemInvalid,
            format!("qty must not exceed {MAX_QUANTITY}"),
        ));
    }
    if unit_price > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::SaleItemInvalid,
            format!("unit_price must not exceed {MAX_PRICE}"),
        ));
    }
    Ok(())
}

/// Validate a bulk sale request; the first violation rejects it
pub fn validate_bulk(
    request: BulkSaleRequest,
    max_items: usize,
) -> AppResult<(Vec<SaleLine>, PaymentMethod)> {
    let items = request
        .sales
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::SaleEmpty))?;
    let payment_method = parse_payment_method(request.payment_method.as_deref())?;
    validate_batch_size(items.len(), "sales", max_items)?;

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let (Some(product_id), Some(qty), Some(unit_price)) =
            (item.product_id, item.qty, item.unit_price)
        else {
            return Err(AppError::validation(
                "Each sale must have product_id, qty, and unit_price",
            ));
        };
        validate_line(qty, unit_price)?;
        lines.push(SaleLine {
            product_id,
            qty,
            unit_price,
        });
    }
    Ok((lines, payment_method))
}

/// Validate a single sale request
pub fn validate_single(request: &SaleCreate) -> AppResult<(SaleLine, PaymentMethod)> {
    let (Some(product_id), Some(qty), Some(unit_price), Some(_)) = (
        request.product_id,
        request.qty,
        request.unit_price,
        request.payment_method.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::validation(
            "Missing required fields: product_id, qty, unit_price, payment_method",
        ));
    };
    validate_line(qty, unit_price)?;
    let payment_method = parse_payment_method(request.payment_method.as_deref())?;
    Ok((
        SaleLine {
            product_id,
            qty,
            unit_price,
        },
        payment_method,
    ))
}

fn sale_entry(line: &SaleLine, sale_id: i64) -> NewInventoryTransaction {
    NewInventoryTransaction::new(line.product_id, TransactionType::Sale, -line.qty)
        .with_reference(SALE_REFERENCE, sale_id)
        .with_notes(TransactionType::Sale.default_note(-line.qty))
}

/// Decrement, insert the sale and its audit row in one transaction
///
/// Dropping `conn`'s transaction without commit undoes all of it.
async fn sell_in_tx(
    conn: &mut SqliteConnection,
    line: &SaleLine,
    payment_method: PaymentMethod,
) -> Result<i64, RepoError> {
    product::apply_stock_delta(&mut *conn, line.product_id, -line.qty).await?;
    let sale = sale::insert(&mut *conn, line, payment_method).await?;
    crate::db::repository::inventory::insert(conn, &sale_entry(line, sale.id)).await?;
    Ok(sale.id)
}

/// Every line in one transaction
async fn process_atomic(
    pool: &SqlitePool,
    lines: &[SaleLine],
    payment_method: PaymentMethod,
) -> Result<Vec<SaleRecord>, RepoError> {
    let mut tx = pool.begin().await?;
    let mut sale_ids = Vec::with_capacity(lines.len());
    for line in lines {
        sale_ids.push(sell_in_tx(&mut tx, line, payment_method).await?);
    }
    let records = sale::find_records(&mut tx, &sale_ids).await?;
    tx.commit().await?;
    Ok(records)
}

/// Requested quantity per product, summed over duplicate lines, in first-seen order
fn requested_totals(lines: &[SaleLine]) -> Vec<(i64, i64)> {
    let mut totals: Vec<(i64, i64)> = Vec::new();
    for line in lines {
        match totals.iter_mut().find(|(id, _)| *id == line.product_id) {
            Some((_, qty)) => *qty = qty.saturating_add(line.qty),
            None => totals.push((line.product_id, line.qty)),
        }
    }
    totals
}

fn shortfall_message(product_id: i64, product: Option<&Product>, requested: i64) -> String {
    match product {
        Some(p) => format!(
            "Insufficient stock for {}. Available: {}, Requested: {}",
            p.name, p.stock, requested
        ),
        None => format!("Product {product_id} not found"),
    }
}

/// Check every line against one read of current stock
///
/// Collects all shortfalls into one error.
fn precheck(products: &HashMap<i64, Product>, lines: &[SaleLine]) -> AppResult<()> {
    let mut messages = Vec::new();
    let mut shortfalls = Vec::new();
    for (product_id, requested) in requested_totals(lines) {
        let product = products.get(&product_id);
        let available = product.map(|p| p.stock);
        if available.is_some_and(|stock| stock >= requested) {
            continue;
        }
        messages.push(shortfall_message(product_id, product, requested));
        shortfalls.push(serde_json::json!({
            "product_id": product_id,
            "available": available.unwrap_or(0),
            "requested": requested,
        }));
    }
    if messages.is_empty() {
        return Ok(());
    }
    Err(
        AppError::with_message(ErrorCode::InsufficientStock, messages.join("; "))
            .with_detail("shortfalls", shortfalls),
    )
}

/// Line-by-line path
async fn process_manual(
    pool: &SqlitePool,
    mode: AuditMode,
    lines: &[SaleLine],
    payment_method: PaymentMethod,
) -> AppResult<Vec<SaleRecord>> {
    let ids: Vec<i64> = requested_totals(lines).into_iter().map(|(id, _)| id).collect();
    let products: HashMap<i64, Product> = {
        let mut conn = pool.acquire().await.map_err(RepoError::from)?;
        product::find_by_ids(&mut conn, &ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect()
    };
    precheck(&products, lines)?;

    let mut sale_ids = Vec::with_capacity(lines.len());
    for line in lines {
        let sale_id = sell_line(pool, mode, line, payment_method)
            .await
            .map_err(|e| line_failure(e, line, products.get(&line.product_id)))?;
        sale_ids.push(sale_id);
    }

    let mut conn = pool.acquire().await.map_err(RepoError::from)?;
    Ok(sale::find_records(&mut conn, &sale_ids).await?)
}

/// One line in its own transaction, audit row per `mode`
async fn sell_line(
    pool: &SqlitePool,
    mode: AuditMode,
    line: &SaleLine,
    payment_method: PaymentMethod,
) -> Result<i64, StockError> {
    let mut tx = pool.begin().await?;
    product::apply_stock_delta(&mut tx, line.product_id, -line.qty)
        .await
        .map_err(|e| StockError::from_repo(line.product_id, -line.qty, e))?;
    let sale = sale::insert(&mut tx, line, payment_method)
        .await
        .map_err(|e| StockError::Database(e.to_string()))?;
    let entry = sale_entry(line, sale.id);
    mode.record_in_tx(&mut tx, &entry).await?;
    tx.commit().await?;
    mode.record_after_commit(pool, &entry).await;
    Ok(sale.id)
}

/// A line failing after the pre-check passed: stock moved underneath us
fn line_failure(err: StockError, line: &SaleLine, product: Option<&Product>) -> AppError {
    match err {
        StockError::WouldGoNegative { available, .. } => {
            let name = product.map(|p| p.name.as_str()).unwrap_or("product");
            AppError::with_message(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {name}. Available: {available}, Requested: {}",
                    line.qty
                ),
            )
            .with_detail("product_id", line.product_id)
        }
        StockError::ProductNotFound(id) => AppError::with_message(
            ErrorCode::ProductNotFound,
            format!("Product {id} not found"),
        ),
        other => other.into(),
    }
}

/// Process a validated bulk sale
pub async fn process_bulk_sale(
    pool: &SqlitePool,
    config: &Config,
    lines: Vec<SaleLine>,
    payment_method: PaymentMethod,
) -> AppResult<BulkSaleResult> {
    if config.bulk_sale_atomic {
        match process_atomic(pool, &lines, payment_method).await {
            Ok(records) => {
                tracing::info!(
                    items = records.len(),
                    payment_method = payment_method.as_str(),
                    "Bulk sale committed"
                );
                return Ok(BulkSaleResult::new(records));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Atomic bulk sale failed, falling back to line-by-line processing");
            }
        }
    }

    let records = process_manual(pool, config.audit_mode, &lines, payment_method).await?;
    tracing::info!(
        items = records.len(),
        payment_method = payment_method.as_str(),
        "Bulk sale processed line by line"
    );
    Ok(BulkSaleResult::new(records))
}

/// Record a single walk-in sale
pub async fn create_sale(
    pool: &SqlitePool,
    mode: AuditMode,
    line: SaleLine,
    payment_method: PaymentMethod,
) -> AppResult<SaleRecord> {
    let sale_id = sell_line(pool, mode, &line, payment_method)
        .await
        .map_err(|e| match e {
            StockError::WouldGoNegative { available, .. } => AppError::with_message(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock. Available: {available}, Requested: {}",
                    line.qty
                ),
            )
            .with_detail("available", available)
            .with_detail("requested", line.qty),
            other => other.into(),
        })?;

    let mut conn = pool.acquire().await.map_err(RepoError::from)?;
    sale::find_records(&mut conn, &[sale_id])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::internal(format!("Sale {sale_id} missing after insert")))
}
