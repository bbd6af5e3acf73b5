//! Product lifecycle: create, edit, soft delete
//!
//! Validation runs before any write. Stock changes made by edits and
//! deletes go through the conditional delta update and leave an
//! `adjustment` row in the inventory trail.

use shared::models::{
    NewInventoryTransaction, ProductCreate, ProductDetail, ProductUpdate, TransactionType,
};
use sqlx::{SqliteConnection, SqlitePool};

use super::{AuditMode, StockError};
use crate::db::repository::product::{NewProduct, ProductEdit};
use crate::db::repository::{RepoError, category, product};
use crate::utils::money::{MAX_PRICE, require_finite};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_quantity,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Shared price rules: finite, non-negative, bounded, price >= cost
fn validate_prices(cost: f64, price: f64) -> AppResult<()> {
    require_finite(cost, "cost")?;
    require_finite(price, "price")?;
    if cost < 0.0 || price < 0.0 {
        return Err(AppError::new(ErrorCode::ProductInvalidPrice));
    }
    if cost > MAX_PRICE || price > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            format!("Cost and price must not exceed {MAX_PRICE}"),
        ));
    }
    if price < cost {
        return Err(AppError::new(ErrorCode::PriceBelowCost));
    }
    Ok(())
}

fn name_exists() -> AppError {
    AppError::new(ErrorCode::ProductNameExists)
}

/// Map a unique-index violation on product name to 409
fn map_duplicate(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(_) => name_exists(),
        other => other.into(),
    }
}

/// Validate a create payload
pub fn validate_create(data: ProductCreate) -> AppResult<(NewProduct, String)> {
    let (Some(name), Some(type_name), Some(cost), Some(price), Some(stock)) =
        (data.name, data.type_name, data.cost, data.price, data.stock)
    else {
        return Err(AppError::validation(
            "Missing required fields: name, type, cost, price, stock",
        ));
    };
    let name = name.trim().to_string();
    let type_name = type_name.trim().to_string();
    if name.is_empty() || type_name.is_empty() {
        return Err(AppError::validation(
            "Missing required fields: name, type, cost, price, stock",
        ));
    }
    validate_required_text(&name, "name", MAX_NAME_LEN)?;
    validate_required_text(&type_name, "type", MAX_NAME_LEN)?;
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    validate_prices(cost, price)?;
    if stock < 0 {
        return Err(AppError::new(ErrorCode::StockNegative));
    }
    validate_quantity(stock, "stock")?;

    Ok((
        NewProduct {
            name,
            description: data.description,
            type_id: None,
            cost,
            price,
            stock,
        },
        type_name,
    ))
}

/// Create a product, creating its category by name when missing
///
/// Category and product are written in one transaction.
pub async fn create_product(
    pool: &SqlitePool,
    low_threshold: i64,
    data: ProductCreate,
) -> AppResult<ProductDetail> {
    let (mut new_product, type_name) = validate_create(data)?;

    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    if product::name_taken(&mut tx, &new_product.name, None).await? {
        return Err(name_exists());
    }
    let category = category::find_or_create(&mut tx, &type_name).await?;
    new_product.type_id = Some(category.id);
    let created = product::insert(&mut tx, &new_product)
        .await
        .map_err(map_duplicate)?;
    tx.commit().await.map_err(RepoError::from)?;

    tracing::info!(
        product_id = created.id,
        name = %created.name,
        category = %category.name,
        stock = created.stock,
        "Product created"
    );
    Ok(ProductDetail::new(created, Some(category), low_threshold))
}

pub async fn get_product(
    pool: &SqlitePool,
    low_threshold: i64,
    id: i64,
) -> AppResult<ProductDetail> {
    let mut conn = pool.acquire().await.map_err(RepoError::from)?;
    product::find_detail(&mut conn, id, low_threshold)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))
}

/// Validate an edit payload; returns the fields and the target stock
pub fn validate_update(data: ProductUpdate) -> AppResult<(ProductEdit, i64)> {
    let (Some(name), Some(cost), Some(price), Some(stock)) =
        (data.name, data.cost, data.price, data.stock)
    else {
        return Err(AppError::validation(
            "Missing required fields: name, cost, price, stock",
        ));
    };
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation(
            "Missing required fields: name, cost, price, stock",
        ));
    }
    validate_required_text(&name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    if stock < 0 {
        return Err(AppError::new(ErrorCode::StockNegative));
    }
    validate_quantity(stock, "stock")?;
    validate_prices(cost, price)?;

    Ok((
        ProductEdit {
            name,
            description: data.description,
            type_id: data.type_id,
            cost,
            price,
        },
        stock,
    ))
}

/// Apply a stock delta inside `conn`'s transaction and stage its audit row
async fn adjust_in_tx(
    conn: &mut SqliteConnection,
    mode: AuditMode,
    product_id: i64,
    delta: i64,
    note: String,
) -> Result<NewInventoryTransaction, StockError> {
    product::apply_stock_delta(&mut *conn, product_id, delta)
        .await
        .map_err(|e| StockError::from_repo(product_id, delta, e))?;
    let entry = NewInventoryTransaction::new(product_id, TransactionType::Adjustment, delta)
        .with_notes(note);
    mode.record_in_tx(conn, &entry).await?;
    Ok(entry)
}

/// Edit a product; a stock change is applied as a delta and audited
pub async fn update_product(
    pool: &SqlitePool,
    mode: AuditMode,
    low_threshold: i64,
    id: i64,
    data: ProductUpdate,
) -> AppResult<ProductDetail> {
    let (edit, target_stock) = validate_update(data)?;

    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    let existing = product::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    if product::name_taken(&mut tx, &edit.name, Some(id)).await? {
        return Err(name_exists());
    }
    if let Some(type_id) = edit.type_id
        && category::find_by_id(&mut tx, type_id).await?.is_none()
    {
        return Err(AppError::new(ErrorCode::CategoryNotFound));
    }
    product::update(&mut tx, id, &edit)
        .await
        .map_err(map_duplicate)?;

    let delta = target_stock - existing.stock;
    let entry = if delta != 0 {
        let note = format!(
            "Product edit: Stock adjusted from {} to {}",
            existing.stock, target_stock
        );
        Some(adjust_in_tx(&mut tx, mode, id, delta, note).await?)
    } else {
        None
    };

    let detail = product::find_detail(&mut tx, id, low_threshold)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    tx.commit().await.map_err(RepoError::from)?;
    if let Some(entry) = entry {
        mode.record_after_commit(pool, &entry).await;
    }

    tracing::info!(product_id = id, stock_delta = delta, "Product updated");
    Ok(detail)
}

/// Soft delete; remaining stock is written off with an audit row
pub async fn delete_product(pool: &SqlitePool, mode: AuditMode, id: i64) -> AppResult<()> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    let existing = product::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    let entry = if existing.stock > 0 {
        let note = format!(
            "Product deleted: {} units removed from inventory",
            existing.stock
        );
        Some(adjust_in_tx(&mut tx, mode, id, -existing.stock, note).await?)
    } else {
        None
    };
    product::soft_delete(&mut tx, id).await?;
    tx.commit().await.map_err(RepoError::from)?;
    if let Some(entry) = entry {
        mode.record_after_commit(pool, &entry).await;
    }

    tracing::info!(product_id = id, removed = existing.stock, "Product deleted");
    Ok(())
}
