//! Inventory Transaction Repository (append-only)

use shared::models::{InventoryTransaction, NewInventoryTransaction};
use sqlx::{SqliteConnection, SqlitePool};

use super::RepoResult;

pub async fn insert(
    conn: &mut SqliteConnection,
    data: &NewInventoryTransaction,
) -> RepoResult<InventoryTransaction> {
    let now = shared::util::now_millis();
    let row = sqlx::query_as::<_, InventoryTransaction>(
        "INSERT INTO inventory_transaction \
         (product_id, transaction_type, quantity_change, reference_id, reference_type, notes, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
         RETURNING id, product_id, transaction_type, quantity_change, reference_id, reference_type, notes, created_at",
    )
    .bind(data.product_id)
    .bind(data.transaction_type)
    .bind(data.quantity_change)
    .bind(data.reference_id)
    .bind(&data.reference_type)
    .bind(&data.notes)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

/// Newest first, optionally narrowed to one product
pub async fn find_recent(
    pool: &SqlitePool,
    product_id: Option<i64>,
    limit: i64,
) -> RepoResult<Vec<InventoryTransaction>> {
    let rows = sqlx::query_as::<_, InventoryTransaction>(
        "SELECT id, product_id, transaction_type, quantity_change, reference_id, reference_type, notes, created_at \
         FROM inventory_transaction WHERE (?1 IS NULL OR product_id = ?1) \
         ORDER BY created_at DESC, id DESC LIMIT ?2",
    )
    .bind(product_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count_for_product(pool: &SqlitePool, product_id: i64) -> RepoResult<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM inventory_transaction WHERE product_id = ?")
            .bind(product_id)
            .fetch_one(pool)
            .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::product::{self, NewProduct};
    use crate::db::test_pool;
    use shared::models::TransactionType;

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let p = product::insert(
            &mut conn,
            &NewProduct {
                name: "Eggs".into(),
                description: None,
                type_id: None,
                cost: 5.0,
                price: 7.5,
                stock: 12,
            },
        )
        .await
        .unwrap();

        let row = insert(
            &mut conn,
            &NewInventoryTransaction::new(p.id, TransactionType::Sale, -2)
                .with_reference("sale", 42)
                .with_notes("sold"),
        )
        .await
        .unwrap();
        assert_eq!(row.transaction_type, TransactionType::Sale);
        assert_eq!(row.reference_id, Some(42));
        drop(conn);

        let rows = find_recent(&pool, Some(p.id), 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity_change, -2);
        assert_eq!(count_for_product(&pool, p.id).await.unwrap(), 1);
        assert!(find_recent(&pool, Some(p.id + 1), 10).await.unwrap().is_empty());
    }
}
