//! Inventory transaction writes under [`AuditMode`]
//!
//! Callers run their stock write in a transaction and call
//! [`AuditMode::record_in_tx`] before commit and
//! [`AuditMode::record_after_commit`] after it. Exactly one of the two
//! writes, depending on the mode.

use shared::models::NewInventoryTransaction;
use sqlx::{SqliteConnection, SqlitePool};

use super::{AuditMode, StockError};
use crate::db::repository::inventory;

impl AuditMode {
    /// Strict mode: append the row inside the caller's transaction
    pub async fn record_in_tx(
        self,
        conn: &mut SqliteConnection,
        entry: &NewInventoryTransaction,
    ) -> Result<(), StockError> {
        if self != AuditMode::Strict {
            return Ok(());
        }
        inventory::insert(conn, entry).await.map_err(|e| {
            tracing::error!(
                product_id = entry.product_id,
                transaction_type = %entry.transaction_type,
                error = %e,
                "Inventory transaction write failed, rolling back"
            );
            StockError::AuditFailed(e.to_string())
        })?;
        Ok(())
    }

    /// Best-effort mode: append the row after the stock write committed
    ///
    /// Failures are logged and swallowed.
    pub async fn record_after_commit(self, pool: &SqlitePool, entry: &NewInventoryTransaction) {
        if self != AuditMode::BestEffort {
            return;
        }
        let result = match pool.acquire().await {
            Ok(mut conn) => inventory::insert(&mut conn, entry).await.map(|_| ()),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            tracing::warn!(
                product_id = entry.product_id,
                transaction_type = %entry.transaction_type,
                quantity_change = entry.quantity_change,
                error = %e,
                "Inventory transaction not recorded"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::product::{self, NewProduct};
    use crate::db::test_pool;
    use shared::models::TransactionType;

    async fn seed(pool: &SqlitePool) -> i64 {
        let mut conn = pool.acquire().await.unwrap();
        product::insert(
            &mut conn,
            &NewProduct {
                name: "Bread".into(),
                description: None,
                type_id: None,
                cost: 1.0,
                price: 2.0,
                stock: 3,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_each_mode_writes_once() {
        let pool = test_pool().await;
        let id = seed(&pool).await;
        let entry = NewInventoryTransaction::new(id, TransactionType::Restock, 1);

        for mode in [AuditMode::Strict, AuditMode::BestEffort] {
            let mut tx = pool.begin().await.unwrap();
            mode.record_in_tx(&mut tx, &entry).await.unwrap();
            tx.commit().await.unwrap();
            mode.record_after_commit(&pool, &entry).await;
        }

        assert_eq!(inventory::count_for_product(&pool, id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_strict_failure_is_reported() {
        let pool = test_pool().await;
        // No such product: the foreign key rejects the row
        let entry = NewInventoryTransaction::new(404, TransactionType::Adjustment, -1);

        let mut tx = pool.begin().await.unwrap();
        let err = AuditMode::Strict
            .record_in_tx(&mut tx, &entry)
            .await
            .unwrap_err();
        assert!(matches!(err, StockError::AuditFailed(_)));
        drop(tx);

        // Best effort swallows the same failure
        AuditMode::BestEffort.record_after_commit(&pool, &entry).await;
    }
}
