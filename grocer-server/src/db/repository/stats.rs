//! Read-only projections for the dashboard figures

use std::collections::HashMap;

use sqlx::{FromRow, SqlitePool};

use super::RepoResult;

/// Minimal sale projection for windowed aggregation
#[derive(Debug, Clone, FromRow)]
pub struct SaleFigure {
    pub product_id: i64,
    pub qty: i64,
    pub subtotal: f64,
}

/// Stock band counts over live products
#[derive(Debug, Clone, Default, FromRow)]
pub struct StockCounts {
    pub total: i64,
    pub low: i64,
    pub out: i64,
}

/// Sales with `sold_at` in `[start, end)`
pub async fn sales_between(pool: &SqlitePool, start: i64, end: i64) -> RepoResult<Vec<SaleFigure>> {
    let rows = sqlx::query_as::<_, SaleFigure>(
        "SELECT product_id, qty, subtotal FROM sale WHERE sold_at >= ?1 AND sold_at < ?2",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Product names by id, soft-deleted rows included
pub async fn product_names(pool: &SqlitePool, ids: &[i64]) -> RepoResult<HashMap<i64, String>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("SELECT id, name FROM product WHERE id IN ({placeholders})");
    let mut query = sqlx::query_as::<_, (i64, String)>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    Ok(query.fetch_all(pool).await?.into_iter().collect())
}

pub async fn stock_counts(pool: &SqlitePool, low_threshold: i64) -> RepoResult<StockCounts> {
    let counts = sqlx::query_as::<_, StockCounts>(
        "SELECT COUNT(*) AS total, \
         COALESCE(SUM(CASE WHEN stock > 0 AND stock <= ?1 THEN 1 ELSE 0 END), 0) AS low, \
         COALESCE(SUM(CASE WHEN stock = 0 THEN 1 ELSE 0 END), 0) AS out \
         FROM product WHERE is_deleted = 0",
    )
    .bind(low_threshold)
    .fetch_one(pool)
    .await?;
    Ok(counts)
}

/// `(stock, cost)` of every live product, summed by the caller in decimal
pub async fn stock_valuations(pool: &SqlitePool) -> RepoResult<Vec<(i64, f64)>> {
    let rows = sqlx::query_as::<_, (i64, f64)>(
        "SELECT stock, cost FROM product WHERE is_deleted = 0 AND stock > 0",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_empty_database_figures() {
        let pool = test_pool().await;
        let counts = stock_counts(&pool, 10).await.unwrap();
        assert_eq!((counts.total, counts.low, counts.out), (0, 0, 0));
        assert!(sales_between(&pool, 0, i64::MAX).await.unwrap().is_empty());
        assert!(product_names(&pool, &[]).await.unwrap().is_empty());
        assert!(stock_valuations(&pool).await.unwrap().is_empty());
    }
}
