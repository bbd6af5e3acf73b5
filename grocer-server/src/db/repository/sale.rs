//! Sale Repository

use shared::models::{PaymentMethod, Sale, SaleLine, SaleRecord};
use sqlx::{FromRow, SqliteConnection, SqlitePool};

use super::RepoResult;
use crate::utils::money;

#[derive(Debug, FromRow)]
struct SaleRow {
    #[sqlx(flatten)]
    sale: Sale,
    product_name: Option<String>,
    category_name: Option<String>,
}

impl From<SaleRow> for SaleRecord {
    fn from(row: SaleRow) -> Self {
        SaleRecord {
            sale: row.sale,
            product_name: row.product_name,
            category_name: row.category_name,
        }
    }
}

/// Insert a sale row; `subtotal` is computed here with decimal rounding
pub async fn insert(
    conn: &mut SqliteConnection,
    line: &SaleLine,
    payment_method: PaymentMethod,
) -> RepoResult<Sale> {
    let now = shared::util::now_millis();
    let subtotal = money::line_subtotal(line.qty, line.unit_price);
    let sale = sqlx::query_as::<_, Sale>(
        "INSERT INTO sale (product_id, qty, unit_price, subtotal, payment_method, sold_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
         RETURNING id, product_id, qty, unit_price, subtotal, payment_method, sold_at",
    )
    .bind(line.product_id)
    .bind(line.qty)
    .bind(line.unit_price)
    .bind(subtotal)
    .bind(payment_method)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(sale)
}

const RECORD_SELECT: &str = "SELECT s.id, s.product_id, s.qty, s.unit_price, s.subtotal, s.payment_method, s.sold_at, \
     p.name AS product_name, t.name AS category_name \
     FROM sale s \
     LEFT JOIN product p ON p.id = s.product_id \
     LEFT JOIN product_type t ON t.id = p.type_id";

/// Sale history, newest first, with product and category names
pub async fn find_recent(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<SaleRecord>> {
    let sql = format!("{RECORD_SELECT} ORDER BY s.sold_at DESC, s.id DESC LIMIT ?");
    let rows = sqlx::query_as::<_, SaleRow>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(SaleRecord::from).collect())
}

/// Records for the given sale ids, in id order
pub async fn find_records(conn: &mut SqliteConnection, ids: &[i64]) -> RepoResult<Vec<SaleRecord>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("{RECORD_SELECT} WHERE s.id IN ({placeholders}) ORDER BY s.id");
    let mut query = sqlx::query_as::<_, SaleRow>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    let rows = query.fetch_all(conn).await?;
    Ok(rows.into_iter().map(SaleRecord::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{category, product};
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_insert_computes_subtotal_and_joins_names() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let grains = category::find_or_create(&mut conn, "Grains").await.unwrap();
        let rice = product::insert(
            &mut conn,
            &product::NewProduct {
                name: "Rice".into(),
                description: None,
                type_id: Some(grains.id),
                cost: 0.05,
                price: 0.1,
                stock: 10,
            },
        )
        .await
        .unwrap();

        let sale = insert(
            &mut conn,
            &SaleLine {
                product_id: rice.id,
                qty: 3,
                unit_price: 0.1,
            },
            PaymentMethod::Cash,
        )
        .await
        .unwrap();
        assert_eq!(sale.subtotal, 0.3);
        drop(conn);

        let records = find_recent(&pool, 1000).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].product_name.as_deref(), Some("Rice"));
        assert_eq!(records[0].category_name.as_deref(), Some("Grains"));
        assert_eq!(records[0].sale.payment_method, PaymentMethod::Cash);
    }
}
