//! Read-only aggregates. On any failure these log and return zeros.

use std::collections::HashMap;

use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::models::{InventoryStats, TodayStats, TopProduct};
use sqlx::SqlitePool;

use crate::db::repository::stats::{self, SaleFigure};
use crate::db::repository::RepoResult;
use crate::utils::money::{to_decimal, to_f64};
use crate::utils::time::today_start_millis;

/// Number of entries in the top products list
pub const TOP_PRODUCTS: usize = 5;

/// Per-product quantity and revenue, ranked by quantity then name
fn rank_products(sales: &[SaleFigure], names: &HashMap<i64, String>) -> Vec<TopProduct> {
    let mut per_product: HashMap<i64, (i64, Decimal)> = HashMap::new();
    for sale in sales {
        let entry = per_product.entry(sale.product_id).or_default();
        entry.0 += sale.qty;
        entry.1 += to_decimal(sale.subtotal);
    }

    let mut ranked: Vec<TopProduct> = per_product
        .into_iter()
        .map(|(product_id, (quantity, revenue))| TopProduct {
            product_id,
            name: names
                .get(&product_id)
                .cloned()
                .unwrap_or_else(|| format!("Product {product_id}")),
            quantity,
            revenue: to_f64(revenue),
        })
        .collect();
    ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(TOP_PRODUCTS);
    ranked
}

/// Aggregate sales in `[start, end)`
pub async fn sales_stats_between(pool: &SqlitePool, start: i64, end: i64) -> RepoResult<TodayStats> {
    let sales = stats::sales_between(pool, start, end).await?;
    if sales.is_empty() {
        return Ok(TodayStats::default());
    }

    let mut product_ids: Vec<i64> = sales.iter().map(|s| s.product_id).collect();
    product_ids.sort_unstable();
    product_ids.dedup();
    let names = stats::product_names(pool, &product_ids).await?;

    let total_sales: Decimal = sales.iter().map(|s| to_decimal(s.subtotal)).sum();
    Ok(TodayStats {
        total_sales: to_f64(total_sales),
        total_items: sales.iter().map(|s| s.qty).sum(),
        total_transactions: sales.len() as i64,
        top_products: rank_products(&sales, &names),
    })
}

/// Sales since local midnight in `tz`
pub async fn today_stats(pool: &SqlitePool, tz: Tz) -> TodayStats {
    let start = today_start_millis(tz);
    let now = shared::util::now_millis() + 1;
    sales_stats_between(pool, start, now)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Today stats failed, returning zeros");
            TodayStats::default()
        })
}

async fn load_inventory_stats(pool: &SqlitePool, low_threshold: i64) -> RepoResult<InventoryStats> {
    let counts = stats::stock_counts(pool, low_threshold).await?;
    let value: Decimal = stats::stock_valuations(pool)
        .await?
        .into_iter()
        .map(|(stock, cost)| Decimal::from(stock) * to_decimal(cost))
        .sum();
    Ok(InventoryStats {
        total_products: counts.total,
        total_stock_value: to_f64(value),
        low_stock_products: counts.low,
        out_of_stock_products: counts.out,
    })
}

/// Catalog-wide stock figures
pub async fn inventory_stats(pool: &SqlitePool, low_threshold: i64) -> InventoryStats {
    load_inventory_stats(pool, low_threshold)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Inventory stats failed, returning zeros");
            InventoryStats::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::product::{self, NewProduct};
    use crate::db::repository::sale;
    use crate::db::test_pool;
    use shared::models::{PaymentMethod, SaleLine};

    async fn seed(pool: &SqlitePool, name: &str, cost: f64, stock: i64) -> i64 {
        let mut conn = pool.acquire().await.unwrap();
        product::insert(
            &mut conn,
            &NewProduct {
                name: name.into(),
                description: None,
                type_id: None,
                cost,
                price: cost * 2.0,
                stock,
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn sell(pool: &SqlitePool, product_id: i64, qty: i64, unit_price: f64) {
        let mut conn = pool.acquire().await.unwrap();
        sale::insert(
            &mut conn,
            &SaleLine {
                product_id,
                qty,
                unit_price,
            },
            PaymentMethod::Cash,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_today_stats_empty_is_zero() {
        let pool = test_pool().await;
        let stats = today_stats(&pool, chrono_tz::UTC).await;
        assert_eq!(stats, TodayStats::default());
    }

    #[tokio::test]
    async fn test_today_stats_totals_and_ranking() {
        let pool = test_pool().await;
        let apple = seed(&pool, "Apple", 0.1, 100).await;
        let pear = seed(&pool, "Pear", 0.2, 100).await;
        let fig = seed(&pool, "Fig", 0.3, 100).await;
        sell(&pool, apple, 3, 0.1).await;
        sell(&pool, pear, 1, 0.2).await;
        sell(&pool, pear, 2, 0.2).await;
        sell(&pool, fig, 1, 0.3).await;

        let stats = today_stats(&pool, chrono_tz::UTC).await;
        assert_eq!(stats.total_transactions, 4);
        assert_eq!(stats.total_items, 7);
        assert_eq!(stats.total_sales, 1.2);
        let names: Vec<_> = stats.top_products.iter().map(|p| p.name.as_str()).collect();
        // Apple and Pear tie on quantity; name breaks the tie
        assert_eq!(names, vec!["Apple", "Pear", "Fig"]);
        assert_eq!(stats.top_products[1].revenue, 0.6);
    }

    #[tokio::test]
    async fn test_inventory_stats_bands_and_value() {
        let pool = test_pool().await;
        seed(&pool, "Empty", 5.0, 0).await;
        seed(&pool, "Low", 0.1, 3).await;
        seed(&pool, "Edge", 1.0, 10).await;
        seed(&pool, "Plenty", 2.5, 11).await;

        let stats = inventory_stats(&pool, 10).await;
        assert_eq!(stats.total_products, 4);
        assert_eq!(stats.out_of_stock_products, 1);
        assert_eq!(stats.low_stock_products, 2);
        assert_eq!(stats.total_stock_value, 37.8);
    }

    #[tokio::test]
    async fn test_stats_swallow_errors() {
        let pool = test_pool().await;
        pool.close().await;
        assert_eq!(inventory_stats(&pool, 10).await, InventoryStats::default());
        assert_eq!(today_stats(&pool, chrono_tz::UTC).await, TodayStats::default());
    }
}
