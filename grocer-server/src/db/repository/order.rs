//! Order Repository
//!
//! Status changes are guarded twice: the in-memory state machine rejects
//! illegal moves, and the UPDATE only matches while the row still holds the
//! status the move was computed from.

use shared::models::{Order, OrderItem, OrderStatus, PreOrder, PreOrderStatus, StatusMachine};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};
use crate::utils::money;

/// Order line to insert
#[derive(Debug, Clone, Copy)]
pub struct NewOrderLine {
    pub product_id: i64,
    pub qty: i64,
    pub unit_price: f64,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "SELECT id, customer_id, status, total, currency, created_at, updated_at FROM orders WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(order)
}

pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_id, qty, unit_price FROM order_item WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Create a pending order with its lines in one transaction
pub async fn create(
    pool: &SqlitePool,
    customer_id: Option<&str>,
    lines: &[NewOrderLine],
) -> RepoResult<Order> {
    if lines.is_empty() {
        return Err(RepoError::Validation("Order must have at least one item".into()));
    }
    let total = money::sum(lines.iter().map(|l| money::line_subtotal(l.qty, l.unit_price)));
    let now = shared::util::now_millis();

    let mut tx = pool.begin().await?;
    let order = sqlx::query_as::<_, Order>(
        "INSERT INTO orders (customer_id, status, total, created_at, updated_at) \
         VALUES (?1, 'pending', ?2, ?3, ?3) \
         RETURNING id, customer_id, status, total, currency, created_at, updated_at",
    )
    .bind(customer_id)
    .bind(total)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    for line in lines {
        sqlx::query(
            "INSERT INTO order_item (order_id, product_id, qty, unit_price) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(order.id)
        .bind(line.product_id)
        .bind(line.qty)
        .bind(line.unit_price)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    Ok(order)
}

/// Move an order to `next`, rejecting transitions the state machine forbids
pub async fn transition_status(
    pool: &SqlitePool,
    id: i64,
    next: OrderStatus,
) -> RepoResult<Order> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id}")))?;
    current.status.transition(next)?;

    let now = shared::util::now_millis();
    let updated = sqlx::query_as::<_, Order>(
        "UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4 \
         RETURNING id, customer_id, status, total, currency, created_at, updated_at",
    )
    .bind(next)
    .bind(now)
    .bind(id)
    .bind(current.status)
    .fetch_optional(pool)
    .await?;

    // Lost a race with another status change
    updated.ok_or_else(|| {
        RepoError::InvalidTransition(shared::models::InvalidTransition {
            from: current.status.as_str(),
            to: next.as_str(),
        })
    })
}

pub async fn find_pre_order(pool: &SqlitePool, id: i64) -> RepoResult<Option<PreOrder>> {
    let pre_order = sqlx::query_as::<_, PreOrder>(
        "SELECT id, customer_id, status, total, currency, created_at, updated_at FROM pre_order WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(pre_order)
}

/// Move a pre-order to `next`
pub async fn transition_pre_order(
    pool: &SqlitePool,
    id: i64,
    next: PreOrderStatus,
) -> RepoResult<PreOrder> {
    let current = find_pre_order(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Pre-order {id}")))?;
    current.status.transition(next)?;

    let now = shared::util::now_millis();
    let updated = sqlx::query_as::<_, PreOrder>(
        "UPDATE pre_order SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4 \
         RETURNING id, customer_id, status, total, currency, created_at, updated_at",
    )
    .bind(next)
    .bind(now)
    .bind(id)
    .bind(current.status)
    .fetch_optional(pool)
    .await?;

    updated.ok_or_else(|| {
        RepoError::InvalidTransition(shared::models::InvalidTransition {
            from: current.status.as_str(),
            to: next.as_str(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::product::{self, NewProduct};
    use crate::db::test_pool;

    async fn seed_product(pool: &SqlitePool) -> i64 {
        let mut conn = pool.acquire().await.unwrap();
        product::insert(
            &mut conn,
            &NewProduct {
                name: "Milk".into(),
                description: None,
                type_id: None,
                cost: 1.0,
                price: 1.5,
                stock: 10,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_order_lifecycle() {
        let pool = test_pool().await;
        let product_id = seed_product(&pool).await;
        let order = create(
            &pool,
            Some("customer-1"),
            &[NewOrderLine {
                product_id,
                qty: 3,
                unit_price: 1.5,
            }],
        )
        .await
        .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, 4.5);
        assert_eq!(order.currency, "USD");
        assert_eq!(find_items(&pool, order.id).await.unwrap().len(), 1);

        let paid = transition_status(&pool, order.id, OrderStatus::Paid).await.unwrap();
        assert_eq!(paid.status, OrderStatus::Paid);

        let err = transition_status(&pool, order.id, OrderStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::InvalidTransition(_)));
        let reloaded = find_by_id(&pool, order.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn test_missing_order() {
        let pool = test_pool().await;
        let err = transition_status(&pool, 1, OrderStatus::Paid).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_order_rejected() {
        let pool = test_pool().await;
        assert!(matches!(
            create(&pool, None, &[]).await.unwrap_err(),
            RepoError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_pre_order_cancel_is_terminal() {
        let pool = test_pool().await;
        let now = shared::util::now_millis();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO pre_order (status, created_at, updated_at) VALUES ('pending', ?1, ?1) RETURNING id",
        )
        .bind(now)
        .fetch_one(&pool)
        .await
        .unwrap();

        let cancelled = transition_pre_order(&pool, id, PreOrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, PreOrderStatus::Cancelled);
        assert!(
            transition_pre_order(&pool, id, PreOrderStatus::Approved)
                .await
                .is_err()
        );
    }
}
