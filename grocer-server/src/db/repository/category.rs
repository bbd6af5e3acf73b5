//! Category Repository (product_type)

use shared::models::Category;
use sqlx::{SqliteConnection, SqlitePool};

use super::RepoResult;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, name, created_at FROM product_type ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, created_at FROM product_type WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(category)
}

/// Exact, case-sensitive name match
pub async fn find_by_name(conn: &mut SqliteConnection, name: &str) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, created_at FROM product_type WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(conn)
    .await?;
    Ok(category)
}

/// Resolve a category by name, creating it when missing
pub async fn find_or_create(conn: &mut SqliteConnection, name: &str) -> RepoResult<Category> {
    if let Some(existing) = find_by_name(&mut *conn, name).await? {
        return Ok(existing);
    }

    let now = shared::util::now_millis();
    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO product_type (name, created_at) VALUES (?1, ?2) RETURNING id, name, created_at",
    )
    .bind(name)
    .bind(now)
    .fetch_one(conn)
    .await?;
    tracing::info!(category_id = category.id, name, "Category created");
    Ok(category)
}
