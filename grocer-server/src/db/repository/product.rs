//! Product Repository
//!
//! Every stock mutation goes through [`apply_stock_delta`], a single
//! conditional UPDATE; there is no read-compute-write path.

use shared::models::{Category, Product, ProductDetail, SellableProduct, StockStatus};
use sqlx::{FromRow, SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult};

const PRODUCT_COLUMNS: &str =
    "p.id, p.name, p.description, p.type_id, p.cost, p.price, p.stock, p.created_at, p.updated_at";

/// Product row joined with its category
#[derive(Debug, FromRow)]
struct ProductRow {
    #[sqlx(flatten)]
    product: Product,
    category_name: Option<String>,
    category_created_at: Option<i64>,
}

impl ProductRow {
    /// Normalise the LEFT JOIN into `Option<Category>`
    fn into_detail(self, low_threshold: i64) -> ProductDetail {
        let category = match (self.product.type_id, self.category_name) {
            (Some(id), Some(name)) => Some(Category {
                id,
                name,
                created_at: self.category_created_at.unwrap_or_default(),
            }),
            _ => None,
        };
        ProductDetail::new(self.product, category, low_threshold)
    }
}

fn joined_select() -> String {
    format!(
        "SELECT {PRODUCT_COLUMNS}, t.name AS category_name, t.created_at AS category_created_at \
         FROM product p LEFT JOIN product_type t ON t.id = p.type_id"
    )
}

/// Columns accepted by the inventory list `sort_by`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    #[default]
    Name,
    Stock,
    Price,
    Cost,
    CreatedAt,
}

impl ProductSort {
    /// Unknown values sort by name
    pub fn parse(value: &str) -> Self {
        match value {
            "stock" => Self::Stock,
            "price" => Self::Price,
            "cost" => Self::Cost,
            "created_at" => Self::CreatedAt,
            _ => Self::Name,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            Self::Name => "p.name",
            Self::Stock => "p.stock",
            Self::Price => "p.price",
            Self::Cost => "p.cost",
            Self::CreatedAt => "p.created_at",
        }
    }
}

/// Inventory list filter
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub type_id: Option<i64>,
    pub stock_status: Option<StockStatus>,
    pub low_threshold: i64,
    pub sort: ProductSort,
    pub descending: bool,
    pub limit: i64,
    pub offset: i64,
}

const FILTER_WHERE: &str = "WHERE p.is_deleted = 0 \
    AND (?1 IS NULL OR p.name LIKE '%' || ?1 || '%' ESCAPE '\\' OR p.description LIKE '%' || ?1 || '%' ESCAPE '\\') \
    AND (?2 IS NULL OR p.type_id = ?2) \
    AND (?3 IS NULL \
         OR (?3 = 'out_of_stock' AND p.stock = 0) \
         OR (?3 = 'low_stock' AND p.stock > 0 AND p.stock <= ?4) \
         OR (?3 = 'in_stock' AND p.stock > ?4))";

/// Escape LIKE wildcards so the search term matches literally
fn like_escape(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Filtered, sorted page of live products plus the filtered total
pub async fn find_page(
    pool: &SqlitePool,
    filter: &ProductFilter,
) -> RepoResult<(Vec<ProductDetail>, i64)> {
    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(like_escape);
    let status = filter.stock_status.map(|s| s.as_str());

    let count_sql = format!("SELECT COUNT(*) FROM product p {FILTER_WHERE}");
    let total: i64 = sqlx::query_scalar(&count_sql)
        .bind(&search)
        .bind(filter.type_id)
        .bind(status)
        .bind(filter.low_threshold)
        .fetch_one(pool)
        .await?;

    let direction = if filter.descending { "DESC" } else { "ASC" };
    let select_sql = format!(
        "{} {FILTER_WHERE} ORDER BY {} {direction}, p.id ASC LIMIT ?5 OFFSET ?6",
        joined_select(),
        filter.sort.column()
    );
    let rows = sqlx::query_as::<_, ProductRow>(&select_sql)
        .bind(&search)
        .bind(filter.type_id)
        .bind(status)
        .bind(filter.low_threshold)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(pool)
        .await?;

    let products = rows
        .into_iter()
        .map(|row| row.into_detail(filter.low_threshold))
        .collect();
    Ok((products, total))
}

/// Live product by id
pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM product p WHERE p.id = ? AND p.is_deleted = 0");
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(product)
}

/// Live product by id with its category resolved
pub async fn find_detail(
    conn: &mut SqliteConnection,
    id: i64,
    low_threshold: i64,
) -> RepoResult<Option<ProductDetail>> {
    let sql = format!("{} WHERE p.id = ? AND p.is_deleted = 0", joined_select());
    let row = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row.map(|r| r.into_detail(low_threshold)))
}

/// Live products for a set of ids, in one query
pub async fn find_by_ids(conn: &mut SqliteConnection, ids: &[i64]) -> RepoResult<Vec<Product>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM product p WHERE p.is_deleted = 0 AND p.id IN ({placeholders})"
    );
    let mut query = sqlx::query_as::<_, Product>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    Ok(query.fetch_all(conn).await?)
}

/// In-stock products for the point-of-sale screen
pub async fn find_sellable(pool: &SqlitePool) -> RepoResult<Vec<SellableProduct>> {
    let products = sqlx::query_as::<_, SellableProduct>(
        "SELECT p.id, p.name, p.price, p.stock, p.type_id, \
         COALESCE(t.name, 'Uncategorized') AS category_name \
         FROM product p LEFT JOIN product_type t ON t.id = p.type_id \
         WHERE p.is_deleted = 0 AND p.stock >= 1 ORDER BY p.name",
    )
    .fetch_all(pool)
    .await?;
    Ok(products)
}

/// Whether another live product already uses `name`
pub async fn name_taken(
    conn: &mut SqliteConnection,
    name: &str,
    exclude_id: Option<i64>,
) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM product WHERE name = ?1 AND is_deleted = 0 AND (?2 IS NULL OR id != ?2)",
    )
    .bind(name)
    .bind(exclude_id)
    .fetch_one(conn)
    .await?;
    Ok(count > 0)
}

/// Insert payload (already validated)
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub type_id: Option<i64>,
    pub cost: f64,
    pub price: f64,
    pub stock: i64,
}

pub async fn insert(conn: &mut SqliteConnection, data: &NewProduct) -> RepoResult<Product> {
    let now = shared::util::now_millis();
    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO product (name, description, type_id, cost, price, stock, is_deleted, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?7) \
         RETURNING id, name, description, type_id, cost, price, stock, created_at, updated_at",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.type_id)
    .bind(data.cost)
    .bind(data.price)
    .bind(data.stock)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(product)
}

/// Editable product fields; stock changes go through [`apply_stock_delta`]
#[derive(Debug, Clone)]
pub struct ProductEdit {
    pub name: String,
    /// `None` keeps the current description
    pub description: Option<String>,
    /// `None` keeps the current category
    pub type_id: Option<i64>,
    pub cost: f64,
    pub price: f64,
}

pub async fn update(conn: &mut SqliteConnection, id: i64, data: &ProductEdit) -> RepoResult<Product> {
    let now = shared::util::now_millis();
    let product = sqlx::query_as::<_, Product>(
        "UPDATE product SET name = ?1, description = COALESCE(?2, description), \
         type_id = COALESCE(?3, type_id), cost = ?4, price = ?5, updated_at = ?6 \
         WHERE id = ?7 AND is_deleted = 0 \
         RETURNING id, name, description, type_id, cost, price, stock, created_at, updated_at",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.type_id)
    .bind(data.cost)
    .bind(data.price)
    .bind(now)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    product.ok_or_else(|| RepoError::NotFound(format!("Product {id}")))
}

/// Apply a signed delta to stock in one statement
///
/// Returns the new stock. Zero rows matched is split into `NotFound` and
/// `StockUnderflow` by a follow-up read.
pub async fn apply_stock_delta(
    conn: &mut SqliteConnection,
    id: i64,
    delta: i64,
) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let new_stock: Option<i64> = sqlx::query_scalar(
        "UPDATE product SET stock = stock + ?1, updated_at = ?2 \
         WHERE id = ?3 AND is_deleted = 0 AND stock + ?1 >= 0 RETURNING stock",
    )
    .bind(delta)
    .bind(now)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(stock) = new_stock {
        return Ok(stock);
    }

    match find_by_id(conn, id).await? {
        Some(product) => Err(RepoError::StockUnderflow {
            product_id: id,
            available: product.stock,
        }),
        None => Err(RepoError::NotFound(format!("Product {id}"))),
    }
}

/// Soft delete: flag the row so every read skips it
///
/// Callers empty the stock first through [`apply_stock_delta`].
pub async fn soft_delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE product SET is_deleted = 1, updated_at = ?1 WHERE id = ?2 AND is_deleted = 0",
    )
    .bind(now)
    .bind(id)
    .execute(conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id}")));
    }
    Ok(())
}
