//! Category Model (product type)

use serde::{Deserialize, Serialize};

/// Category entity, unique by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
}

/// Display name used when a product has no category
pub const UNCATEGORIZED: &str = "Uncategorized";
