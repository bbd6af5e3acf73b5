//! Aggregation read models

use serde::{Deserialize, Serialize};

/// Product ranked by quantity sold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: i64,
    pub name: String,
    pub quantity: i64,
    pub revenue: f64,
}

/// Sales since local midnight
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayStats {
    pub total_sales: f64,
    pub total_items: i64,
    pub total_transactions: i64,
    pub top_products: Vec<TopProduct>,
}

/// Catalog-wide stock figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_products: i64,
    /// Σ stock × cost, rounded to 2 decimals
    pub total_stock_value: f64,
    pub low_stock_products: i64,
    pub out_of_stock_products: i64,
}
