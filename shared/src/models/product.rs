//! Product Model

use serde::{Deserialize, Serialize};

use super::category::Category;

/// Default upper bound (inclusive) of the low-stock band
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Product entity
///
/// `stock` never goes negative; the table carries a CHECK constraint and
/// every mutation is a conditional update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Category reference (product_type.id)
    pub type_id: Option<i64>,
    pub cost: f64,
    pub price: f64,
    pub stock: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Derived display status of a product's stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// `out_of_stock` at 0, `low_stock` for 1..=threshold, `in_stock` above
    pub fn from_stock(stock: i64, low_threshold: i64) -> Self {
        if stock <= 0 {
            Self::OutOfStock
        } else if stock <= low_threshold {
            Self::LowStock
        } else {
            Self::InStock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "in_stock",
            Self::LowStock => "low_stock",
            Self::OutOfStock => "out_of_stock",
        }
    }
}

impl std::str::FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_stock" => Ok(Self::InStock),
            "low_stock" => Ok(Self::LowStock),
            "out_of_stock" => Ok(Self::OutOfStock),
            other => Err(format!("unknown stock status: {other}")),
        }
    }
}

/// Product with its category resolved and stock status derived
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    /// `None` when the product has no category
    pub category: Option<Category>,
    pub stock_status: StockStatus,
}

impl ProductDetail {
    pub fn new(product: Product, category: Option<Category>, low_threshold: i64) -> Self {
        let stock_status = StockStatus::from_stock(product.stock, low_threshold);
        Self {
            product,
            category,
            stock_status,
        }
    }
}

/// Create product payload
///
/// Fields are optional so that missing ones are reported with a
/// domain message instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: Option<String>,
    /// Category name, created on demand
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub description: Option<String>,
    pub cost: Option<f64>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Category id; absent keeps the current one
    pub type_id: Option<i64>,
    pub cost: Option<f64>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

/// Entry of the sellable product list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SellableProduct {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub type_id: Option<i64>,
    pub category_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_bands() {
        assert_eq!(StockStatus::from_stock(0, 10), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_stock(1, 10), StockStatus::LowStock);
        assert_eq!(StockStatus::from_stock(10, 10), StockStatus::LowStock);
        assert_eq!(StockStatus::from_stock(11, 10), StockStatus::InStock);
    }

    #[test]
    fn test_stock_status_parse() {
        assert_eq!("low_stock".parse::<StockStatus>(), Ok(StockStatus::LowStock));
        assert!("low".parse::<StockStatus>().is_err());
    }

    #[test]
    fn test_product_detail_flattens() {
        let detail = ProductDetail::new(
            Product {
                id: 1,
                name: "Rice".into(),
                description: None,
                type_id: None,
                cost: 40.0,
                price: 50.0,
                stock: 3,
                created_at: 0,
                updated_at: 0,
            },
            None,
            DEFAULT_LOW_STOCK_THRESHOLD,
        );
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["name"], "Rice");
        assert_eq!(json["stock_status"], "low_stock");
        assert!(json["category"].is_null());
    }

    #[test]
    fn test_product_create_reads_type_field() {
        let payload: ProductCreate =
            serde_json::from_str(r#"{"name":"Rice","type":"Grains","cost":1,"price":2,"stock":3}"#)
                .unwrap();
        assert_eq!(payload.type_name.as_deref(), Some("Grains"));
        assert!(payload.description.is_none());
    }
}
