//! Sale Model

use serde::{Deserialize, Serialize};

/// Payment method of a walk-in sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentMethod {
    Cash,
    Card,
    Mobile,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Mobile => "mobile",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "mobile" => Ok(Self::Mobile),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// Sale row (immutable once written)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub product_id: i64,
    pub qty: i64,
    pub unit_price: f64,
    /// qty × unit_price, rounded to 2 decimals
    pub subtotal: f64,
    pub payment_method: PaymentMethod,
    pub sold_at: i64,
}

/// Sale joined with product and category names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRecord {
    #[serde(flatten)]
    pub sale: Sale,
    /// `None` when the product row no longer resolves
    pub product_name: Option<String>,
    pub category_name: Option<String>,
}

/// Sale line as received
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleItemInput {
    pub product_id: Option<i64>,
    pub qty: Option<i64>,
    pub unit_price: Option<f64>,
}

/// Validated sale line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaleLine {
    pub product_id: i64,
    pub qty: i64,
    pub unit_price: f64,
}

/// Bulk sale payload (POST /api/sales/bulk)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkSaleRequest {
    pub sales: Option<Vec<SaleItemInput>>,
    pub payment_method: Option<String>,
}

/// Single sale payload (POST /api/sales)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleCreate {
    pub product_id: Option<i64>,
    pub qty: Option<i64>,
    pub unit_price: Option<f64>,
    pub payment_method: Option<String>,
}

/// Bulk sale response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkSaleResult {
    pub success: bool,
    pub sales: Vec<SaleRecord>,
    pub message: String,
}

impl BulkSaleResult {
    pub fn new(sales: Vec<SaleRecord>) -> Self {
        let message = format!("{} items processed successfully", sales.len());
        Self {
            success: true,
            sales,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("cash".parse::<PaymentMethod>(), Ok(PaymentMethod::Cash));
        assert_eq!("mobile".parse::<PaymentMethod>(), Ok(PaymentMethod::Mobile));
        assert!("CASH".parse::<PaymentMethod>().is_err());
        assert!("crypto".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_sale_record_flattens_sale() {
        let record = SaleRecord {
            sale: Sale {
                id: 5,
                product_id: 1,
                qty: 2,
                unit_price: 50.0,
                subtotal: 100.0,
                payment_method: PaymentMethod::Card,
                sold_at: 0,
            },
            product_name: Some("Rice".into()),
            category_name: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["subtotal"], 100.0);
        assert_eq!(json["payment_method"], "card");
        assert_eq!(json["product_name"], "Rice");
    }

    #[test]
    fn test_bulk_result_message() {
        let result = BulkSaleResult::new(Vec::new());
        assert!(result.success);
        assert_eq!(result.message, "0 items processed successfully");
    }
}
