//! Inventory Transaction Model (库存流水)
//!
//! Append-only audit trail of stock changes, plus the request and result
//! shapes of the stock adjustment endpoints.

use serde::{Deserialize, Serialize};

/// Reason recorded with a stock change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum TransactionType {
    Restock,
    Adjustment,
    Sale,
    PreOrderDeduction,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restock => "restock",
            Self::Adjustment => "adjustment",
            Self::Sale => "sale",
            Self::PreOrderDeduction => "pre_order_deduction",
        }
    }

    /// Types accepted by the manual stock adjustment endpoints
    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Restock | Self::Adjustment)
    }

    /// Default audit note: `"<type>: +N units"` / `"<type>: -N units"`
    pub fn default_note(&self, quantity_change: i64) -> String {
        let sign = if quantity_change > 0 { "+" } else { "" };
        format!("{}: {}{} units", self.as_str(), sign, quantity_change)
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restock" => Ok(Self::Restock),
            "adjustment" => Ok(Self::Adjustment),
            "sale" => Ok(Self::Sale),
            "pre_order_deduction" => Ok(Self::PreOrderDeduction),
            other => Err(format!("unknown transaction type: {other}")),
        }
    }
}

/// Inventory transaction row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryTransaction {
    pub id: i64,
    pub product_id: i64,
    pub transaction_type: TransactionType,
    /// Signed delta applied to stock
    pub quantity_change: i64,
    pub reference_id: Option<i64>,
    pub reference_type: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
}

/// Inventory transaction to append
#[derive(Debug, Clone)]
pub struct NewInventoryTransaction {
    pub product_id: i64,
    pub transaction_type: TransactionType,
    pub quantity_change: i64,
    pub reference_id: Option<i64>,
    pub reference_type: Option<String>,
    pub notes: Option<String>,
}

impl NewInventoryTransaction {
    pub fn new(product_id: i64, transaction_type: TransactionType, quantity_change: i64) -> Self {
        Self {
            product_id,
            transaction_type,
            quantity_change,
            reference_id: None,
            reference_type: None,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_reference(mut self, reference_type: impl Into<String>, reference_id: i64) -> Self {
        self.reference_type = Some(reference_type.into());
        self.reference_id = Some(reference_id);
        self
    }
}

/// Stock adjustment as received (POST /api/inventory, items of PUT)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockAdjustmentInput {
    pub product_id: Option<i64>,
    pub quantity_change: Option<i64>,
    pub transaction_type: Option<String>,
    pub notes: Option<String>,
}

/// Validated stock adjustment
#[derive(Debug, Clone, PartialEq)]
pub struct StockAdjustment {
    pub product_id: i64,
    pub quantity_change: i64,
    pub transaction_type: TransactionType,
    pub notes: Option<String>,
}

/// Bulk stock adjustment payload (PUT /api/inventory)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkAdjustmentRequest {
    pub adjustments: Option<Vec<StockAdjustmentInput>>,
}

/// New stock value after a single adjustment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdate {
    pub new_stock: i64,
}

/// Succeeded item of a bulk adjustment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentOutcome {
    #[serde(rename = "product_id")]
    pub product_id: i64,
    pub new_stock: i64,
}

/// Failed item of a bulk adjustment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentFailure {
    pub product_id: i64,
    pub error: String,
}

/// Bulk adjustment result: partial success, callers inspect `errors`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkAdjustmentResult {
    pub results: Vec<AdjustmentOutcome>,
    pub errors: Vec<AdjustmentFailure>,
}

impl BulkAdjustmentResult {
    /// `"Processed N adjustments"` with `" with K errors"` when any failed
    pub fn summary(&self) -> String {
        let processed = self.results.len();
        if self.errors.is_empty() {
            format!("Processed {processed} adjustments")
        } else {
            format!(
                "Processed {processed} adjustments with {} errors",
                self.errors.len()
            )
        }
    }
}
