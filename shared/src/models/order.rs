//! Order / Pre-Order Models (订单与预订单)
//!
//! Statuses are explicit state machines: every status lists the statuses it
//! may move to, and [`StatusMachine::transition`] rejects anything else.
//! Completed and cancelled are terminal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected status change
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot change status from {from} to {to}")]
pub struct InvalidTransition {
    pub from: &'static str,
    pub to: &'static str,
}

/// Status enum with an allowed-transition table
pub trait StatusMachine: Copy + PartialEq + Sized + 'static {
    /// Statuses reachable in one step
    fn allowed_next(&self) -> &'static [Self];

    fn as_str(&self) -> &'static str;

    fn is_terminal(&self) -> bool {
        self.allowed_next().is_empty()
    }

    fn can_transition_to(&self, next: Self) -> bool {
        self.allowed_next().contains(&next)
    }

    fn transition(self, next: Self) -> Result<Self, InvalidTransition> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(InvalidTransition {
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }
}

/// Customer order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    Pending,
    Paid,
    ReadyForPickup,
    Completed,
    Cancelled,
}

impl StatusMachine for OrderStatus {
    fn allowed_next(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Paid, Self::Cancelled],
            Self::Paid => &[Self::ReadyForPickup, Self::Cancelled],
            Self::ReadyForPickup => &[Self::Completed, Self::Cancelled],
            Self::Completed | Self::Cancelled => &[],
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::ReadyForPickup => "ready_for_pickup",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Pre-order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum PreOrderStatus {
    Pending,
    Approved,
    ReadyForPickup,
    Completed,
    Cancelled,
}

impl StatusMachine for PreOrderStatus {
    fn allowed_next(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Approved, Self::Cancelled],
            Self::Approved => &[Self::ReadyForPickup, Self::Cancelled],
            Self::ReadyForPickup => &[Self::Completed, Self::Cancelled],
            Self::Completed | Self::Cancelled => &[],
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::ReadyForPickup => "ready_for_pickup",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Customer order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: Option<String>,
    pub status: OrderStatus,
    pub total: f64,
    pub currency: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub qty: i64,
    pub unit_price: f64,
}

/// Pre-order (reservation of items not yet paid)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PreOrder {
    pub id: i64,
    pub customer_id: Option<String>,
    pub status: PreOrderStatus,
    pub total: f64,
    pub currency: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Pre-order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PreOrderItem {
    pub id: i64,
    pub pre_order_id: i64,
    pub product_id: i64,
    pub qty: i64,
    pub unit_price: f64,
}
