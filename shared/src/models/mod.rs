//! Data models
//!
//! Shared between grocer-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod category;
pub mod inventory;
pub mod order;
pub mod page;
pub mod product;
pub mod sale;
pub mod stats;

// Re-exports
pub use category::*;
pub use inventory::*;
pub use order::*;
pub use page::*;
pub use product::*;
pub use sale::*;
pub use stats::*;
