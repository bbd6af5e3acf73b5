//! Shared types for the grocer service
//!
//! Error codes, the API response envelope, data models and small
//! utilities used by the server and its clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
