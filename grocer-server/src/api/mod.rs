//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`products`] - 商品管理接口
//! - [`product_types`] - 商品分类接口
//! - [`inventory`] - 库存列表、调整和统计
//! - [`sales`] - 销售记录和统计

pub mod health;
pub mod inventory;
pub mod product_types;
pub mod products;
pub mod sales;
