//! Grocer Server - 杂货店 POS 后端
//!
//! # 架构概述
//!
//! 商品目录、库存调整、收银销售和统计报表。所有库存变动都经过同一个
//! 条件更新，库存永远不会为负。
//!
//! - **数据库** (`db`): SQLite (sqlx)，迁移随二进制一起嵌入
//! - **库存核心** (`inventory`): 库存调整、销售对账、流水写入策略
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! grocer-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── inventory/     # 库存和销售业务逻辑
//! ├── db/            # 连接池和仓储层
//! └── utils/         # 错误、日志、金额、时间
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod inventory;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use inventory::AuditMode;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: 加载 .env，初始化日志
///
/// Logging is configured from the same environment variables as [`Config`].
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        return Err(e.into());
    }

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty());
    let log_json = std::env::var("LOG_JSON").is_ok_and(|v| v.trim() == "true");
    init_logger_with_file(log_level.as_deref(), log_json, log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______
  / ____/________  ________  _____
 / / __/ ___/ __ \/ ___/ _ \/ ___/
/ /_/ / /  / /_/ / /__/  __/ /
\____/_/   \____/\___/\___/_/
    "#
    );
}
