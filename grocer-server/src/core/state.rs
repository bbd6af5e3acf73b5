use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppError;

/// 服务器状态 - 持有配置和数据库连接池
///
/// `SqlitePool` 内部是 Arc，克隆成本极低。
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置 (不可变)
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
}

impl ServerState {
    /// 创建服务器状态 (手动构造，测试使用)
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        Self { config, pool }
    }

    /// 打开数据库并执行迁移
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_url).await?;
        Ok(Self::new(config.clone(), db.pool))
    }
}
