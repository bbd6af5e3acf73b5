use crate::inventory::AuditMode;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_URL | sqlite:grocer.db | 数据库位置 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (unset) | 日志目录 (按天滚动) |
/// | LOG_JSON | false | JSON 格式日志 |
/// | AUDIT_MODE | best_effort | 库存流水写入策略: strict / best_effort |
/// | BULK_SALE_ATOMIC | true | 批量销售是否先走单事务路径 |
/// | LOW_STOCK_THRESHOLD | 10 | 低库存上限 (含) |
/// | TIMEZONE | UTC | 业务时区 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | MAX_BULK_ITEMS | 200 | 批量请求最大条目数 |
///
/// # 示例
///
/// ```ignore
/// AUDIT_MODE=strict HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// sqlx 连接串 (`sqlite:path` 或 `sqlite::memory:`)
    pub database_url: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 日志目录
    pub log_dir: Option<String>,
    /// JSON 格式日志
    pub log_json: bool,
    /// 库存流水写入策略
    pub audit_mode: AuditMode,
    /// 批量销售单事务路径开关
    pub bulk_sale_atomic: bool,
    /// 低库存阈值
    pub low_stock_threshold: i64,
    /// 业务时区 (IANA)
    pub timezone: chrono_tz::Tz,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 批量请求最大条目数
    pub max_bulk_items: usize,
}

/// Read and parse an env var, warning and falling back on bad values
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Invalid config value, using default");
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:grocer.db".into()),
            http_port: env_or("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            log_json: env_or("LOG_JSON", false),
            audit_mode: env_or("AUDIT_MODE", AuditMode::BestEffort),
            bulk_sale_atomic: env_or("BULK_SALE_ATOMIC", true),
            low_stock_threshold: env_or(
                "LOW_STOCK_THRESHOLD",
                shared::models::DEFAULT_LOW_STOCK_THRESHOLD,
            ),
            timezone: env_or("TIMEZONE", chrono_tz::UTC),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 30_000),
            max_bulk_items: env_or("MAX_BULK_ITEMS", 200),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(database_url: impl Into<String>, audit_mode: AuditMode) -> Self {
        let mut config = Self::from_env();
        config.database_url = database_url.into();
        config.audit_mode = audit_mode;
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
