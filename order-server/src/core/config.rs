/// 服务器配置 - 订单服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATA_DIR | ./data | 数据目录 (数据库文件) |
/// | HTTP_PORT | 8080 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | SESSION_TTL_MS | 3600000 | 访客会话有效期 (毫秒) |
/// | SESSION_SWEEP_INTERVAL_MS | 60000 | 过期会话清理间隔 (毫秒) |
/// | KITCHEN_KEY | dev-kitchen-key | 厨房端共享密钥 |
/// | CASHIER_KEY | dev-cashier-key | 收银端共享密钥 |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时时间 (毫秒) |
///
/// # 示例
///
/// ```ignore
/// DATA_DIR=/var/lib/order-server HTTP_PORT=3000 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 数据目录，存储数据库文件
    pub data_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 访客会话有效期 (毫秒)
    pub session_ttl_ms: i64,
    /// 过期会话清理间隔 (毫秒)
    pub session_sweep_interval_ms: u64,
    /// 厨房端共享密钥 (x-kitchen-key 请求头)
    pub kitchen_key: String,
    /// 收银端共享密钥 (x-cashier-key 请求头)
    pub cashier_key: String,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            session_ttl_ms: std::env::var("SESSION_TTL_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3_600_000),
            session_sweep_interval_ms: std::env::var("SESSION_SWEEP_INTERVAL_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60_000),
            kitchen_key: std::env::var("KITCHEN_KEY").unwrap_or_else(|_| "dev-kitchen-key".into()),
            cashier_key: std::env::var("CASHIER_KEY").unwrap_or_else(|_| "dev-cashier-key".into()),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10_000),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
