use std::path::PathBuf;
use std::sync::Arc;

use crate::core::Config;
use crate::db;
use crate::directory::DirectoryStore;
use crate::guest::SessionStore;
use crate::orders::{OrderStorage, OrdersManager};
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是订单服务的核心数据结构，持有所有存储和服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | directory | DirectoryStore | 租户/桌台/菜单目录 |
/// | sessions | SessionStore | 访客会话 |
/// | orders | Arc<OrdersManager> | 订单生命周期管理 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 租户目录存储
    pub directory: DirectoryStore,
    /// 访客会话存储
    pub sessions: SessionStore,
    /// 订单管理器
    pub orders: Arc<OrdersManager>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 数据目录 (确保存在)
    /// 2. 数据库 (data_dir/orders.redb)
    /// 3. 各存储 (Directory, Session, OrderStorage) 与订单管理器
    pub fn initialize(config: &Config) -> Result<Self, AppError> {
        let data_dir = PathBuf::from(&config.data_dir);
        std::fs::create_dir_all(&data_dir)
            .map_err(|e| AppError::Internal(format!("Failed to create data dir: {}", e)))?;

        let db = db::open(data_dir.join("orders.redb"))?;
        Self::with_database(config, db)
    }

    /// 使用内存数据库初始化 (用于测试)
    pub fn initialize_in_memory(config: &Config) -> Result<Self, AppError> {
        let db = db::open_in_memory()?;
        Self::with_database(config, db)
    }

    fn with_database(config: &Config, db: Arc<redb::Database>) -> Result<Self, AppError> {
        let directory = DirectoryStore::new(db.clone())?;
        let sessions = SessionStore::new(db.clone())?;
        let storage = OrderStorage::new(db)?;
        let orders = Arc::new(OrdersManager::new(storage, directory.clone()));

        Ok(Self {
            config: config.clone(),
            directory,
            sessions,
            orders,
        })
    }
}
