use std::path::PathBuf;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::repository::UserRepository;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是顶层拥有的、可注入的应用状态对象：配置、数据库句柄、
/// JWT 服务都从这里流向 handler。使用 Arc/浅拷贝共享，clone 成本极低。
/// Handler 不持有任何跨请求的数据镜像 — 每个请求通过 repository 读取
/// 当前状态，变更后的"刷新"就是下一次读取。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造，测试常用)
    pub fn new(config: Config, db: Surreal<Db>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            db,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/tally.db)
    /// 3. JWT 服务
    /// 4. 默认管理员 (user 表为空时)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        // 0. Ensure work_dir structure exists
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        // 1. Initialize DB
        let db = crate::db::open(&config.database_dir())
            .await
            .expect("Failed to initialize database");

        // 2. Initialize services
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let state = Self::new(config.clone(), db, jwt_service);

        // 3. Seed default admin on first start
        if let Err(e) = UserRepository::new(state.db.clone())
            .ensure_default_admin()
            .await
        {
            tracing::error!(error = %e, "Failed to seed default admin user");
        }

        state
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }
}
