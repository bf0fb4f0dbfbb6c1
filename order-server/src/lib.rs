//! Tally Order Server - 小微企业订单与库存管理服务
//!
//! # 架构概述
//!
//! 单机边缘部署：HTTP API + 嵌入式数据库，提供以下核心功能：
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储 (商品/订单/客户/运输/用户)
//! - **发货引擎** (`dispatch`): 确认/发货/撤销状态机与库存账本
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **报表** (`reporting`): 销售统计、分类推断、工作簿导出
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! order-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (models + repositories)
//! ├── dispatch/      # 订单工作流引擎 (核心业务规则)
//! ├── reporting/     # 统计与导出
//! ├── invoice/       # 发票渲染
//! └── utils/         # 错误、日志、时间工具
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod dispatch;
pub mod invoice;
pub mod reporting;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use dispatch::{DispatchEngine, DispatchError};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
///
/// 必须在读取 [`Config`] 之前调用。
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(None, log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
  ______      ____
 /_  __/___ _/ / /_  __
  / / / __ `/ / / / / /
 / / / /_/ / / / /_/ /
/_/  \__,_/_/_/\__, /
              /____/
    "#
    );
}
