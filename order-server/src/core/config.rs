use std::path::{Path, PathBuf};

use crate::auth::JwtConfig;

/// 服务器配置 - 所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/tally/server | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | TIMEZONE | UTC | 业务时区 (报表月份/日期窗口) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/tally HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志、上传文件、导出文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 业务时区
    pub timezone: chrono_tz::Tz,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/tally/server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|tz| tz.parse().ok())
                .unwrap_or(chrono_tz::UTC),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    // === 工作目录结构 ===

    pub fn database_dir(&self) -> PathBuf {
        Path::new(&self.work_dir).join("database")
    }

    pub fn logs_dir(&self) -> PathBuf {
        Path::new(&self.work_dir).join("logs")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        Path::new(&self.work_dir).join("uploads")
    }

    pub fn exports_dir(&self) -> PathBuf {
        Path::new(&self.work_dir).join("exports")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        for dir in [
            self.database_dir(),
            self.logs_dir(),
            self.uploads_dir(),
            self.exports_dir(),
        ] {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
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
