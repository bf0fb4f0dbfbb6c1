//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`AppResult`] - 应用错误类型
//! - [`logger`] - tracing 初始化
//! - [`time`] - 业务时区时间换算

pub mod error;
pub mod logger;
pub mod result;
pub mod time;

pub use error::{AppError, AppResponse};
pub use result::AppResult;
