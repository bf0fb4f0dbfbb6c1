//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`products`] - 商品与库存管理接口
//! - [`customers`] - 客户管理接口
//! - [`transports`] - 运输公司管理接口
//! - [`orders`] - 订单与发货工作流接口
//! - [`statistics`] - 销售统计与导出接口
//! - [`uploads`] - 文件上传接口

pub mod auth;
pub mod customers;
pub mod health;
pub mod orders;
pub mod products;
pub mod statistics;
pub mod transports;
pub mod uploads;

use axum::Router;

use crate::core::ServerState;

/// Assemble the full application router
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(products::router())
        .merge(customers::router())
        .merge(transports::router())
        .merge(orders::router())
        .merge(statistics::router())
        .merge(uploads::router())
}
