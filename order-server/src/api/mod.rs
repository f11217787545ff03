//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`guest`] - 顾客会话接口 (扫码 / 会话检查)
//! - [`menu`] - 菜单查询接口
//! - [`orders`] - 下单和订单状态接口
//! - [`payments`] - 支付接口
//! - [`pickup`] - 取餐接口
//! - [`kitchen`] - 后厨看板接口
//! - [`tables`] - 桌台二维码接口
//! - [`admin`] - 门店数据管理接口

pub mod admin;
pub mod guest;
pub mod health;
pub mod kitchen;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod pickup;
pub mod tables;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the Axum application.
///
/// Protected routers take the state so they can attach their auth
/// middleware at the route level; public routers stay stateless.
pub fn build_app(state: ServerState) -> Router {
    Router::<ServerState>::new()
        // Public
        .merge(health::router())
        .merge(guest::router())
        // Guest session
        .merge(menu::router(state.clone()))
        .merge(orders::router(state.clone()))
        .merge(payments::router(state.clone()))
        // Staff
        .merge(pickup::router(state.clone()))
        .merge(kitchen::router(state.clone()))
        .merge(tables::router(state.clone()))
        .merge(admin::router(state.clone()))
        .with_state(state)
        // Tower HTTP 中间件
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        // HTTP 请求日志中间件
        .layer(middleware::from_fn(log_request))
}
