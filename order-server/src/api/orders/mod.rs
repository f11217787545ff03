//! 订单 API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/orders | POST | 下单 | 顾客会话 |
//! | /api/orders/{id} | GET | 查询自己的订单 | 顾客会话 |
//! | /api/orders/{id}/status | PATCH | 推进订单状态 | 后厨密钥 |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::auth::{require_guest, require_kitchen};
use crate::core::ServerState;

/// Order router
pub fn router(state: ServerState) -> Router<ServerState> {
    let guest_routes = Router::new()
        .route("/api/orders", post(handler::create_order))
        .route("/api/orders/{id}", get(handler::get_order))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_guest,
        ));

    let kitchen_routes = Router::new()
        .route("/api/orders/{id}/status", patch(handler::update_status))
        .route_layer(middleware::from_fn_with_state(state, require_kitchen));

    guest_routes.merge(kitchen_routes)
}
