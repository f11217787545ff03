//! 后厨看板 API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/kitchen/orders | GET | 未完结订单看板 | 后厨密钥 |

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_kitchen;
use crate::core::ServerState;

/// Kitchen board router - kitchen key required
pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route("/api/kitchen/orders", get(handler::list_orders))
        .route_layer(middleware::from_fn_with_state(state, require_kitchen))
}
