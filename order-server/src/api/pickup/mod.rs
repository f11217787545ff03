//! 取餐 API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/pickup/{token} | GET | 查验取餐码 | 收银密钥 |
//! | /api/pickup/{token}/collect | POST | 交餐 | 收银密钥 |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_cashier;
use crate::core::ServerState;

/// Pickup router - cashier key required
pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route("/api/pickup/{token}", get(handler::lookup))
        .route("/api/pickup/{token}/collect", post(handler::collect))
        .route_layer(middleware::from_fn_with_state(state, require_cashier))
}
