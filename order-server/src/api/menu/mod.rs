//! 菜单 API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/menu | GET | 当前会话租户的可售菜单 | 顾客会话 |

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_guest;
use crate::core::ServerState;

/// Menu router - guest session required
pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route("/api/menu", get(handler::list_menu))
        .route_layer(middleware::from_fn_with_state(state, require_guest))
}
