//! 顾客会话 API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/guest/start | POST | 扫码开启会话 | 无 |
//! | /api/guest/check | GET | 会话有效性检查 | 无 (自行解析令牌) |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Guest session router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/guest", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/start", post(handler::start_session))
        .route("/check", get(handler::check_session))
}
