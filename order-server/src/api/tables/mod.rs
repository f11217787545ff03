//! 桌台二维码 API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/tables/qr-tokens | GET | 列出桌台二维码 (按需补发) | 收银密钥 |

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_cashier;
use crate::core::ServerState;

/// Table QR router - cashier key required
pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route("/api/tables/qr-tokens", get(handler::list_qr_tokens))
        .route_layer(middleware::from_fn_with_state(state, require_cashier))
}
