//! 门店数据管理 API 模块
//!
//! 提供租户、桌台、菜单的建档接口。
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/admin/tenants | POST | 创建租户 | 收银密钥 |
//! | /api/admin/tables | POST | 创建桌台 | 收银密钥 |
//! | /api/admin/menu-items | POST | 创建菜单项 | 收银密钥 |

mod handler;

use axum::{Router, middleware, routing::post};

use crate::auth::require_cashier;
use crate::core::ServerState;

/// Admin router - cashier key required
pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new()
        .nest("/api/admin", routes())
        .route_layer(middleware::from_fn_with_state(state, require_cashier))
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/tenants", post(handler::create_tenant))
        .route("/tables", post(handler::create_table))
        .route("/menu-items", post(handler::create_menu_item))
}
