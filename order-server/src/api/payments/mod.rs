//! 支付 API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/payments | POST | 发起支付 | 顾客会话 |
//! | /api/payments/{order_id} | GET | 订单支付记录 | 收银密钥 |
//! | /api/payments/{order_id}/confirm-cash | POST | 确认现金收款 | 收银密钥 |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{require_cashier, require_guest};
use crate::core::ServerState;

/// Payment router
pub fn router(state: ServerState) -> Router<ServerState> {
    let guest_routes = Router::new()
        .route("/api/payments", post(handler::record_payment))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_guest,
        ));

    let cashier_routes = Router::new()
        .route("/api/payments/{order_id}", get(handler::list_by_order))
        .route(
            "/api/payments/{order_id}/confirm-cash",
            post(handler::confirm_cash),
        )
        .route_layer(middleware::from_fn_with_state(state, require_cashier));

    guest_routes.merge(cashier_routes)
}
