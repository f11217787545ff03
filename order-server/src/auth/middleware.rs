//! 认证中间件
//!
//! 为顾客会话和员工密钥提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::models::GuestSession;
use shared::util::now_millis;

use crate::AppError;
use crate::core::ServerState;

/// 顾客会话头
pub const GUEST_TOKEN_HEADER: &str = "x-guest-token";
/// 后厨密钥头
pub const KITCHEN_KEY_HEADER: &str = "x-kitchen-key";
/// 收银密钥头
pub const CASHIER_KEY_HEADER: &str = "x-cashier-key";

/// 顾客会话中间件
///
/// 从 `X-Guest-Token` 头提取会话令牌并验证。
/// 验证成功后将 [`GuestSession`] 注入请求扩展 (`req.extensions_mut().insert(session)`)。
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 X-Guest-Token 头 | 401 Unauthorized |
/// | 未知令牌 | 401 Unauthorized |
/// | 会话已过期 | 401 SessionExpired |
pub async fn require_guest(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(GUEST_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let token = match token {
        Some(token) if !token.is_empty() => token,
        _ => {
            tracing::warn!(uri = %req.uri(), "Guest token missing");
            return Err(AppError::Unauthorized);
        }
    };

    let session = state
        .sessions
        .get_by_token(&token)
        .map_err(AppError::from)?
        .ok_or(AppError::Unauthorized)?;

    if session.is_expired(now_millis()) {
        tracing::warn!(session_id = %session.id, "Guest session expired");
        return Err(AppError::SessionExpired);
    }

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

/// 后厨密钥中间件
///
/// 校验 `x-kitchen-key` 头与配置的后厨密钥。
pub async fn require_kitchen(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    check_staff_key(&req, KITCHEN_KEY_HEADER, &state.config.kitchen_key)?;
    Ok(next.run(req).await)
}

/// 收银密钥中间件
///
/// 校验 `x-cashier-key` 头与配置的收银密钥。
pub async fn require_cashier(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    check_staff_key(&req, CASHIER_KEY_HEADER, &state.config.cashier_key)?;
    Ok(next.run(req).await)
}

fn check_staff_key(req: &Request, header: &str, expected: &str) -> Result<(), AppError> {
    let presented = req
        .headers()
        .get(header)
        .and_then(|h| h.to_str().ok());

    match presented {
        None => {
            tracing::warn!(uri = %req.uri(), header, "Staff key missing");
            Err(AppError::Unauthorized)
        }
        Some(key) if key != expected => {
            tracing::warn!(uri = %req.uri(), header, "Staff key rejected");
            Err(AppError::Forbidden("Invalid staff key".to_string()))
        }
        Some(_) => Ok(()),
    }
}
