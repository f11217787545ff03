//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`AppResponse`] - API 响应结构
//!
//! # 错误码规范
//!
//! | 错误码 | HTTP | 说明 |
//! |--------|------|------|
//! | E0002 | 400 | 请求验证失败 |
//! | E0003 | 404 | 资源不存在 |
//! | E0004 | 409 | 资源冲突 |
//! | E0005 | 422 | 非法状态流转 |
//! | E0006 | 422 | 未知状态值 |
//! | E2001 | 403 | 无权限 |
//! | E2002 | 403 | 未完成支付 |
//! | E3001 | 401 | 缺少/无效凭证 |
//! | E3003 | 401 | 会话已过期 |
//! | E9001 | 500 | 内部错误 |
//! | E9002 | 500 | 数据库错误 |
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::NotFound("Order not found".into()))
//!
//! // 返回成功响应
//! Ok(ok(data))
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::StorageError;
use crate::directory::DirectoryError;
use crate::orders::OrderError;

/// API 统一响应结构
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// 错误码 (E0000 表示成功)
    pub code: String,
    /// 消息
    pub message: String,
    /// 响应数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// 追踪 ID (可选)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 认证错误 (401) ==========
    #[error("Authentication required")]
    /// 缺少/无效凭证 (401)
    Unauthorized,

    #[error("Session expired")]
    /// 会话已过期 (401)
    SessionExpired,

    // ========== 权限错误 (403) ==========
    #[error("Permission denied: {0}")]
    /// 无权限 (403)
    Forbidden(String),

    #[error("Payment required: {0}")]
    /// 未完成支付 (403)
    PaymentRequired(String),

    // ========== 业务逻辑错误 (4xx) ==========
    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Resource conflict: {0}")]
    /// 资源冲突 (409)
    Conflict(String),

    #[error("Validation failed: {0}")]
    /// 验证失败 (400)
    Validation(String),

    #[error("Invalid transition: {0}")]
    /// 非法状态流转 (422)
    InvalidTransition(String),

    #[error("Unknown status: {0}")]
    /// 未知状态值 (422)
    InvalidStatus(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Database error: {0}")]
    /// 数据库错误 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E3001", "Please start a session first".to_string()),
            AppError::SessionExpired => (StatusCode::UNAUTHORIZED, "E3003", "Session expired".to_string()),

            // Authorization errors (403)
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.clone()),
            AppError::PaymentRequired(msg) => (StatusCode::FORBIDDEN, "E2002", msg.clone()),

            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),

            // Conflict (409)
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.clone()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),

            // Lifecycle errors (422)
            AppError::InvalidTransition(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.clone())
            }
            AppError::InvalidStatus(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0006", format!("Unknown status: {}", msg))
            }

            // Database errors (500)
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error".to_string())
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
            trace_id: None,
        });

        (status, body).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Database(e.to_string())
    }
}

impl From<DirectoryError> for AppError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::SlugTaken(slug) => {
                AppError::Conflict(format!("Tenant slug already taken: {}", slug))
            }
            DirectoryError::TenantNotFound(id) => {
                AppError::NotFound(format!("Tenant not found: {}", id))
            }
            DirectoryError::TokenExhausted => {
                AppError::Internal("Failed to allocate QR token".to_string())
            }
            DirectoryError::Storage(e) => AppError::Database(e.to_string()),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(msg) => AppError::NotFound(msg),
            OrderError::Validation(msg) => AppError::Validation(msg),
            OrderError::Conflict(msg) => AppError::Conflict(msg),
            OrderError::InvalidStatus(s) => AppError::InvalidStatus(s),
            OrderError::InvalidTransition { from, to } => AppError::InvalidTransition(format!(
                "Cannot transition from {} to {}",
                from, to
            )),
            OrderError::PaymentRequired => {
                AppError::PaymentRequired("Order is not paid".to_string())
            }
            OrderError::TokenExhausted => {
                AppError::Internal("Failed to allocate pickup token".to_string())
            }
            OrderError::Storage(e) => AppError::Database(e.to_string()),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
        trace_id: None,
    })
}
