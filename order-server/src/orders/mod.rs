//! 订单模块 - 订单聚合、生命周期、支付与取餐
//!
//! # 模块结构
//!
//! - [`lifecycle`] - 状态流转引擎 (纯函数)
//! - [`money`] - 金额计算 (rust_decimal)
//! - [`token`] - 短令牌生成 (取餐码、桌台二维码)
//! - [`storage`] - redb 存储层
//! - [`manager`] - 订单管理器 (业务入口)

pub mod lifecycle;
pub mod manager;
pub mod money;
pub mod storage;
pub mod token;

pub use manager::{CollectOutcome, OrdersManager};
pub use storage::OrderStorage;

use shared::order::OrderStatus;
use thiserror::Error;

use crate::db::StorageError;

/// Order domain errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unknown status: {0}")]
    InvalidStatus(String),

    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Order is not paid")]
    PaymentRequired,

    #[error("Pickup token space exhausted")]
    TokenExhausted,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<redb::TransactionError> for OrderError {
    fn from(e: redb::TransactionError) -> Self {
        OrderError::Storage(e.into())
    }
}

impl From<redb::TableError> for OrderError {
    fn from(e: redb::TableError) -> Self {
        OrderError::Storage(e.into())
    }
}

impl From<redb::StorageError> for OrderError {
    fn from(e: redb::StorageError) -> Self {
        OrderError::Storage(e.into())
    }
}

impl From<redb::CommitError> for OrderError {
    fn from(e: redb::CommitError) -> Self {
        OrderError::Storage(e.into())
    }
}

impl From<serde_json::Error> for OrderError {
    fn from(e: serde_json::Error) -> Self {
        OrderError::Storage(e.into())
    }
}
