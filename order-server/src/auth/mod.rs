//! 认证模块
//!
//! 提供两类访问控制:
//!
//! - **顾客会话**: 顾客扫码后获得会话令牌，通过 `X-Guest-Token` 头携带
//! - **员工密钥**: 后厨和收银端通过 `x-kitchen-key` / `x-cashier-key` 头认证

mod middleware;

pub use middleware::{
    CASHIER_KEY_HEADER, GUEST_TOKEN_HEADER, KITCHEN_KEY_HEADER, require_cashier, require_guest,
    require_kitchen,
};
