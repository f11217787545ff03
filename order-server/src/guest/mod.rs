//! 访客会话 - 扫码开启的匿名会话

mod store;

pub use store::SessionStore;
