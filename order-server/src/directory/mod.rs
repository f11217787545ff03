//! 租户目录 - 租户、桌台、菜单

mod store;

pub use store::{DirectoryError, DirectoryStore};
