//! Shared types for the self-order platform
//!
//! Common types used by the order server and its clients: domain entities,
//! order lifecycle enums, and the request/response payloads of the HTTP
//! surface.

pub mod models;
pub mod order;
pub mod request;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use order::{Order, OrderEvent, OrderStatus, Payment, PaymentMethod, PaymentStatus};
