//! API response payloads
//!
//! The bodies carried inside the server's `{code, message, data}`
//! envelope. The envelope itself lives server-side with the error
//! handling; clients only need the payload shapes.

use crate::models::{DiningTable, GuestSession};
use crate::order::{Order, OrderStatus, PaymentStatus};
use serde::{Deserialize, Serialize};

/// Returned by `POST /api/guest/start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub session: GuestSession,
    pub tenant_name: String,
    pub table_name: String,
}

/// Returned by `GET /api/guest/check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCheckResponse {
    pub valid: bool,
    pub tenant_id: String,
    pub table_id: String,
    pub expires_at: i64,
}

/// Returned by `POST /api/payments` and the cash confirmation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub payment_id: String,
    pub order_id: String,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_token: Option<String>,
}

/// Returned by `GET /api/pickup/{token}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupLookupResponse {
    pub order: Order,
    pub table_name: String,
}

/// Returned by `POST /api/pickup/{token}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupCollectResponse {
    pub order_id: String,
    pub status: OrderStatus,
    pub table_name: String,
    /// False when the order had already been handed over
    pub collected_now: bool,
}

/// One row of `GET /api/tables/qr-tokens`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableQrResponse {
    pub table: DiningTable,
    pub qr_token: String,
}
