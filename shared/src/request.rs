//! Request payload types
//!
//! Bodies accepted by the order server's HTTP surface. Kept in the shared
//! crate so client tooling can construct them with the same types.

use crate::order::{OrderStatus, PaymentMethod};
use serde::{Deserialize, Serialize};

/// `POST /api/guest/start` - open a guest session from a scanned QR token.
///
/// The slug names the restaurant the guest believes they are in; the QR
/// token must belong to a table of that tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub tenant_slug: String,
    pub qr_token: String,
}

/// One requested order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineRequest {
    pub menu_item_id: String,
    pub quantity: i32,
}

/// `POST /api/orders` - place an order within a guest session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderLineRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// `POST /api/payments` - record a payment attempt for an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPaymentRequest {
    pub order_id: String,
    pub method: PaymentMethod,
    /// Tendered amount; must be non-negative and cover the order total
    /// (cash overpayment is recorded as tendered)
    pub amount: f64,
}

/// `PATCH /api/orders/{id}/status` - staff request for a status transition.
///
/// `status` is accepted as a raw string so unknown values surface as a
/// domain error rather than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// `GET /api/kitchen/orders` query filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KitchenOrdersQuery {
    pub tenant_id: String,
    /// Restrict to one status; omitted = all open orders
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

// ============================================================================
// Admin seeding
// ============================================================================

/// `POST /api/admin/tenants`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenantRequest {
    pub name: String,
    pub slug: String,
}

/// `POST /api/admin/tables`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTableRequest {
    pub tenant_id: String,
    pub name: String,
}

/// `POST /api/admin/menu-items`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMenuItemRequest {
    pub tenant_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}
