//! Order lifecycle types
//!
//! The order aggregate, its line items, payment records and the
//! append-only audit events. Monetary values travel as `f64` on the wire;
//! all arithmetic on them is done with `rust_decimal` (see the server's
//! money module). Statuses serialize as lowercase strings, matching the
//! guest/staff clients.

use crate::util::now_millis;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// Status enums
// ============================================================================

/// Kitchen-visible order status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Collected,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Collected => "collected",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "collected" => Ok(OrderStatus::Collected),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(other.to_string()),
        }
    }
}

/// Settlement state of the order as a whole.
///
/// Moves only forward: `unpaid → initiated → paid`. The payment recorder
/// never regresses this, no matter how many attempts accumulate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Initiated,
    Paid,
}

impl PaymentStatus {
    /// Ordering rank used to enforce forward-only movement.
    pub fn rank(&self) -> u8 {
        match self {
            PaymentStatus::Unpaid => 0,
            PaymentStatus::Initiated => 1,
            PaymentStatus::Paid => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Initiated => "initiated",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepted payment methods.
///
/// Cash requires a later manual confirmation at the counter; every other
/// method is treated as captured the moment it is recorded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Bkash,
    Nagad,
    Other,
}

impl PaymentMethod {
    /// Whether recording this method settles the payment immediately.
    pub fn is_instant_capture(&self) -> bool {
        !matches!(self, PaymentMethod::Cash)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Bkash => "bkash",
            PaymentMethod::Nagad => "nagad",
            PaymentMethod::Other => "other",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "bkash" => Ok(PaymentMethod::Bkash),
            "nagad" => Ok(PaymentMethod::Nagad),
            "other" => Ok(PaymentMethod::Other),
            other => Err(other.to_string()),
        }
    }
}

/// State of one recorded payment attempt (append-only row).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentRecordStatus {
    Initiated,
    Captured,
}

// ============================================================================
// Aggregate
// ============================================================================

/// One line of an order - immutable after creation.
///
/// `unit_price` is a snapshot of the menu price at order time; later menu
/// edits never change it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub menu_item_id: String,
    /// Item name snapshot (for kitchen display and receipts)
    pub item_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
}

/// The order aggregate, including its line items.
///
/// Monetary fields are set once at creation; `status` is mutated by the
/// transition engine, `payment_status` only by the payment recorder, and
/// `pickup_token` exactly once by the token issuer. Orders are never
/// physically deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub tenant_id: String,
    pub table_id: String,
    pub guest_session_id: String,
    /// Human-readable code shown on the guest's receipt
    pub order_code: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub lines: Vec<OrderLine>,
    /// Unix milliseconds
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Re-derive the total from the persisted line items.
    ///
    /// Pure consistency check: must always equal `self.total`
    /// (`total = subtotal + tax`, subtotal = Σ line totals).
    pub fn computed_total(&self) -> f64 {
        let subtotal: Decimal = self
            .lines
            .iter()
            .map(|line| Decimal::from_f64(line.line_total).unwrap_or_default())
            .sum();
        let tax = Decimal::from_f64(self.tax).unwrap_or_default();
        (subtotal + tax).round_dp(2).to_f64().unwrap_or(0.0)
    }
}

/// One payment attempt against an order. Append-only: attempts are
/// recorded as new rows and never edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub method: PaymentMethod,
    pub amount: f64,
    pub status: PaymentRecordStatus,
    pub created_at: i64,
}

// ============================================================================
// Audit events
// ============================================================================

/// Audit event label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventKind {
    StatusChanged,
    PickupTokenIssued,
}

/// Append-only audit record. One row per accepted status transition and
/// per pickup-token issuance.
///
/// `sequence` is a global monotonic counter and the authoritative ordering
/// key for the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    pub event_id: String,
    pub sequence: u64,
    pub order_id: String,
    pub kind: OrderEventKind,
    /// The status recorded by a `StatusChanged` event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl OrderEvent {
    pub fn status_changed(sequence: u64, order_id: impl Into<String>, status: OrderStatus) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            order_id: order_id.into(),
            kind: OrderEventKind::StatusChanged,
            status: Some(status),
            timestamp: now_millis(),
            meta: None,
        }
    }

    pub fn pickup_token_issued(sequence: u64, order_id: impl Into<String>, token: &str) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            order_id: order_id.into(),
            kind: OrderEventKind::PickupTokenIssued,
            status: None,
            timestamp: now_millis(),
            meta: Some(serde_json::json!({ "token": token })),
        }
    }
}
