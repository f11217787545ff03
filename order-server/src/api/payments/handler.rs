//! Payment API handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::models::GuestSession;
use shared::order::Payment;
use shared::request::RecordPaymentRequest;
use shared::response::PaymentResponse;

use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok};

/// Record a payment attempt for one of the session's orders.
///
/// Cash leaves the order unpaid until the cashier confirms; everything
/// else settles immediately and the response carries the pickup token.
pub async fn record_payment(
    State(state): State<ServerState>,
    Extension(session): Extension<GuestSession>,
    Json(payload): Json<RecordPaymentRequest>,
) -> AppResult<Json<AppResponse<PaymentResponse>>> {
    let (payment, order) = state.orders.record_payment(
        &session,
        &payload.order_id,
        payload.method,
        payload.amount,
    )?;
    Ok(ok(PaymentResponse {
        payment_id: payment.id,
        order_id: order.id,
        payment_status: order.payment_status,
        pickup_token: order.pickup_token,
    }))
}

/// Payment history for an order, for the cashier's dispute view
pub async fn list_by_order(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<Payment>>>> {
    let payments = state.orders.list_payments(&order_id)?;
    Ok(ok(payments))
}

/// Cashier confirmation of a pending cash payment
pub async fn confirm_cash(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<AppResponse<PaymentResponse>>> {
    let (payment, order) = state.orders.confirm_cash_payment(&order_id)?;
    Ok(ok(PaymentResponse {
        payment_id: payment.id,
        order_id: order.id,
        payment_status: order.payment_status,
        pickup_token: order.pickup_token,
    }))
}
