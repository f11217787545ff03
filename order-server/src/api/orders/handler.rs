//! Order API handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::models::GuestSession;
use shared::order::Order;
use shared::request::{CreateOrderRequest, UpdateStatusRequest};

use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok};

/// Place an order in the current guest session
pub async fn create_order(
    State(state): State<ServerState>,
    Extension(session): Extension<GuestSession>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.create_order(&session, &payload)?;
    Ok(ok(order))
}

/// Fetch one of the session's own orders
pub async fn get_order(
    State(state): State<ServerState>,
    Extension(session): Extension<GuestSession>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.get_order_for_guest(&session, &id)?;
    Ok(ok(order))
}

/// Kitchen-side status transition
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.update_status(&id, &payload.status)?;
    Ok(ok(order))
}
