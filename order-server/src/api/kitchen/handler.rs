//! Kitchen board API handlers

use axum::{
    Json,
    extract::{Query, State},
};
use shared::order::Order;
use shared::request::KitchenOrdersQuery;

use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok};

/// Open orders for the kitchen board, oldest first.
///
/// Collected and cancelled orders drop off the board; the optional
/// status filter narrows to one column.
pub async fn list_orders(
    State(state): State<ServerState>,
    Query(query): Query<KitchenOrdersQuery>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let orders = state
        .orders
        .list_open_orders(&query.tenant_id, query.status)?;
    Ok(ok(orders))
}
