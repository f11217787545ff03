//! Pickup API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::response::{PickupCollectResponse, PickupLookupResponse};

use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok};

/// Look up the order behind a pickup token without collecting it
pub async fn lookup(
    State(state): State<ServerState>,
    Path(token): Path<String>,
) -> AppResult<Json<AppResponse<PickupLookupResponse>>> {
    let order = state.orders.lookup_pickup(&token)?;
    let table_name = table_name(&state, &order.tenant_id, &order.table_id)?;
    Ok(ok(PickupLookupResponse { order, table_name }))
}

/// Hand the order over against its pickup token
pub async fn collect(
    State(state): State<ServerState>,
    Path(token): Path<String>,
) -> AppResult<Json<AppResponse<PickupCollectResponse>>> {
    let outcome = state.orders.collect_pickup(&token)?;
    let table_name = table_name(&state, &outcome.order.tenant_id, &outcome.order.table_id)?;
    Ok(ok(PickupCollectResponse {
        order_id: outcome.order.id,
        status: outcome.order.status,
        table_name,
        collected_now: outcome.collected_now,
    }))
}

fn table_name(state: &ServerState, tenant_id: &str, table_id: &str) -> AppResult<String> {
    Ok(state
        .directory
        .get_table(tenant_id, table_id)?
        .map(|t| t.name)
        .unwrap_or_default())
}
