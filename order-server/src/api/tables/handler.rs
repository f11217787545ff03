//! Table QR API handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::response::TableQrResponse;

use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok};

/// Query params for listing table QR tokens
#[derive(Debug, Deserialize)]
pub struct QrTokensQuery {
    pub tenant_id: String,
}

/// List every active table with its QR token.
///
/// Tables that never had a token get one here; tokens are stable after
/// the first allocation so printed codes stay valid.
pub async fn list_qr_tokens(
    State(state): State<ServerState>,
    Query(query): Query<QrTokensQuery>,
) -> AppResult<Json<AppResponse<Vec<TableQrResponse>>>> {
    let tables = state.directory.ensure_qr_tokens(&query.tenant_id)?;
    let rows = tables
        .into_iter()
        .filter(|t| t.is_active)
        .filter_map(|table| {
            table.qr_token.clone().map(|qr_token| TableQrResponse {
                table,
                qr_token,
            })
        })
        .collect();
    Ok(ok(rows))
}
