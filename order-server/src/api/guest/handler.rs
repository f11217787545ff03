//! Guest session API handlers

use axum::{Json, extract::State, http::HeaderMap};
use shared::request::StartSessionRequest;
use shared::response::{SessionCheckResponse, StartSessionResponse};
use shared::util::{millis_to_rfc3339, now_millis};

use crate::auth::GUEST_TOKEN_HEADER;
use crate::core::ServerState;
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// Start a guest session from a tenant slug and a table QR token.
///
/// The slug resolves the restaurant; the QR token must belong to one of
/// that restaurant's tables. A token from another tenant reads as an
/// unknown QR code. Scanning again before the previous session expires
/// simply issues a fresh session; sessions are cheap and there is at
/// most one guest token per device.
pub async fn start_session(
    State(state): State<ServerState>,
    Json(payload): Json<StartSessionRequest>,
) -> AppResult<Json<AppResponse<StartSessionResponse>>> {
    if payload.tenant_slug.trim().is_empty() {
        return Err(AppError::Validation("Tenant slug is required".to_string()));
    }
    if payload.qr_token.trim().is_empty() {
        return Err(AppError::Validation("QR token is required".to_string()));
    }

    let tenant = state
        .directory
        .get_tenant_by_slug(payload.tenant_slug.trim())?
        .ok_or_else(|| {
            AppError::NotFound(format!("Unknown restaurant: {}", payload.tenant_slug))
        })?;

    let (tenant_id, table_id) = state
        .directory
        .resolve_qr(&payload.qr_token)?
        .filter(|(qr_tenant_id, _)| *qr_tenant_id == tenant.id)
        .ok_or_else(|| AppError::NotFound("Unknown QR code".to_string()))?;

    let table = state
        .directory
        .get_table(&tenant_id, &table_id)?
        .ok_or_else(|| AppError::NotFound("Unknown QR code".to_string()))?;

    if !tenant.is_active || !table.is_active {
        return Err(AppError::Forbidden("Table is not available".to_string()));
    }

    let session = state
        .sessions
        .create(&tenant_id, &table_id, state.config.session_ttl_ms)?;

    tracing::info!(
        session_id = %session.id,
        tenant_id = %tenant_id,
        table = %table.name,
        expires = %millis_to_rfc3339(session.expires_at),
        "Guest session started"
    );
    Ok(ok(StartSessionResponse {
        session,
        tenant_name: tenant.name,
        table_name: table.name,
    }))
}

/// Report whether the presented guest token is still usable.
///
/// Expired and unknown tokens are distinguished so the client can show
/// "scan again" instead of a generic failure.
pub async fn check_session(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> AppResult<Json<AppResponse<SessionCheckResponse>>> {
    let token = headers
        .get(GUEST_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let session = state
        .sessions
        .get_by_token(token)?
        .ok_or(AppError::Unauthorized)?;

    if session.is_expired(now_millis()) {
        return Err(AppError::SessionExpired);
    }

    Ok(ok(SessionCheckResponse {
        valid: true,
        tenant_id: session.tenant_id,
        table_id: session.table_id,
        expires_at: session.expires_at,
    }))
}
