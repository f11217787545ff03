//! Menu API handlers

use axum::{Extension, Json, extract::State};
use shared::models::{GuestSession, MenuItem};

use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok};

/// List the menu items a guest can order right now.
///
/// Unavailable items are filtered out server-side; the client never has
/// to second-guess the flag.
pub async fn list_menu(
    State(state): State<ServerState>,
    Extension(session): Extension<GuestSession>,
) -> AppResult<Json<AppResponse<Vec<MenuItem>>>> {
    let mut items = state.directory.list_menu_items(&session.tenant_id)?;
    items.retain(|item| item.is_available);
    items.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(ok(items))
}
