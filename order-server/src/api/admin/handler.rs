//! Admin API handlers

use axum::{Json, extract::State};
use shared::models::{DiningTable, MenuItem, Tenant};
use shared::request::{CreateMenuItemRequest, CreateTableRequest, CreateTenantRequest};

use crate::core::ServerState;
use crate::orders::money::MAX_PRICE;
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// Create a tenant
pub async fn create_tenant(
    State(state): State<ServerState>,
    Json(payload): Json<CreateTenantRequest>,
) -> AppResult<Json<AppResponse<Tenant>>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Tenant name is required".to_string()));
    }
    let slug = payload.slug.trim().to_lowercase();
    if slug.is_empty() || !slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(AppError::Validation(
            "Slug must be lowercase letters, digits and hyphens".to_string(),
        ));
    }

    let tenant = state.directory.create_tenant(payload.name.trim(), &slug)?;
    Ok(ok(tenant))
}

/// Create a dining table for a tenant
pub async fn create_table(
    State(state): State<ServerState>,
    Json(payload): Json<CreateTableRequest>,
) -> AppResult<Json<AppResponse<DiningTable>>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Table name is required".to_string()));
    }

    let table = state
        .directory
        .create_table(&payload.tenant_id, payload.name.trim())?;
    Ok(ok(table))
}

/// Create a menu item for a tenant
pub async fn create_menu_item(
    State(state): State<ServerState>,
    Json(payload): Json<CreateMenuItemRequest>,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Item name is required".to_string()));
    }
    if !payload.price.is_finite() || payload.price < 0.0 || payload.price > MAX_PRICE {
        return Err(AppError::Validation(format!(
            "Price must be between 0 and {}",
            MAX_PRICE
        )));
    }

    let item = state.directory.create_menu_item(
        &payload.tenant_id,
        payload.name.trim(),
        payload.description.clone(),
        payload.price,
        payload.is_available,
    )?;
    Ok(ok(item))
}
