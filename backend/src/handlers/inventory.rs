//! HTTP handlers for inventory verification endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use shared::RecordId;

use crate::error::AppResult;
use crate::services::inventory::{InventoryService, InventoryStatus, RecordHandoffInput};
use crate::AppState;

/// Record a verified handoff to billing
pub async fn record_handoff(
    State(state): State<AppState>,
    Json(input): Json<RecordHandoffInput>,
) -> AppResult<Json<InventoryStatus>> {
    let service = InventoryService::new(state.store);
    let status = service.record_handoff(input).await?;
    Ok(Json(status))
}

/// Remove a handoff record
pub async fn remove_handoff(
    State(state): State<AppState>,
    Path((order_id, product_id, record_id)): Path<(String, String, String)>,
) -> AppResult<Json<InventoryStatus>> {
    let service = InventoryService::new(state.store);
    let status = service
        .remove_handoff(&order_id, &product_id, &RecordId::from(record_id.as_str()))
        .await?;
    Ok(Json(status))
}

/// Derived view of one inventory subject
pub async fn get_inventory_status(
    State(state): State<AppState>,
    Path((order_id, product_id)): Path<(String, String)>,
) -> AppResult<Json<InventoryStatus>> {
    let service = InventoryService::new(state.store);
    let status = service.status(&order_id, &product_id).await?;
    Ok(Json(status))
}

/// List subjects with produced stock to verify
pub async fn list_active_inventory(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<InventoryStatus>>> {
    let service = InventoryService::new(state.store);
    let views = service.list_active().await?;
    Ok(Json(views))
}
