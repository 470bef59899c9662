//! HTTP handlers for production endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use shared::{ComponentType, RecordId, TransactionRecord};

use crate::error::AppResult;
use crate::services::production::{
    ProductionService, ProductionStatus, RecordProductionInput, RecordReceiptInput,
};
use crate::AppState;

/// Record a label receipt
pub async fn record_receipt(
    State(state): State<AppState>,
    Json(input): Json<RecordReceiptInput>,
) -> AppResult<Json<TransactionRecord<ComponentType>>> {
    let service = ProductionService::new(state.store);
    let record = service.record_receipt(input).await?;
    Ok(Json(record))
}

/// Record produced labels
pub async fn record_production(
    State(state): State<AppState>,
    Json(input): Json<RecordProductionInput>,
) -> AppResult<Json<ProductionStatus>> {
    let service = ProductionService::new(state.store);
    let status = service.record_production(input).await?;
    Ok(Json(status))
}

/// Remove a production record
pub async fn remove_production(
    State(state): State<AppState>,
    Path((order_id, product_id, record_id)): Path<(String, String, String)>,
) -> AppResult<Json<ProductionStatus>> {
    let service = ProductionService::new(state.store);
    let status = service
        .remove_production(&order_id, &product_id, &RecordId::from(record_id.as_str()))
        .await?;
    Ok(Json(status))
}

/// Derived view of one production subject
pub async fn get_production_status(
    State(state): State<AppState>,
    Path((order_id, product_id)): Path<(String, String)>,
) -> AppResult<Json<ProductionStatus>> {
    let service = ProductionService::new(state.store);
    let status = service.status(&order_id, &product_id).await?;
    Ok(Json(status))
}

/// List subjects with labels received
pub async fn list_active_production(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProductionStatus>>> {
    let service = ProductionService::new(state.store);
    let views = service.list_active().await?;
    Ok(Json(views))
}
