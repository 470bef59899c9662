//! HTTP handlers for dispatch endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use shared::RecordId;

use crate::error::AppResult;
use crate::services::dispatch::{DispatchService, DispatchView, RecordDispatchInput};
use crate::AppState;

/// Record dispatched stock
pub async fn record_dispatch(
    State(state): State<AppState>,
    Json(input): Json<RecordDispatchInput>,
) -> AppResult<Json<DispatchView>> {
    let service = DispatchService::new(state.store);
    let view = service.record_dispatch(input).await?;
    Ok(Json(view))
}

/// Remove a dispatch record
pub async fn remove_dispatch(
    State(state): State<AppState>,
    Path((order_id, product_id, record_id)): Path<(String, String, String)>,
) -> AppResult<Json<DispatchView>> {
    let service = DispatchService::new(state.store);
    let view = service
        .remove_dispatch(&order_id, &product_id, &RecordId::from(record_id.as_str()))
        .await?;
    Ok(Json(view))
}

/// Derived view of one dispatch subject
pub async fn get_dispatch_status(
    State(state): State<AppState>,
    Path((order_id, product_id)): Path<(String, String)>,
) -> AppResult<Json<DispatchView>> {
    let service = DispatchService::new(state.store);
    let view = service.status(&order_id, &product_id).await?;
    Ok(Json(view))
}

/// Close a fully dispatched subject
pub async fn close_dispatch_subject(
    State(state): State<AppState>,
    Path((order_id, product_id)): Path<(String, String)>,
) -> AppResult<Json<DispatchView>> {
    let service = DispatchService::new(state.store);
    let view = service.close_subject(&order_id, &product_id).await?;
    Ok(Json(view))
}

/// List open subjects with produced stock
pub async fn list_active_dispatch(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<DispatchView>>> {
    let service = DispatchService::new(state.store);
    let views = service.list_active().await?;
    Ok(Json(views))
}
