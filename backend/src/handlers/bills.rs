//! HTTP handlers for billing and payment endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::{Bill, RecordId};

use crate::error::AppResult;
use crate::services::billing::{
    BillStatus, BillingService, CreateBillInput, OrderRollup, RecordPaymentInput,
};
use crate::AppState;

/// Query parameters for listing bills
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillListQuery {
    pub order_number: Option<String>,
}

/// Raise a bill
pub async fn create_bill(
    State(state): State<AppState>,
    Json(input): Json<CreateBillInput>,
) -> AppResult<Json<Bill>> {
    let service = BillingService::new(state.store);
    let bill = service.create_bill(input).await?;
    Ok(Json(bill))
}

/// List bills, optionally for one order
pub async fn list_bills(
    State(state): State<AppState>,
    Query(query): Query<BillListQuery>,
) -> AppResult<Json<Vec<Bill>>> {
    let service = BillingService::new(state.store);
    let bills = service.list_bills(query.order_number.as_deref()).await?;
    Ok(Json(bills))
}

/// Derived view of one bill
pub async fn get_bill_status(
    State(state): State<AppState>,
    Path(bill_id): Path<Uuid>,
) -> AppResult<Json<BillStatus>> {
    let service = BillingService::new(state.store);
    let status = service.bill_status(bill_id).await?;
    Ok(Json(status))
}

/// Record a payment against a bill
pub async fn record_payment(
    State(state): State<AppState>,
    Path(bill_id): Path<Uuid>,
    Json(input): Json<RecordPaymentInput>,
) -> AppResult<Json<BillStatus>> {
    let service = BillingService::new(state.store);
    let status = service.record_payment(bill_id, input).await?;
    Ok(Json(status))
}

/// Remove a payment record
pub async fn remove_payment(
    State(state): State<AppState>,
    Path((bill_id, record_id)): Path<(Uuid, String)>,
) -> AppResult<Json<BillStatus>> {
    let service = BillingService::new(state.store);
    let status = service
        .remove_payment(bill_id, &RecordId::from(record_id.as_str()))
        .await?;
    Ok(Json(status))
}

/// Order-level rollup across every bill of an order
pub async fn get_order_rollup(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> AppResult<Json<OrderRollup>> {
    let service = BillingService::new(state.store);
    let rollup = service.order_rollup(&order_number).await?;
    Ok(Json(rollup))
}
