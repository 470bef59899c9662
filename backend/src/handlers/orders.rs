//! HTTP handlers for order catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use shared::Order;

use crate::error::AppResult;
use crate::services::catalog::{CatalogService, ProductRef};
use crate::AppState;

/// List all orders
pub async fn list_orders(State(state): State<AppState>) -> AppResult<Json<Vec<Order>>> {
    let service = CatalogService::new(state.store);
    let orders = service.list_orders().await?;
    Ok(Json(orders))
}

/// Get an order by id
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Order>> {
    let service = CatalogService::new(state.store);
    let order = service.get_order(&order_id).await?;
    Ok(Json(order))
}

/// List products moved to purchase
pub async fn list_purchase_products(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProductRef>>> {
    let service = CatalogService::new(state.store);
    let products = service.list_purchase_products().await?;
    Ok(Json(products))
}
