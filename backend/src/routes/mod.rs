//! Route definitions for the IML Operations Tracking Platform

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Order catalog (read-only)
        .nest("/orders", order_routes())
        // Label receipt and production tracking
        .nest("/production", production_routes())
        // Inventory verification
        .nest("/inventory", inventory_routes())
        // Bills, payments, and rollups
        .nest("/bills", bill_routes())
        // Dispatch draw-down and closure
        .nest("/dispatch", dispatch_routes())
}

/// Order catalog routes
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders))
        .route("/purchase", get(handlers::list_purchase_products))
        .route("/:order_id", get(handlers::get_order))
}

/// Production routes
fn production_routes() -> Router<AppState> {
    Router::new()
        .route("/receipts", post(handlers::record_receipt))
        .route("/active", get(handlers::list_active_production))
        .route("/records", post(handlers::record_production))
        .route(
            "/:order_id/:product_id",
            get(handlers::get_production_status),
        )
        .route(
            "/:order_id/:product_id/records/:record_id",
            delete(handlers::remove_production),
        )
}

/// Inventory verification routes
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/active", get(handlers::list_active_inventory))
        .route("/records", post(handlers::record_handoff))
        .route(
            "/:order_id/:product_id",
            get(handlers::get_inventory_status),
        )
        .route(
            "/:order_id/:product_id/records/:record_id",
            delete(handlers::remove_handoff),
        )
}

/// Billing routes
fn bill_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_bills).post(handlers::create_bill))
        .route("/rollup/:order_number", get(handlers::get_order_rollup))
        .route("/:bill_id", get(handlers::get_bill_status))
        .route("/:bill_id/payments", post(handlers::record_payment))
        .route(
            "/:bill_id/payments/:record_id",
            delete(handlers::remove_payment),
        )
}

/// Dispatch routes
fn dispatch_routes() -> Router<AppState> {
    Router::new()
        .route("/active", get(handlers::list_active_dispatch))
        .route("/records", post(handlers::record_dispatch))
        .route("/:order_id/:product_id", get(handlers::get_dispatch_status))
        .route(
            "/:order_id/:product_id/close",
            post(handlers::close_dispatch_subject),
        )
        .route(
            "/:order_id/:product_id/records/:record_id",
            delete(handlers::remove_dispatch),
        )
}
