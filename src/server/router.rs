//! Route table

use super::handlers::{invoices, order_items};
use super::host::ServerHost;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build every route of the service
///
/// - GET /health, /healthz
/// - GET|POST /invoices, GET|PATCH /invoices/{invoice_id}
/// - GET|POST /order-items, GET|PATCH /order-items/{order_item_id}
/// - GET /orders/{order_id}/items
pub fn build_routes(host: Arc<ServerHost>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route(
            "/invoices",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route(
            "/invoices/{invoice_id}",
            get(invoices::get_invoice).patch(invoices::update_invoice),
        )
        .route(
            "/order-items",
            get(order_items::list_order_items).post(order_items::create_order_items),
        )
        .route(
            "/order-items/{order_item_id}",
            get(order_items::get_order_item).patch(order_items::update_order_item),
        )
        .route("/orders/{order_id}/items", get(order_items::items_by_order))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(host)
}

async fn health_check(State(host): State<Arc<ServerHost>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "tavola",
        "store": host.store.backend(),
    }))
}
