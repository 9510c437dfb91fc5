//! Order item endpoints, including the per-order aggregate

use crate::core::{TavolaError, UpdateOutcome};
use crate::models::{OrderAggregate, OrderItem};
use crate::server::host::ServerHost;
use crate::services::{CreateOrderItems, CreatedOrder, OrderItemUpdate};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;

pub async fn list_order_items(
    State(host): State<Arc<ServerHost>>,
) -> Result<Json<Vec<Value>>, TavolaError> {
    Ok(Json(host.order_items.list().await?))
}

pub async fn get_order_item(
    State(host): State<Arc<ServerHost>>,
    Path(order_item_id): Path<String>,
) -> Result<Json<OrderItem>, TavolaError> {
    Ok(Json(host.order_items.get(&order_item_id).await?))
}

/// Aggregated view of one order's items; empty when the order has none
pub async fn items_by_order(
    State(host): State<Arc<ServerHost>>,
    Path(order_id): Path<String>,
) -> Result<Json<Vec<OrderAggregate>>, TavolaError> {
    Ok(Json(host.order_items.items_by_order(&order_id).await?))
}

pub async fn create_order_items(
    State(host): State<Arc<ServerHost>>,
    payload: Result<Json<CreateOrderItems>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedOrder>), TavolaError> {
    let Json(request) = payload?;
    let created = host.order_items.create(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_order_item(
    State(host): State<Arc<ServerHost>>,
    Path(order_item_id): Path<String>,
    payload: Result<Json<OrderItemUpdate>, JsonRejection>,
) -> Result<Json<UpdateOutcome>, TavolaError> {
    let Json(update) = payload?;
    Ok(Json(host.order_items.update(&order_item_id, update).await?))
}
