//! Invoice endpoints: list, create, view and payment updates

use crate::core::{TavolaError, UpdateOutcome};
use crate::models::{Invoice, InvoiceView};
use crate::server::host::ServerHost;
use crate::services::{CreateInvoice, InvoiceUpdate};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;

pub async fn list_invoices(
    State(host): State<Arc<ServerHost>>,
) -> Result<Json<Vec<Value>>, TavolaError> {
    Ok(Json(host.invoices.list().await?))
}

pub async fn get_invoice(
    State(host): State<Arc<ServerHost>>,
    Path(invoice_id): Path<String>,
) -> Result<Json<InvoiceView>, TavolaError> {
    Ok(Json(host.invoice_views.project(&invoice_id).await?))
}

pub async fn create_invoice(
    State(host): State<Arc<ServerHost>>,
    payload: Result<Json<CreateInvoice>, JsonRejection>,
) -> Result<(StatusCode, Json<Invoice>), TavolaError> {
    let Json(request) = payload?;
    let invoice = host.invoices.create(request).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

pub async fn update_invoice(
    State(host): State<Arc<ServerHost>>,
    Path(invoice_id): Path<String>,
    payload: Result<Json<InvoiceUpdate>, JsonRejection>,
) -> Result<Json<UpdateOutcome>, TavolaError> {
    let Json(update) = payload?;
    Ok(Json(host.invoices.update(&invoice_id, update).await?))
}
