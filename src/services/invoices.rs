//! Invoice lifecycle: creation with defaults and partial updates

use crate::config::WritePolicy;
use crate::core::store::insert_model;
use crate::core::{
    FieldPatch, Filter, RecordStore, Result, TavolaError, UpdateOutcome, ValidationError,
};
use crate::models::collections::{INVOICE, ORDER};
use crate::models::{Invoice, PaymentMethod, PaymentStatus};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Body of `POST /invoices`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInvoice {
    #[validate(length(min = 1, message = "order_id is required"))]
    pub order_id: String,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

/// Body of `PATCH /invoices/{invoice_id}`; absent fields stay untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceUpdate {
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
}

impl InvoiceUpdate {
    pub fn to_patch(&self) -> FieldPatch {
        FieldPatch::new()
            .set("payment_method", self.payment_method)
            .set("payment_status", self.payment_status)
    }
}

#[derive(Clone)]
pub struct InvoiceManager {
    store: Arc<dyn RecordStore>,
    policy: WritePolicy,
}

impl InvoiceManager {
    pub fn new(store: Arc<dyn RecordStore>, policy: WritePolicy) -> Self {
        Self { store, policy }
    }

    /// Create an invoice for an existing order
    pub async fn create(&self, request: CreateInvoice) -> Result<Invoice> {
        request.validate()?;

        let order = self
            .store
            .find_one(ORDER, &Filter::eq("order_id", request.order_id.as_str()))
            .await?;
        if order.is_none() {
            return Err(ValidationError::UnknownReference {
                entity: "order",
                id: request.order_id,
            }
            .into());
        }

        let invoice = Invoice::new(
            request.order_id,
            request.payment_status,
            request.payment_method,
            Utc::now(),
        )?;
        insert_model(&*self.store, INVOICE, &invoice).await?;

        tracing::info!(
            invoice_id = %invoice.invoice_id,
            order_id = %invoice.order_id,
            status = %invoice.status(),
            "invoice created"
        );
        Ok(invoice)
    }

    /// Merge the present fields into the stored invoice and refresh `updated_at`
    ///
    /// Under the default policy a missing invoice is created holding only
    /// the patched fields.
    pub async fn update(&self, invoice_id: &str, update: InvoiceUpdate) -> Result<UpdateOutcome> {
        let patch = update.to_patch().touch(Utc::now());
        let filter = Filter::eq("invoice_id", invoice_id);
        let outcome = self
            .store
            .update_one(INVOICE, &filter, &patch, self.policy.upsert_on_update)
            .await?;

        if outcome.matched_count == 0 && !outcome.created() {
            return Err(TavolaError::not_found("invoice", invoice_id));
        }
        if outcome.created() {
            tracing::warn!(invoice_id, "update created a new invoice record");
        } else {
            tracing::info!(invoice_id, modified = outcome.modified_count, "invoice updated");
        }
        Ok(outcome)
    }

    /// Every stored invoice, as stored
    pub async fn list(&self) -> Result<Vec<serde_json::Value>> {
        self.store.find(INVOICE, &Filter::all()).await
    }
}
