//! Invoice view: an invoice folded with its order's aggregate

use super::aggregator::OrderAggregator;
use crate::core::store::decode;
use crate::core::{Filter, RecordStore, Result, TavolaError};
use crate::models::collections::INVOICE;
use crate::models::{Invoice, InvoiceView};
use serde::Deserialize;
use std::sync::Arc;

/// Order reference of a stored invoice
///
/// Invoices created by an upserting update carry no order.
#[derive(Deserialize)]
struct OrderRef {
    #[serde(default)]
    order_id: Option<String>,
}

#[derive(Clone)]
pub struct InvoiceProjector {
    store: Arc<dyn RecordStore>,
    aggregator: OrderAggregator,
}

impl InvoiceProjector {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            aggregator: OrderAggregator::new(store.clone()),
            store,
        }
    }

    /// Build the view for `invoice_id`
    ///
    /// Fails with `NotFound` for an unknown invoice and with `Aggregation`
    /// when the invoice's order has no items or the invoice has no order.
    pub async fn project(&self, invoice_id: &str) -> Result<InvoiceView> {
        let record = self
            .store
            .find_one(INVOICE, &Filter::eq("invoice_id", invoice_id))
            .await?
            .ok_or_else(|| TavolaError::not_found("invoice", invoice_id))?;

        let OrderRef { order_id } = decode(INVOICE, record.clone())?;
        let Some(order_id) = order_id else {
            tracing::warn!(invoice_id, "invoice has no order reference");
            return Err(TavolaError::Aggregation {
                order_id: String::new(),
            });
        };

        let aggregate = self
            .aggregator
            .aggregate_by_order(&order_id)
            .await
            .map_err(|source| match source {
                timeout @ TavolaError::Timeout { .. } => timeout,
                source => TavolaError::Dependency {
                    order_id: order_id.clone(),
                    source: Box::new(source),
                },
            })?
            .into_iter()
            .next();

        let Some(aggregate) = aggregate else {
            tracing::warn!(
                invoice_id,
                order_id = %order_id,
                "invoice order has no aggregate row"
            );
            return Err(TavolaError::Aggregation { order_id });
        };

        let invoice: Invoice = decode(INVOICE, record)?;
        Ok(InvoiceView::compose(invoice, aggregate))
    }
}
