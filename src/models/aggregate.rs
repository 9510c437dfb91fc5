//! Read models computed per request; never persisted

use super::invoice::{Invoice, PaymentMethod, PaymentStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One enriched order item inside an aggregate
///
/// Fields coming from a joined food, order or table record are empty when
/// that record is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Food price times quantity
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub food_name: Option<String>,
    #[serde(default)]
    pub food_image: Option<String>,
    #[serde(default)]
    pub table_number: Option<i64>,
    #[serde(default)]
    pub table_id: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Per-order summary of its items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderAggregate {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub table_id: Option<String>,
    #[serde(default)]
    pub table_number: Option<i64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub payment_due: Decimal,
    pub total_count: u64,
    #[serde(default)]
    pub order_items: Vec<OrderLine>,
}

/// Invoice folded with its order's aggregate for client display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceView {
    pub invoice_id: String,
    /// `"null"` when no method was recorded
    pub payment_method: String,
    pub order_id: String,
    pub payment_status: PaymentStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub payment_due: Decimal,
    pub table_number: Option<i64>,
    pub payment_due_date: DateTime<Utc>,
    pub order_details: Vec<OrderLine>,
}

impl InvoiceView {
    pub fn compose(invoice: Invoice, aggregate: OrderAggregate) -> Self {
        Self {
            payment_status: invoice.status(),
            payment_method: PaymentMethod::display(invoice.payment_method),
            invoice_id: invoice.invoice_id,
            order_id: invoice.order_id,
            payment_due: aggregate.payment_due,
            table_number: aggregate.table_number,
            payment_due_date: invoice.payment_due_date,
            order_details: aggregate.order_items,
        }
    }
}
