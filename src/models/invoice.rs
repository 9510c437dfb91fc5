//! Invoice record and its payment vocabulary
//!
//! Payment status and method are optional on input. Their defaults are
//! resolved in exactly one place each:
//!
//! - [`PaymentStatus::resolve`]: absent status becomes `PENDING`
//! - [`PaymentMethod::display`]: absent method is shown as the string `"null"`

use crate::core::FieldValue;
use crate::core::error::{Result, TavolaError};
use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Shown in invoice views when no payment method was recorded
pub const NO_PAYMENT_METHOD: &str = "null";

/// Days between invoice creation and payment due date
pub const PAYMENT_TERM_DAYS: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
        }
    }

    /// Status to store when the client may have omitted it
    pub fn resolve(requested: Option<PaymentStatus>) -> PaymentStatus {
        requested.unwrap_or_default()
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PaymentStatus> for FieldValue {
    fn from(value: PaymentStatus) -> Self {
        FieldValue::String(value.as_str().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Card,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "CARD",
            PaymentMethod::Cash => "CASH",
        }
    }

    /// Display value for a possibly absent method
    ///
    /// Consumers rely on the literal string `"null"` here rather than a JSON
    /// null or a missing field.
    pub fn display(method: Option<PaymentMethod>) -> String {
        method
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| NO_PAYMENT_METHOD.to_string())
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PaymentMethod> for FieldValue {
    fn from(value: PaymentMethod) -> Self {
        FieldValue::String(value.as_str().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_id: String,
    pub order_id: String,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    /// Always `created_at` plus [`PAYMENT_TERM_DAYS`]
    pub payment_due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    pub fn new(
        order_id: impl Into<String>,
        payment_status: Option<PaymentStatus>,
        payment_method: Option<PaymentMethod>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let id = Uuid::new_v4();
        Ok(Self {
            invoice_id: super::stable_key(&id),
            id,
            order_id: order_id.into(),
            payment_method,
            payment_status: Some(PaymentStatus::resolve(payment_status)),
            payment_due_date: payment_due_date(now)?,
            created_at: now,
            updated_at: now,
        })
    }

    /// Stored status, falling back to the default for legacy records
    pub fn status(&self) -> PaymentStatus {
        PaymentStatus::resolve(self.payment_status)
    }
}

/// Due date for an invoice created at `created_at`
pub fn payment_due_date(created_at: DateTime<Utc>) -> Result<DateTime<Utc>> {
    created_at
        .checked_add_days(Days::new(PAYMENT_TERM_DAYS))
        .ok_or_else(|| TavolaError::Internal(format!("due date overflows for {}", created_at)))
}
