//! Order record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An order, optionally seated at a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_id: String,
    /// `None` until the order is assigned a table
    #[serde(default)]
    pub table_id: Option<String>,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(table_id: Option<String>, now: DateTime<Utc>) -> Self {
        let id = Uuid::new_v4();
        Self {
            order_id: super::stable_key(&id),
            id,
            table_id,
            order_date: now,
            created_at: now,
            updated_at: now,
        }
    }
}
