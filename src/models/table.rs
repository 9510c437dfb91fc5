//! Dining table record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: Uuid,
    pub table_id: String,
    pub table_number: i64,
    #[serde(default)]
    pub number_of_guests: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Table {
    pub fn new(table_number: i64) -> Self {
        let id = Uuid::new_v4();
        let now = Utc::now();
        Self {
            table_id: super::stable_key(&id),
            id,
            table_number,
            number_of_guests: None,
            created_at: now,
            updated_at: now,
        }
    }
}
