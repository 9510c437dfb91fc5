//! Food record (read-only here; managed by the menu endpoints)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: Uuid,
    pub food_id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub food_image: Option<String>,
    #[serde(default)]
    pub menu_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Food {
    pub fn new(name: impl Into<String>, price: Decimal, food_image: Option<String>) -> Self {
        let id = Uuid::new_v4();
        let now = Utc::now();
        Self {
            food_id: super::stable_key(&id),
            id,
            name: name.into(),
            price: crate::core::money::round_currency(price),
            food_image,
            menu_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}
