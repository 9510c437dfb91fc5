//! Order item record

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line of an order: a food reference with quantity and price at order time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_item_id: String,
    pub order_id: String,
    pub food_id: String,
    pub quantity: u32,
    /// Rounded to cents when the item is created; stored as is afterwards
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderItem {
    pub fn new(
        order_id: impl Into<String>,
        food_id: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
        now: DateTime<Utc>,
    ) -> Self {
        let id = Uuid::new_v4();
        Self {
            order_item_id: super::stable_key(&id),
            id,
            order_id: order_id.into(),
            food_id: food_id.into(),
            quantity,
            unit_price: crate::core::money::round_currency(unit_price),
            created_at: now,
            updated_at: now,
        }
    }
}
