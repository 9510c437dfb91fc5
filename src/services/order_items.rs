//! Order item lifecycle
//!
//! Items are created in batches: one request opens a new order and adds
//! every item to it. Reads and partial updates work item by item.

use super::aggregator::OrderAggregator;
use crate::config::WritePolicy;
use crate::core::money::currency_from_f64;
use crate::core::store::{find_one_as, insert_model};
use crate::core::{FieldPatch, Filter, RecordStore, Result, TavolaError, UpdateOutcome};
use crate::models::collections::{ORDER, ORDER_ITEM};
use crate::models::{Order, OrderAggregate, OrderItem};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Body of `POST /order-items`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderItems {
    /// Table the new order is seated at, if any
    #[serde(default)]
    pub table_id: Option<String>,
    #[validate(length(min = 1, message = "at least one order item is required"), nested)]
    pub order_items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewOrderItem {
    #[validate(length(min = 1, message = "food_id is required"))]
    pub food_id: String,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: u32,
    #[validate(range(min = 0.0, message = "unit_price must not be negative"))]
    pub unit_price: f64,
}

/// Result of a batch creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedOrder {
    pub order_id: String,
    pub order_items: Vec<OrderItem>,
}

/// Body of `PATCH /order-items/{order_item_id}`; absent fields stay untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct OrderItemUpdate {
    #[serde(default)]
    #[validate(range(min = 0.0, message = "unit_price must not be negative"))]
    pub unit_price: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: Option<u32>,
    #[serde(default)]
    #[validate(length(min = 1, message = "food_id must not be empty"))]
    pub food_id: Option<String>,
}

impl OrderItemUpdate {
    /// Validated patch with the price rounded to cents
    pub fn to_patch(&self) -> Result<FieldPatch> {
        self.validate()?;
        let unit_price = self
            .unit_price
            .map(|price| currency_from_f64("unit_price", price))
            .transpose()?;
        Ok(FieldPatch::new()
            .set("unit_price", unit_price)
            .set("quantity", self.quantity)
            .set("food_id", self.food_id.clone()))
    }
}

#[derive(Clone)]
pub struct OrderItemManager {
    store: Arc<dyn RecordStore>,
    aggregator: OrderAggregator,
    policy: WritePolicy,
}

impl OrderItemManager {
    pub fn new(store: Arc<dyn RecordStore>, policy: WritePolicy) -> Self {
        Self {
            aggregator: OrderAggregator::new(store.clone()),
            store,
            policy,
        }
    }

    /// Open a new order and add every requested item to it
    ///
    /// All items are validated before anything is written. Writes are not
    /// transactional: a store failure midway leaves the order and the items
    /// inserted so far in place.
    pub async fn create(&self, request: CreateOrderItems) -> Result<CreatedOrder> {
        request.validate()?;
        let prices = request
            .order_items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                currency_from_f64(&format!("order_items[{}].unit_price", index), item.unit_price)
            })
            .collect::<Result<Vec<Decimal>>>()?;

        let now = Utc::now();
        let order = Order::new(request.table_id, now);
        insert_model(&*self.store, ORDER, &order).await?;

        let mut created = Vec::with_capacity(request.order_items.len());
        for (item, price) in request.order_items.into_iter().zip(prices) {
            let item = OrderItem::new(&order.order_id, item.food_id, item.quantity, price, now);
            insert_model(&*self.store, ORDER_ITEM, &item).await?;
            created.push(item);
        }

        tracing::info!(
            order_id = %order.order_id,
            items = created.len(),
            "order items created"
        );
        Ok(CreatedOrder {
            order_id: order.order_id,
            order_items: created,
        })
    }

    pub async fn get(&self, order_item_id: &str) -> Result<OrderItem> {
        find_one_as(
            &*self.store,
            ORDER_ITEM,
            &Filter::eq("order_item_id", order_item_id),
        )
        .await?
        .ok_or_else(|| TavolaError::not_found("order item", order_item_id))
    }

    /// Every stored order item, as stored
    pub async fn list(&self) -> Result<Vec<serde_json::Value>> {
        self.store.find(ORDER_ITEM, &Filter::all()).await
    }

    /// Aggregated items of one order
    pub async fn items_by_order(&self, order_id: &str) -> Result<Vec<OrderAggregate>> {
        self.aggregator.aggregate_by_order(order_id).await
    }

    pub async fn update(
        &self,
        order_item_id: &str,
        update: OrderItemUpdate,
    ) -> Result<UpdateOutcome> {
        let patch = update.to_patch()?.touch(Utc::now());
        let outcome = self
            .store
            .update_one(
                ORDER_ITEM,
                &Filter::eq("order_item_id", order_item_id),
                &patch,
                self.policy.upsert_on_update,
            )
            .await?;

        if outcome.matched_count == 0 && !outcome.created() {
            return Err(TavolaError::not_found("order item", order_item_id));
        }
        tracing::info!(
            order_item_id,
            modified = outcome.modified_count,
            created = outcome.created(),
            "order item updated"
        );
        Ok(outcome)
    }
}
