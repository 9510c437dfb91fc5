//! Per-order aggregation of order items
//!
//! Order items are left-joined with their food, their order and the order's
//! table, projected to one line per item, then grouped by
//! `(order_id, table_id, table_number)`. A missing food, order or table
//! leaves the corresponding line fields empty; it never fails the read.

use crate::core::money::round_currency;
use crate::core::store::decode;
use crate::core::{Accumulator, Filter, Pipeline, Projection, RecordStore, Result};
use crate::models::OrderAggregate;
use crate::models::collections::{FOOD, ORDER, ORDER_ITEM, TABLE};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct OrderAggregator {
    store: Arc<dyn RecordStore>,
}

impl OrderAggregator {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Pipeline run against the order item collection for one order
    pub fn pipeline_for(order_id: &str) -> Pipeline {
        Pipeline::new()
            .matching(Filter::eq("order_id", order_id))
            .lookup(FOOD, "food_id", "food_id", "food")
            .unwind("food", true)
            .lookup(ORDER, "order_id", "order_id", "order")
            .unwind("order", true)
            .lookup(TABLE, "order.table_id", "table_id", "table")
            .unwind("table", true)
            .project([
                ("_id", Projection::Exclude),
                ("amount", Projection::multiply(["food.price", "quantity"])),
                ("total_count", Projection::Literal(json!(1))),
                ("food_name", Projection::field("food.name")),
                ("food_image", Projection::field("food.food_image")),
                ("table_number", Projection::field("table.table_number")),
                ("table_id", Projection::field("table.table_id")),
                ("order_id", Projection::field("order.order_id")),
                ("price", Projection::field("food.price")),
                ("quantity", Projection::Include),
            ])
            .group(
                [
                    ("order_id", "order_id"),
                    ("table_id", "table_id"),
                    ("table_number", "table_number"),
                ],
                [
                    ("payment_due", Accumulator::Sum("amount".to_string())),
                    ("total_count", Accumulator::Count),
                    ("order_items", Accumulator::PushRoot),
                ],
            )
            .project([
                ("_id", Projection::Exclude),
                ("order_id", Projection::field("_id.order_id")),
                ("table_id", Projection::field("_id.table_id")),
                ("table_number", Projection::field("_id.table_number")),
                ("payment_due", Projection::Include),
                ("total_count", Projection::Include),
                ("order_items", Projection::Include),
            ])
    }

    /// One aggregate per `(order_id, table_id, table_number)` group
    ///
    /// An order without items yields an empty vector. Callers that need a
    /// row decide themselves whether that is an error.
    pub async fn aggregate_by_order(&self, order_id: &str) -> Result<Vec<OrderAggregate>> {
        let rows = self
            .store
            .aggregate(ORDER_ITEM, &Self::pipeline_for(order_id))
            .await?;

        if rows.is_empty() {
            tracing::debug!(order_id, "order has no items to aggregate");
        }

        rows.into_iter()
            .map(|row| {
                let mut aggregate: OrderAggregate = decode(ORDER_ITEM, row)?;
                aggregate.payment_due = round_currency(aggregate.payment_due);
                Ok(aggregate)
            })
            .collect()
    }
}
