//! Shared test harness for record store backends
//!
//! Provides seeding helpers for foods, tables, orders and order items, plus
//! the fixed "two items at table 4" order used by the aggregation suites.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//!
//! record_store_tests!(Arc::new(InMemoryStore::new()));
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod service_tests;
#[macro_use]
pub mod integration;

use chrono::Utc;
use rust_decimal::Decimal;
use tavola::core::RecordStore;
use tavola::core::store::insert_model;
use tavola::models::collections::{FOOD, ORDER, ORDER_ITEM, TABLE};
use tavola::models::{Food, Order, OrderItem, Table};

// ---------------------------------------------------------------------------
// Seeding helpers
// ---------------------------------------------------------------------------

/// Price with two decimal places, e.g. `price(1050)` is 10.50
pub fn price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub async fn seed_food(store: &dyn RecordStore, name: &str, cents: i64) -> Food {
    let food = Food::new(name, price(cents), Some(format!("{}.jpg", name.to_lowercase())));
    insert_model(store, FOOD, &food).await.unwrap();
    food
}

pub async fn seed_table(store: &dyn RecordStore, number: i64) -> Table {
    let table = Table::new(number);
    insert_model(store, TABLE, &table).await.unwrap();
    table
}

pub async fn seed_order(store: &dyn RecordStore, table_id: Option<&str>) -> Order {
    let order = Order::new(table_id.map(str::to_string), Utc::now());
    insert_model(store, ORDER, &order).await.unwrap();
    order
}

pub async fn seed_item(
    store: &dyn RecordStore,
    order_id: &str,
    food_id: &str,
    quantity: u32,
    unit_cents: i64,
) -> OrderItem {
    let item = OrderItem::new(order_id, food_id, quantity, price(unit_cents), Utc::now());
    insert_model(store, ORDER_ITEM, &item).await.unwrap();
    item
}

// ---------------------------------------------------------------------------
// Fixed scenario
// ---------------------------------------------------------------------------

/// Order at table 4 with two lines: a 10.00 pizza twice and a 5.50 tiramisu once
pub struct TableFourOrder {
    pub order: Order,
    pub table: Table,
    pub pizza: Food,
    pub tiramisu: Food,
    pub items: Vec<OrderItem>,
}

pub async fn seed_table_four_order(store: &dyn RecordStore) -> TableFourOrder {
    let pizza = seed_food(store, "Pizza", 1000).await;
    let tiramisu = seed_food(store, "Tiramisu", 550).await;
    let table = seed_table(store, 4).await;
    let order = seed_order(store, Some(&table.table_id)).await;
    let items = vec![
        seed_item(store, &order.order_id, &pizza.food_id, 2, 1000).await,
        seed_item(store, &order.order_id, &tiramisu.food_id, 1, 550).await,
    ];
    TableFourOrder {
        order,
        table,
        pizza,
        tiramisu,
        items,
    }
}
