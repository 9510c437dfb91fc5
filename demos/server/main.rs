//! Runnable tavola server
//!
//! ```text
//! cargo run --example server
//! TAVOLA_CONFIG=tavola.yaml cargo run --example server --features mongodb_backend
//! ```
//!
//! With the in-memory backend a small menu, two tables and one open order
//! with an invoice are seeded so the endpoints return data right away.

use anyhow::Result;
use std::sync::Arc;
use tavola::core::store::insert_model;
use tavola::models::collections::{FOOD, TABLE};
use tavola::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::var("TAVOLA_CONFIG") {
        Ok(path) => AppConfig::from_yaml_file(&path)?,
        Err(_) => AppConfig::default(),
    }
    .with_env_overrides()?;

    tavola::telemetry::init_tracing(&config.logging)?;

    let store = tavola::storage::connect(&config.store).await?;
    if config.store.backend == StoreBackend::InMemory {
        seed(store.clone(), config.writes).await?;
    }

    ServerBuilder::new()
        .with_store(store)
        .with_write_policy(config.writes)
        .serve(&config.server.bind.to_string())
        .await
}

async fn seed(store: Arc<dyn RecordStore>, policy: WritePolicy) -> Result<()> {
    let margherita = Food::new("Margherita", Decimal::new(1000, 2), Some("margherita.jpg".into()));
    let tiramisu = Food::new("Tiramisu", Decimal::new(550, 2), None);
    for food in [&margherita, &tiramisu] {
        insert_model(&*store, FOOD, food).await?;
    }

    let window = Table::new(4);
    insert_model(&*store, TABLE, &window).await?;
    insert_model(&*store, TABLE, &Table::new(7)).await?;

    let order = OrderItemManager::new(store.clone(), policy)
        .create(CreateOrderItems {
            table_id: Some(window.table_id.clone()),
            order_items: vec![
                NewOrderItem {
                    food_id: margherita.food_id.clone(),
                    quantity: 2,
                    unit_price: 10.0,
                },
                NewOrderItem {
                    food_id: tiramisu.food_id.clone(),
                    quantity: 1,
                    unit_price: 5.5,
                },
            ],
        })
        .await?;

    let invoice = InvoiceManager::new(store, policy)
        .create(CreateInvoice {
            order_id: order.order_id.clone(),
            payment_status: None,
            payment_method: None,
        })
        .await?;

    tracing::info!(
        order_id = %order.order_id,
        invoice_id = %invoice.invoice_id,
        "demo data seeded; try GET /invoices/{}",
        invoice.invoice_id
    );
    Ok(())
}
