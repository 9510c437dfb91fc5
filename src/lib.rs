//! # Tavola
//!
//! Restaurant order backend built around one read path: order items joined
//! with their food, order and table records, grouped into per-order totals,
//! and folded into invoice views.
//!
//! ## Features
//!
//! - **Order aggregation**: left-join chain plus group-by, evaluated by the
//!   store (MongoDB) or in process (in-memory backend) with the same rules
//! - **Invoice views**: invoice fields merged with the order aggregate,
//!   payment defaults resolved in one place
//! - **Invoice and order item lifecycles**: validated creation, partial
//!   updates through a field patch, configurable upsert
//! - **Bounded store calls**: every store operation fails with a timeout
//!   instead of hanging
//! - **Typed errors**: one error enum mapped onto HTTP status classes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tavola::prelude::*;
//!
//! let config = AppConfig::from_yaml_file("tavola.yaml")?.with_env_overrides()?;
//! let store = tavola::storage::connect(&config.store).await?;
//!
//! let projector = InvoiceProjector::new(store.clone());
//! let view = projector.project("6650f1c2a9").await?;
//! println!("{} due {}", view.payment_due, view.payment_due_date);
//! ```

pub mod config;
pub mod core;
pub mod models;
pub mod server;
pub mod services;
pub mod storage;
pub mod telemetry;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        Accumulator, FieldPatch, FieldValue, Filter, Pipeline, Projection, RecordStore, Result,
        StorageError, TavolaError, UpdateOutcome, ValidationError,
    };

    // === Models ===
    pub use crate::models::{
        Food, Invoice, InvoiceView, Order, OrderAggregate, OrderItem, OrderLine, PaymentMethod,
        PaymentStatus, Table,
    };

    // === Services ===
    pub use crate::services::{
        CreateInvoice, CreateOrderItems, CreatedOrder, InvoiceManager, InvoiceProjector,
        InvoiceUpdate, NewOrderItem, OrderAggregator, OrderItemManager, OrderItemUpdate,
    };

    // === Storage ===
    pub use crate::storage::{InMemoryStore, TimedStore};
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoStore;

    // === Config ===
    pub use crate::config::{AppConfig, LoggingConfig, StoreBackend, StoreConfig, WritePolicy};

    // === Server ===
    pub use crate::server::{ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use rust_decimal::Decimal;
    pub use serde::{Deserialize, Serialize};
}
