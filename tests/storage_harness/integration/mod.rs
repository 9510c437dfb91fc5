//! Integration test infrastructure for the HTTP boundary.
//!
//! # Architecture
//!
//! ```text
//! axum_test::TestServer
//!     └─ Router (built by ServerBuilder over the backend under test)
//!         ├─ GET|POST  /invoices
//!         ├─ GET|PATCH /invoices/{invoice_id}
//!         ├─ GET|POST  /order-items
//!         ├─ GET|PATCH /order-items/{order_item_id}
//!         └─ GET       /orders/{order_id}/items
//! ```


use axum_test::TestServer;
use std::sync::Arc;
use tavola::config::WritePolicy;
use tavola::core::RecordStore;
use tavola::server::ServerBuilder;

/// Test server over `store` with the default write policy
pub fn build_test_server(store: Arc<dyn RecordStore>) -> TestServer {
    build_test_server_with(store, WritePolicy::default())
}

pub fn build_test_server_with(store: Arc<dyn RecordStore>, policy: WritePolicy) -> TestServer {
    let router = ServerBuilder::new()
        .with_store(store)
        .with_write_policy(policy)
        .build()
        .unwrap();
    TestServer::new(router)
}
