//! HTTP handlers
//!
//! Handlers only extract, delegate to a service and wrap the result in
//! JSON. Failures render through `TavolaError`'s `IntoResponse`.

pub mod invoices;
pub mod order_items;
