//! HTTP boundary
//!
//! This module provides a `ServerBuilder` that wires the record store into
//! the services and exposes them as a REST API:
//! - invoice creation, listing, views and partial updates
//! - batch order item creation, reads and partial updates
//! - per-order aggregates

pub mod builder;
pub mod handlers;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use host::ServerHost;
pub use router::build_routes;
