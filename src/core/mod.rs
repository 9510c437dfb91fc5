//! Core module containing the store contract and shared value types

pub mod error;
pub mod field;
pub mod money;
pub mod patch;
pub mod pipeline;
pub mod query;
pub mod store;

pub use error::{Result, StorageError, TavolaError, ValidationError};
pub use field::FieldValue;
pub use patch::FieldPatch;
pub use pipeline::{Accumulator, Pipeline, Projection, Stage};
pub use query::Filter;
pub use store::{RecordStore, UpdateOutcome};
