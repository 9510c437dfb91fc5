//! Record store abstraction
//!
//! The pipeline talks to the document database only through [`RecordStore`].
//! Records are JSON objects keyed by stable string identifiers
//! (`order_id`, `invoice_id`, ...), never by the backend's internal ids.
//! Each operation is atomic at the single-record level; nothing here spans
//! several records in a transaction.

use super::error::{Result, StorageError};
use super::patch::FieldPatch;
use super::pipeline::Pipeline;
use super::query::Filter;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of an `update_one` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
    /// Identifier of the record created by an upsert
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upserted_id: Option<String>,
}

impl UpdateOutcome {
    pub fn created(&self) -> bool {
        self.upserted_id.is_some()
    }
}

/// Document collection operations used by the services
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records matching `filter`, fully drained
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>>;

    /// First record matching `filter`
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>>;

    /// Insert a record and return the identifier the backend assigned to it
    async fn insert(&self, collection: &str, record: Value) -> Result<String>;

    /// Apply `patch` to the first record matching `filter`
    ///
    /// With `upsert`, a missing record is created from the filter's equality
    /// fields plus the patch.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &FieldPatch,
        upsert: bool,
    ) -> Result<UpdateOutcome>;

    /// Run an aggregation pipeline over `collection`
    async fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> Result<Vec<Value>>;

    /// Backend name for logs
    fn backend(&self) -> &'static str;
}

/// Encode a model as a record
pub fn encode<T: Serialize>(collection: &str, model: &T) -> Result<Value> {
    serde_json::to_value(model).map_err(|e| {
        StorageError::Serialization {
            collection: collection.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Decode a record into a model
pub fn decode<T: DeserializeOwned>(collection: &str, record: Value) -> Result<T> {
    serde_json::from_value(record).map_err(|e| {
        StorageError::Serialization {
            collection: collection.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

/// `find_one` followed by [`decode`]
pub async fn find_one_as<T: DeserializeOwned>(
    store: &dyn RecordStore,
    collection: &str,
    filter: &Filter,
) -> Result<Option<T>> {
    store
        .find_one(collection, filter)
        .await?
        .map(|record| decode(collection, record))
        .transpose()
}

/// `find` followed by [`decode`] on every record
pub async fn find_as<T: DeserializeOwned>(
    store: &dyn RecordStore,
    collection: &str,
    filter: &Filter,
) -> Result<Vec<T>> {
    store
        .find(collection, filter)
        .await?
        .into_iter()
        .map(|record| decode(collection, record))
        .collect()
}

/// [`encode`] followed by `insert`
pub async fn insert_model<T: Serialize + Sync>(
    store: &dyn RecordStore,
    collection: &str,
    model: &T,
) -> Result<String> {
    let record = encode(collection, model)?;
    store.insert(collection, record).await
}
