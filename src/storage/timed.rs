//! Deadline decorator for any RecordStore
//!
//! Every call is bounded by the same deadline. When it elapses the in-flight
//! future is dropped and the caller gets [`TavolaError::Timeout`]. No call is
//! retried.

use crate::core::{FieldPatch, Filter, Pipeline, RecordStore, Result, TavolaError, UpdateOutcome};
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

/// Upper bound applied to each store call unless configured otherwise
pub const DEFAULT_STORE_DEADLINE: Duration = Duration::from_secs(100);

#[derive(Clone, Debug)]
pub struct TimedStore<S> {
    inner: S,
    deadline: Duration,
}

impl<S> TimedStore<S> {
    pub fn new(inner: S, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        collection: &str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.deadline, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    collection,
                    deadline_secs = self.deadline.as_secs(),
                    "store call abandoned after deadline"
                );
                Err(TavolaError::Timeout {
                    operation,
                    collection: collection.to_string(),
                    after: self.deadline,
                })
            }
        }
    }
}

#[async_trait]
impl<S: RecordStore> RecordStore for TimedStore<S> {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>> {
        self.bounded("find", collection, self.inner.find(collection, filter))
            .await
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>> {
        self.bounded("find_one", collection, self.inner.find_one(collection, filter))
            .await
    }

    async fn insert(&self, collection: &str, record: Value) -> Result<String> {
        self.bounded("insert", collection, self.inner.insert(collection, record))
            .await
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &FieldPatch,
        upsert: bool,
    ) -> Result<UpdateOutcome> {
        self.bounded(
            "update_one",
            collection,
            self.inner.update_one(collection, filter, patch, upsert),
        )
        .await
    }

    async fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> Result<Vec<Value>> {
        self.bounded(
            "aggregate",
            collection,
            self.inner.aggregate(collection, pipeline),
        )
        .await
    }

    fn backend(&self) -> &'static str {
        self.inner.backend()
    }
}
