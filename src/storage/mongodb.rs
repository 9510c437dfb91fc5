//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoStore`, a [`RecordStore`] backed by a `mongodb::Database`.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! tavola = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Serialization strategy
//!
//! Records travel as `serde_json::Value` and are converted to BSON documents
//! at this boundary. The `id` field is mapped to MongoDB's `_id` convention
//! and back, so identifiers and timestamps keep the string encoding the
//! models produce. Pipelines are rendered stage by stage into native
//! `$match`/`$lookup`/`$unwind`/`$project`/`$group` documents.

use crate::core::pipeline::{Accumulator, Pipeline, Projection, Stage};
use crate::core::{FieldPatch, Filter, RecordStore, Result, StorageError, UpdateOutcome};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Client, Database};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// renaming `id` → `_id` for MongoDB convention.
fn json_to_document(json: Value) -> std::result::Result<Document, String> {
    let bson_val =
        mongodb::bson::to_bson(&json).map_err(|e| format!("Failed to convert JSON to BSON: {}", e))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => return Err("Expected BSON document, got non-object".to_string()),
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value,
/// renaming `_id` → `id` for domain record convention.
fn document_to_json(mut doc: Document) -> Value {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", bson_id_to_json(id));
    }

    Bson::Document(doc).into_relaxed_extjson()
}

fn bson_id_to_json(id: Bson) -> Bson {
    match id {
        Bson::ObjectId(oid) => Bson::String(oid.to_hex()),
        other => other,
    }
}

fn bson_id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_to_bson(value: &Value) -> Bson {
    mongodb::bson::to_bson(value).unwrap_or(Bson::Null)
}

fn field_ref(path: &str) -> String {
    format!("${}", path)
}

/// Render an equality filter
fn filter_to_document(filter: &Filter) -> Document {
    filter
        .clauses()
        .iter()
        .map(|(field, value)| (field.clone(), json_to_bson(&value.to_json())))
        .collect()
}

/// Render a patch as a `$set` update
fn patch_to_update(patch: &FieldPatch) -> Document {
    let set: Document = patch
        .changes()
        .map(|(field, value)| (field.to_string(), json_to_bson(&value.to_json())))
        .collect();
    doc! { "$set": set }
}

fn projection_to_bson(projection: &Projection) -> Bson {
    match projection {
        Projection::Include => Bson::Int32(1),
        Projection::Exclude => Bson::Int32(0),
        Projection::Field(path) => Bson::String(field_ref(path)),
        Projection::Literal(value) => Bson::Document(doc! { "$literal": json_to_bson(value) }),
        Projection::Multiply(paths) => {
            let operands: Vec<Bson> = paths.iter().map(|p| Bson::String(field_ref(p))).collect();
            Bson::Document(doc! { "$multiply": operands })
        }
    }
}

fn accumulator_to_bson(accumulator: &Accumulator) -> Bson {
    match accumulator {
        Accumulator::Sum(path) => Bson::Document(doc! { "$sum": field_ref(path) }),
        Accumulator::Count => Bson::Document(doc! { "$sum": 1 }),
        Accumulator::PushRoot => Bson::Document(doc! { "$push": "$$ROOT" }),
    }
}

/// Render a typed stage as a native aggregation stage
fn stage_to_document(stage: &Stage) -> Document {
    match stage {
        Stage::Match(filter) => doc! { "$match": filter_to_document(filter) },
        Stage::Lookup {
            from,
            local_field,
            foreign_field,
            as_field,
        } => doc! {
            "$lookup": {
                "from": from.as_str(),
                "localField": local_field.as_str(),
                "foreignField": foreign_field.as_str(),
                "as": as_field.as_str(),
            }
        },
        Stage::Unwind {
            path,
            preserve_null_and_empty,
        } => doc! {
            "$unwind": {
                "path": field_ref(path),
                "preserveNullAndEmptyArrays": *preserve_null_and_empty,
            }
        },
        Stage::Project(fields) => {
            let projection: Document = fields
                .iter()
                .map(|(name, p)| (name.clone(), projection_to_bson(p)))
                .collect();
            doc! { "$project": projection }
        }
        Stage::Group { key, accumulators } => {
            let id: Document = key
                .iter()
                .map(|(name, path)| (name.clone(), Bson::String(field_ref(path))))
                .collect();
            let mut group = doc! { "_id": id };
            for (name, accumulator) in accumulators {
                group.insert(name.clone(), accumulator_to_bson(accumulator));
            }
            doc! { "$group": group }
        }
    }
}

/// Render a whole pipeline
pub fn pipeline_to_documents(pipeline: &Pipeline) -> Vec<Document> {
    pipeline.stages().iter().map(stage_to_document).collect()
}

// ---------------------------------------------------------------------------
// MongoStore
// ---------------------------------------------------------------------------

/// Record store backed by MongoDB
///
/// One MongoDB collection per record collection name.
///
/// # Example
///
/// ```rust,ignore
/// let store = MongoStore::connect("mongodb://localhost:27017", "restaurant").await?;
/// let aggregator = OrderAggregator::new(Arc::new(store));
/// ```
#[derive(Clone, Debug)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Create a new `MongoStore` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Connect a client and select `database`
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StorageError::Connection {
                backend: "mongodb".to_string(),
                message: e.to_string(),
            })?;
        tracing::info!(database, "connected to MongoDB");
        Ok(Self::new(client.database(database)))
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self, name: &str) -> mongodb::Collection<Document> {
        self.database.collection(name)
    }
}

fn query_error(collection: &str, e: impl std::fmt::Display) -> StorageError {
    StorageError::Query {
        collection: collection.to_string(),
        message: e.to_string(),
    }
}

#[async_trait]
impl RecordStore for MongoStore {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>> {
        tracing::debug!(collection, "find");
        let cursor = self
            .collection(collection)
            .find(filter_to_document(filter))
            .await
            .map_err(|e| query_error(collection, e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| query_error(collection, e))?;

        Ok(docs.into_iter().map(document_to_json).collect())
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>> {
        tracing::debug!(collection, "find_one");
        let doc = self
            .collection(collection)
            .find_one(filter_to_document(filter))
            .await
            .map_err(|e| query_error(collection, e))?;

        Ok(doc.map(document_to_json))
    }

    async fn insert(&self, collection: &str, record: Value) -> Result<String> {
        let doc = json_to_document(record).map_err(|message| StorageError::Insert {
            collection: collection.to_string(),
            message,
        })?;

        let result = self
            .collection(collection)
            .insert_one(doc)
            .await
            .map_err(|e| StorageError::Insert {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(bson_id_to_string(&result.inserted_id))
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &FieldPatch,
        upsert: bool,
    ) -> Result<UpdateOutcome> {
        let result = self
            .collection(collection)
            .update_one(filter_to_document(filter), patch_to_update(patch))
            .upsert(upsert)
            .await
            .map_err(|e| StorageError::Update {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(UpdateOutcome {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id.as_ref().map(bson_id_to_string),
        })
    }

    async fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> Result<Vec<Value>> {
        tracing::debug!(collection, stages = pipeline.stages().len(), "aggregate");
        let cursor = self
            .collection(collection)
            .aggregate(pipeline_to_documents(pipeline))
            .await
            .map_err(|e| query_error(collection, e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| query_error(collection, e))?;

        Ok(docs.into_iter().map(document_to_json).collect())
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}
