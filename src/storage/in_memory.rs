//! In-memory implementation of RecordStore for testing and development
//!
//! Collections are vectors of JSON records kept in insertion order. Pipelines
//! are evaluated locally with document-database semantics: lookups are left
//! joins, unwinding can preserve rows without a match, and groups are emitted
//! in the order their first row arrived.

use crate::core::field::{decimal_to_json, json_to_decimal};
use crate::core::pipeline::{Accumulator, Pipeline, Projection, Stage};
use crate::core::query::resolve_path;
use crate::core::{FieldPatch, Filter, RecordStore, Result, StorageError, UpdateOutcome};
use async_trait::async_trait;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

type Collections = HashMap<String, Vec<Value>>;

/// In-memory record store
///
/// Uses RwLock for thread-safe access; clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<Collections>>,
}

impl InMemoryStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in a collection
    pub fn count(&self, collection: &str) -> Result<usize> {
        Ok(self.read(collection)?.get(collection).map_or(0, Vec::len))
    }

    fn read(&self, collection: &str) -> Result<std::sync::RwLockReadGuard<'_, Collections>> {
        self.collections.read().map_err(|e| {
            StorageError::Query {
                collection: collection.to_string(),
                message: format!("Failed to acquire read lock: {}", e),
            }
            .into()
        })
    }

    fn write(
        &self,
        collection: &str,
        on_error: fn(String, String) -> StorageError,
    ) -> Result<std::sync::RwLockWriteGuard<'_, Collections>> {
        self.collections.write().map_err(|e| {
            on_error(
                collection.to_string(),
                format!("Failed to acquire write lock: {}", e),
            )
            .into()
        })
    }
}

fn insert_error(collection: String, message: String) -> StorageError {
    StorageError::Insert {
        collection,
        message,
    }
}

fn update_error(collection: String, message: String) -> StorageError {
    StorageError::Update {
        collection,
        message,
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>> {
        let collections = self.read(collection)?;
        Ok(collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| filter.matches(r))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>> {
        let collections = self.read(collection)?;
        Ok(collections
            .get(collection)
            .and_then(|records| records.iter().find(|r| filter.matches(r)).cloned()))
    }

    async fn insert(&self, collection: &str, record: Value) -> Result<String> {
        if !record.is_object() {
            return Err(insert_error(
                collection.to_string(),
                "Expected a JSON object record".to_string(),
            )
            .into());
        }

        let id = match record.get("id") {
            Some(Value::String(id)) => id.clone(),
            _ => Uuid::new_v4().to_string(),
        };

        let mut collections = self.write(collection, insert_error)?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(record);

        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &FieldPatch,
        upsert: bool,
    ) -> Result<UpdateOutcome> {
        let mut collections = self.write(collection, update_error)?;
        let records = collections.entry(collection.to_string()).or_default();

        if let Some(record) = records.iter_mut().find(|r| filter.matches(r)) {
            let Value::Object(fields) = record else {
                return Err(update_error(
                    collection.to_string(),
                    "Stored record is not an object".to_string(),
                )
                .into());
            };
            let before = fields.clone();
            patch.apply_to(fields);
            return Ok(UpdateOutcome {
                matched_count: 1,
                modified_count: u64::from(*fields != before),
                upserted_id: None,
            });
        }

        if !upsert {
            return Ok(UpdateOutcome::default());
        }

        let id = Uuid::new_v4().to_string();
        let mut fields = filter.seed();
        fields.insert("id".to_string(), Value::String(id.clone()));
        patch.apply_to(&mut fields);
        records.push(Value::Object(fields));

        Ok(UpdateOutcome {
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id),
        })
    }

    async fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> Result<Vec<Value>> {
        let collections = self.read(collection)?;
        let source = collections.get(collection).cloned().unwrap_or_default();
        Ok(evaluate(&collections, source, pipeline))
    }

    fn backend(&self) -> &'static str {
        "in-memory"
    }
}

// ---------------------------------------------------------------------------
// Pipeline evaluation
// ---------------------------------------------------------------------------

fn evaluate(collections: &Collections, source: Vec<Value>, pipeline: &Pipeline) -> Vec<Value> {
    pipeline
        .stages()
        .iter()
        .fold(source, |rows, stage| apply_stage(collections, rows, stage))
}

fn apply_stage(collections: &Collections, rows: Vec<Value>, stage: &Stage) -> Vec<Value> {
    match stage {
        Stage::Match(filter) => rows.into_iter().filter(|r| filter.matches(r)).collect(),
        Stage::Lookup {
            from,
            local_field,
            foreign_field,
            as_field,
        } => {
            let foreign = collections.get(from).map(Vec::as_slice).unwrap_or(&[]);
            rows.into_iter()
                .map(|mut row| {
                    let local = resolve_path(&row, local_field)
                        .cloned()
                        .unwrap_or(Value::Null);
                    let joined: Vec<Value> = foreign
                        .iter()
                        .filter(|f| {
                            let candidate = resolve_path(f, foreign_field).unwrap_or(&Value::Null);
                            values_equal(&local, candidate)
                        })
                        .cloned()
                        .collect();
                    set_field(&mut row, as_field, Value::Array(joined));
                    row
                })
                .collect()
        }
        Stage::Unwind {
            path,
            preserve_null_and_empty,
        } => rows
            .into_iter()
            .flat_map(|row| unwind(row, path, *preserve_null_and_empty))
            .collect(),
        Stage::Project(fields) => rows.iter().map(|row| project(row, fields)).collect(),
        Stage::Group { key, accumulators } => group(rows, key, accumulators),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => json_to_decimal(a) == json_to_decimal(b),
        _ => a == b,
    }
}

fn set_field(row: &mut Value, field: &str, value: Value) {
    if let Value::Object(fields) = row {
        fields.insert(field.to_string(), value);
    }
}

fn unwind(mut row: Value, path: &str, preserve: bool) -> Vec<Value> {
    let current = row.as_object_mut().and_then(|fields| fields.remove(path));
    match current {
        Some(Value::Array(items)) if !items.is_empty() => items
            .into_iter()
            .map(|item| {
                let mut copy = row.clone();
                set_field(&mut copy, path, item);
                copy
            })
            .collect(),
        Some(Value::Array(_)) | Some(Value::Null) | None => {
            if preserve {
                vec![row]
            } else {
                Vec::new()
            }
        }
        Some(other) => {
            set_field(&mut row, path, other);
            vec![row]
        }
    }
}

fn project(row: &Value, fields: &[(String, Projection)]) -> Value {
    let mut out = Map::new();
    for (name, projection) in fields {
        let value = match projection {
            Projection::Exclude => None,
            Projection::Include => row.get(name).cloned(),
            Projection::Field(path) => resolve_path(row, path).cloned(),
            Projection::Literal(value) => Some(value.clone()),
            Projection::Multiply(paths) => Some(multiply(row, paths)),
        };
        if let Some(value) = value {
            out.insert(name.clone(), value);
        }
    }
    Value::Object(out)
}

fn multiply(row: &Value, paths: &[String]) -> Value {
    let mut product = Decimal::ONE;
    for path in paths {
        match resolve_path(row, path).and_then(json_to_decimal) {
            Some(factor) => match product.checked_mul(factor) {
                Some(next) => product = next,
                None => return Value::Null,
            },
            None => return Value::Null,
        }
    }
    decimal_to_json(product)
}

fn group(
    rows: Vec<Value>,
    key: &[(String, String)],
    accumulators: &[(String, Accumulator)],
) -> Vec<Value> {
    let mut groups: IndexMap<String, (Map<String, Value>, Vec<Value>)> = IndexMap::new();

    for row in rows {
        let mut id = Map::new();
        for (name, path) in key {
            if let Some(value) = resolve_path(&row, path) {
                id.insert(name.clone(), value.clone());
            }
        }
        let identity = Value::Object(id.clone()).to_string();
        groups
            .entry(identity)
            .or_insert_with(|| (id, Vec::new()))
            .1
            .push(row);
    }

    groups
        .into_values()
        .map(|(id, members)| {
            let mut out = Map::new();
            out.insert("_id".to_string(), Value::Object(id));
            for (name, accumulator) in accumulators {
                let value = match accumulator {
                    Accumulator::Sum(path) => members
                        .iter()
                        .filter_map(|m| resolve_path(m, path).and_then(json_to_decimal))
                        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
                        .map_or(Value::Null, decimal_to_json),
                    Accumulator::Count => Value::from(members.len() as u64),
                    Accumulator::PushRoot => Value::Array(members.clone()),
                };
                out.insert(name.clone(), value);
            }
            Value::Object(out)
        })
        .collect()
}
