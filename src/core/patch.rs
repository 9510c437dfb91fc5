//! Partial updates as a value object
//!
//! A [`FieldPatch`] maps field names to optional new values. Only present
//! values are written; absent ones leave the stored field untouched. Every
//! store backend applies a patch the same way, so handlers never assemble
//! update documents by hand.

use super::field::FieldValue;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Field written on every patch
pub const UPDATED_AT: &str = "updated_at";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    fields: IndexMap<String, Option<FieldValue>>,
}

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a field; `None` keeps the stored value as it is
    pub fn set<V: Into<FieldValue>>(mut self, field: impl Into<String>, value: Option<V>) -> Self {
        self.fields.insert(field.into(), value.map(Into::into));
        self
    }

    /// Refresh `updated_at`
    pub fn touch(self, now: DateTime<Utc>) -> Self {
        self.set(UPDATED_AT, Some(now))
    }

    /// Fields that will actually be written, in insertion order
    pub fn changes(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields
            .iter()
            .filter_map(|(field, value)| value.as_ref().map(|v| (field.as_str(), v)))
    }

    /// Fields the caller left untouched
    pub fn skipped(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(field, _)| field.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.changes().next().is_none()
    }

    /// Write the present fields into a record
    pub fn apply_to(&self, record: &mut Map<String, Value>) {
        for (field, value) in self.changes() {
            record.insert(field.to_string(), value.to_json());
        }
    }

    /// Present fields as a standalone JSON object (the `$set` body)
    pub fn to_json(&self) -> Map<String, Value> {
        let mut set = Map::new();
        self.apply_to(&mut set);
        set
    }
}
