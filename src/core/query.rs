//! Equality filters over stored records

use super::field::FieldValue;
use serde_json::{Map, Value};

/// Conjunction of field-equality predicates
///
/// An empty filter matches every record.
///
/// # Example
/// ```rust,ignore
/// let filter = Filter::eq("order_id", "6650f1").and("food_id", "a1");
/// let items = store.find("orderItem", &filter).await?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, FieldValue)>,
}

impl Filter {
    /// Filter matching every record
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter on a single field
    pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::all().and(field, value)
    }

    /// Add another equality predicate
    pub fn and(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    pub fn clauses(&self) -> &[(String, FieldValue)] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Check whether a record satisfies every predicate
    pub fn matches(&self, record: &Value) -> bool {
        self.clauses
            .iter()
            .all(|(field, expected)| expected.matches(resolve_path(record, field)))
    }

    /// Fields an upsert copies into a freshly created record
    pub fn seed(&self) -> Map<String, Value> {
        self.clauses
            .iter()
            .filter(|(field, _)| !field.contains('.'))
            .map(|(field, value)| (field.clone(), value.to_json()))
            .collect()
    }
}

/// Resolve a dotted path (`order.table_id`) inside a record
pub fn resolve_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(record, |current, segment| current.get(segment))
}
