//! Typed aggregation pipelines
//!
//! A [`Pipeline`] describes a multi-stage read (match, left lookup, unwind,
//! project, group) independently of the backend. The MongoDB store renders
//! it as native `$`-stages; the in-memory store evaluates it directly with
//! the same semantics.

use super::query::Filter;
use serde_json::Value;

/// How a projected field gets its value
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Keep the field under the same name
    Include,
    /// Drop the field
    Exclude,
    /// Copy the value at a dotted path; omitted when the path is missing
    Field(String),
    /// A constant
    Literal(Value),
    /// Product of the values at the given paths; null if any is missing
    Multiply(Vec<String>),
}

impl Projection {
    pub fn field(path: impl Into<String>) -> Self {
        Projection::Field(path.into())
    }

    pub fn multiply<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection::Multiply(paths.into_iter().map(Into::into).collect())
    }
}

/// Per-group reduction
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    /// Sum the numeric values at a path; non-numeric values are ignored
    Sum(String),
    /// Number of rows in the group
    Count,
    /// Every row of the group, in arrival order
    PushRoot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(Filter),
    /// Left outer join: `as_field` receives the array of matching records
    Lookup {
        from: String,
        local_field: String,
        foreign_field: String,
        as_field: String,
    },
    Unwind {
        path: String,
        preserve_null_and_empty: bool,
    },
    Project(Vec<(String, Projection)>),
    /// Group rows under `_id`, a document built from `key` (name, path) pairs
    Group {
        key: Vec<(String, String)>,
        accumulators: Vec<(String, Accumulator)>,
    },
}

/// Ordered list of stages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn matching(mut self, filter: Filter) -> Self {
        self.stages.push(Stage::Match(filter));
        self
    }

    pub fn lookup(
        mut self,
        from: impl Into<String>,
        local_field: impl Into<String>,
        foreign_field: impl Into<String>,
        as_field: impl Into<String>,
    ) -> Self {
        self.stages.push(Stage::Lookup {
            from: from.into(),
            local_field: local_field.into(),
            foreign_field: foreign_field.into(),
            as_field: as_field.into(),
        });
        self
    }

    pub fn unwind(mut self, path: impl Into<String>, preserve_null_and_empty: bool) -> Self {
        self.stages.push(Stage::Unwind {
            path: path.into(),
            preserve_null_and_empty,
        });
        self
    }

    pub fn project<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Projection)>,
        S: Into<String>,
    {
        self.stages.push(Stage::Project(
            fields.into_iter().map(|(f, p)| (f.into(), p)).collect(),
        ));
        self
    }

    pub fn group<K, A, S>(mut self, key: K, accumulators: A) -> Self
    where
        K: IntoIterator<Item = (S, S)>,
        A: IntoIterator<Item = (S, Accumulator)>,
        S: Into<String>,
    {
        self.stages.push(Stage::Group {
            key: key
                .into_iter()
                .map(|(name, path)| (name.into(), path.into()))
                .collect(),
            accumulators: accumulators
                .into_iter()
                .map(|(name, acc)| (name.into(), acc))
                .collect(),
        });
        self
    }
}
