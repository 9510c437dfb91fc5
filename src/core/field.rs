//! Field value types shared by filters and patches

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

/// A polymorphic field value that can hold different types
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Decimal(Decimal),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Render the value the way records store it
    ///
    /// Decimals become JSON numbers and timestamps use the same RFC 3339
    /// encoding that `chrono`'s serde support produces for model fields.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Integer(i) => Value::from(*i),
            FieldValue::Decimal(d) => decimal_to_json(*d),
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::DateTime(dt) => serde_json::to_value(dt).unwrap_or(Value::Null),
            FieldValue::Null => Value::Null,
        }
    }

    /// Equality against a stored value
    ///
    /// Numbers compare by value regardless of integer/float encoding, and
    /// `Null` matches both an explicit null and a missing field.
    pub fn matches(&self, stored: Option<&Value>) -> bool {
        let stored = stored.unwrap_or(&Value::Null);
        match (self, stored) {
            (FieldValue::Null, Value::Null) => true,
            (FieldValue::Integer(_) | FieldValue::Decimal(_), Value::Number(_)) => {
                json_to_decimal(stored) == self.as_decimal()
            }
            _ => self.to_json() == *stored,
        }
    }

    fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Integer(i) => Some(Decimal::from(*i)),
            FieldValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }
}

/// Read a JSON number as a decimal
pub fn json_to_decimal(value: &Value) -> Option<Decimal> {
    if let Some(i) = value.as_i64() {
        return Some(Decimal::from(i));
    }
    value.as_f64().and_then(|f| Decimal::try_from(f).ok())
}

/// Write a decimal as a JSON number
///
/// Whole values stay integers so counts and quantities keep their type.
pub fn decimal_to_json(value: Decimal) -> Value {
    if value.fract().is_zero()
        && let Some(i) = value.to_i64()
    {
        return Value::from(i);
    }
    value
        .to_f64()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::String(value.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}
