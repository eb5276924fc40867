//! # Normalized Values
//!
//! The coerced form of an accepted document. It mirrors the JSON value
//! model with one addition: date strings accepted by a date descriptor are
//! held as [`CalendarDate`]s.
//!
//! [`Normalized::to_json`] renders dates as `YYYY-MM-DD`. Validating the
//! rendered JSON against the same descriptor yields the same `Normalized`
//! value, so acceptance is a fixed point.

use std::collections::BTreeMap;

use ctg_core::CalendarDate;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// An accepted, coerced value.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// `null` (only reachable through a nullable boolean or a literal).
    Null,
    /// A boolean.
    Bool(bool),
    /// An integral number.
    Integer(i64),
    /// A non-integral number (only reachable through a literal).
    Float(f64),
    /// A string, unchanged.
    Text(String),
    /// A coerced calendar date.
    Date(CalendarDate),
    /// Array elements, in order.
    List(Vec<Normalized>),
    /// Declared fields that were present in the input.
    Record(BTreeMap<String, Normalized>),
}

impl Normalized {
    /// Convert a raw JSON value without any coercion.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Normalized::Null,
            Value::Bool(b) => Normalized::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Normalized::Integer(i),
                None => Normalized::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Normalized::Text(s.clone()),
            Value::Array(items) => Normalized::List(items.iter().map(Normalized::from_json).collect()),
            Value::Object(map) => Normalized::Record(
                map.iter()
                    .map(|(k, v)| (k.clone(), Normalized::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Render back to JSON. Dates become `YYYY-MM-DD` strings.
    pub fn to_json(&self) -> Value {
        match self {
            Normalized::Null => Value::Null,
            Normalized::Bool(b) => Value::Bool(*b),
            Normalized::Integer(i) => Value::Number(Number::from(*i)),
            Normalized::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            Normalized::Text(s) => Value::String(s.clone()),
            Normalized::Date(d) => Value::String(d.to_iso8601()),
            Normalized::List(items) => Value::Array(items.iter().map(Normalized::to_json).collect()),
            Normalized::Record(fields) => {
                let map: Map<String, Value> =
                    fields.iter().map(|(k, v)| (k.clone(), v.to_json())).collect();
                Value::Object(map)
            }
        }
    }

    /// Look up a field of a record.
    pub fn get(&self, key: &str) -> Option<&Normalized> {
        match self {
            Normalized::Record(fields) => fields.get(key),
            _ => None,
        }
    }

    /// The string, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Normalized::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The date, if this is a coerced date.
    pub fn as_date(&self) -> Option<CalendarDate> {
        match self {
            Normalized::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// The integer, if this is integral.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Normalized::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Normalized::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The elements, if this is a list.
    pub fn as_list(&self) -> Option<&[Normalized]> {
        match self {
            Normalized::List(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this is `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Normalized::Null)
    }
}

impl From<&Normalized> for Value {
    fn from(value: &Normalized) -> Self {
        value.to_json()
    }
}

impl Serialize for Normalized {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
